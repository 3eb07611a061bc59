//! The resumable step sequence handed to the driver.
//!
//! The graph writer is an `async` recursion that parks once before every
//! node it visits. [`WriteSteps`] polls it with a no-op waker, so each poll
//! runs exactly until the next node boundary. All traversal state stays in
//! the suspended future; dropping [`WriteSteps`] abandons the write.

use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::task::noop_waker_ref;

use crate::classify::Classification;
use crate::error::Result;

/// The node the writer is about to process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visit {
    /// 1-based position among all visits of this write.
    pub ordinal: usize,
    /// Element depth the node is written at; the root element is depth 1.
    pub depth: usize,
    /// `None` for a null value.
    pub classification: Option<Classification>,
}

/// Outcome of one [`WriteSteps::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Suspended(Visit),
    Complete,
}

pub(crate) type Cursor = Rc<Cell<Option<Visit>>>;

type Task<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;

/// A write in progress. Does nothing until advanced.
pub struct WriteSteps<'a> {
    task: Option<Task<'a>>,
    cursor: Cursor,
    steps: usize,
}

impl<'a> WriteSteps<'a> {
    pub(crate) fn new(task: Task<'a>, cursor: Cursor) -> Self {
        Self {
            task: Some(task),
            cursor,
            steps: 0,
        }
    }

    /// Runs the write up to the next node boundary.
    ///
    /// After `Complete` or an error, further calls return `Complete`.
    pub fn step(&mut self) -> Result<Step> {
        let Some(task) = self.task.as_mut() else {
            return Ok(Step::Complete);
        };
        let mut cx = Context::from_waker(noop_waker_ref());
        match task.as_mut().poll(&mut cx) {
            Poll::Pending => {
                self.steps += 1;
                Ok(Step::Suspended(self.cursor.take().unwrap_or_default()))
            }
            Poll::Ready(result) => {
                self.task = None;
                result.map(|()| Step::Complete)
            }
        }
    }

    /// Takes up to `steps` steps. Returns `true` once the write is complete.
    pub fn advance(&mut self, steps: usize) -> Result<bool> {
        for _ in 0..steps {
            if self.step()? == Step::Complete {
                return Ok(true);
            }
        }
        Ok(self.is_complete())
    }

    /// Drives the write to completion and returns the number of steps taken.
    pub fn finish(&mut self) -> Result<usize> {
        while self.step()? != Step::Complete {}
        Ok(self.steps)
    }

    pub fn is_complete(&self) -> bool {
        self.task.is_none()
    }

    /// Suspensions so far.
    pub fn steps_taken(&self) -> usize {
        self.steps
    }
}

impl Iterator for WriteSteps<'_> {
    type Item = Result<Visit>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(Step::Suspended(visit)) => Some(Ok(visit)),
            Ok(Step::Complete) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl fmt::Debug for WriteSteps<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteSteps")
            .field("steps", &self.steps)
            .field("complete", &self.is_complete())
            .finish()
    }
}
