//! Pumps the encoder once per scheduling slice.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use dcx_xml::{Divergence, GraphEncoder, RecordingSink, SinkLog, SpyMode, XmlTextSink};
use tracing::{debug, info};

use crate::config::DriverConfig;
use crate::fixtures::{SaveValue, save_values};

/// What one [`run`] did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub bytes: usize,
    /// Encoder steps, one per graph node.
    pub steps: usize,
    /// Scheduling slices the write was spread over.
    pub slices: usize,
    /// Sink calls made.
    pub calls: usize,
    /// First difference from the compared log, if any.
    pub divergence: Option<Divergence>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn verified(&self) -> bool {
        self.divergence.is_none()
    }
}

async fn pause(delay_ms: u64) {
    if delay_ms == 0 {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Encodes the sample graph to `config.output`, spreading the work over as
/// many slices as `config.steps_per_slice` requires.
pub async fn run(config: &DriverConfig) -> anyhow::Result<RunSummary> {
    let graph = save_values(config.containers);
    let mode = match &config.compare {
        Some(path) => SpyMode::Compare(
            SinkLog::load(path).with_context(|| format!("loading call log {}", path.display()))?,
        ),
        None => SpyMode::Record,
    };

    let started = Instant::now();
    let mut sink = RecordingSink::with_mode(XmlTextSink::with_config(Vec::new(), config.sink_config()), mode);
    let mut encoder = GraphEncoder::of::<Vec<SaveValue>>();
    info!(root = encoder.root_name(), entries = graph.len(), "encoding sample graph");

    let (steps, slices) = {
        let mut steps = encoder.write_object(&mut sink, &graph);
        let mut slices = 0;
        loop {
            slices += 1;
            if steps.advance(config.steps_per_slice)? {
                break;
            }
            debug!(slice = slices, steps = steps.steps_taken(), "slice done");
            pause(config.slice_delay_ms).await;
        }
        (steps.steps_taken(), slices)
    };

    let divergence = sink.finish().cloned();
    let (text, log) = sink.into_parts();
    let xml = text.into_inner();
    tokio::fs::write(&config.output, &xml)
        .await
        .with_context(|| format!("writing {}", config.output.display()))?;

    if let Some(path) = &config.record {
        log.save(path)
            .with_context(|| format!("saving call log {}", path.display()))?;
        info!(path = %path.display(), calls = log.len(), "call log recorded");
    }

    Ok(RunSummary {
        output: config.output.clone(),
        bytes: xml.len(),
        steps,
        slices,
        calls: log.len(),
        divergence,
        elapsed: started.elapsed(),
    })
}
