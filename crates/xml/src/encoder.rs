//! Entry point of the encoder.

use std::cell::Cell;
use std::rc::Rc;

use dcx_contract::{Describe, Encode, TypeHandle};
use tracing::debug;

use crate::error::EncodeError;
use crate::names::TypeNameFormatter;
use crate::namespace::ROOT_NAMESPACE;
use crate::schema::MemberSchemaCache;
use crate::sink::XmlSink;
use crate::steps::WriteSteps;
use crate::writer::GraphWriter;

/// Encodes object graphs of one root type.
///
/// The encoder owns the [`MemberSchemaCache`], so descriptors built for one
/// write are reused by the next. Everything else (namespace stack, depth,
/// reference tokens) is fresh for every [`write_object`](Self::write_object).
#[derive(Debug)]
pub struct GraphEncoder {
    root: TypeHandle,
    root_name: String,
    schema: MemberSchemaCache,
}

impl GraphEncoder {
    pub fn new(root: TypeHandle) -> Self {
        Self {
            root,
            root_name: TypeNameFormatter::format_handle(root),
            schema: MemberSchemaCache::new(),
        }
    }

    pub fn of<T: Describe>() -> Self {
        Self::new(T::handle())
    }

    pub fn root(&self) -> TypeHandle {
        self.root
    }

    /// Name of the document element, e.g. `ArrayOfAsyncSerializer.SaveValue`.
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn schema(&self) -> &MemberSchemaCache {
        &self.schema
    }

    /// Starts writing `graph` to `sink`.
    ///
    /// Nothing is written until the returned [`WriteSteps`] is advanced. Each
    /// step stops right before the next graph node; the output is the same
    /// however the steps are spread out.
    ///
    /// ```
    /// use dcx_xml::{GraphEncoder, XmlTextSink};
    ///
    /// let values = vec![1, 2];
    /// let mut sink = XmlTextSink::new(Vec::new());
    /// let mut encoder = GraphEncoder::of::<Vec<i32>>();
    /// let mut steps = encoder.write_object(&mut sink, &values);
    /// while !steps.advance(1)? {}
    /// drop(steps);
    ///
    /// let xml = String::from_utf8(sink.into_inner()).unwrap();
    /// assert!(xml.starts_with("<ArrayOfint"));
    /// # Ok::<(), dcx_xml::EncodeError>(())
    /// ```
    pub fn write_object<'a>(&'a mut self, sink: &'a mut dyn XmlSink, graph: &'a dyn Encode) -> WriteSteps<'a> {
        let cursor = Rc::new(Cell::new(None));
        let root = self.root;
        let name = self.root_name.as_str();
        let mut writer = GraphWriter::new(sink, &mut self.schema, Rc::clone(&cursor));
        let task = async move {
            debug!(root = name, "write started");
            writer.write_root(root, name, ROOT_NAMESPACE, graph).await?;
            debug!(root = name, "write complete");
            Ok::<(), EncodeError>(())
        };
        WriteSteps::new(Box::pin(task), cursor)
    }
}
