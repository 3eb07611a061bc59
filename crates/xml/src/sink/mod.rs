//! The streaming XML writer capability the encoder writes to.
//!
//! [`XmlTextSink`] renders calls as XML text through quick-xml;
//! [`RecordingSink`] decorates any sink to record or replay its calls.

mod spy;
mod text;

pub use spy::{Divergence, RecordingSink, SinkCall, SinkLog, SpyMode};
pub use text::{XmlSinkConfig, XmlTextSink};

use crate::error::SinkError;

/// Write-only, append-only XML writer.
///
/// Attributes are written between `write_start_element` and the first
/// content or child; `write_qualified_name` and `write_string` inside an open
/// attribute contribute to its value. Namespace declarations are ordinary
/// attributes in the `xmlns` prefix (or the bare `xmlns` attribute).
pub trait XmlSink {
    fn write_start_element(&mut self, prefix: Option<&str>, local: &str, ns: &str) -> Result<(), SinkError>;

    fn write_end_element(&mut self) -> Result<(), SinkError>;

    fn write_start_attribute(&mut self, prefix: Option<&str>, local: &str, ns: &str) -> Result<(), SinkError>;

    fn write_end_attribute(&mut self) -> Result<(), SinkError>;

    /// Writes `prefix:local` for the prefix bound to `ns`, binding one if needed.
    fn write_qualified_name(&mut self, local: &str, ns: &str) -> Result<(), SinkError>;

    /// Writes text, escaping it as needed.
    fn write_string(&mut self, text: &str) -> Result<(), SinkError>;

    /// The prefix currently bound to `ns`, `Some("")` for the default namespace.
    fn lookup_prefix(&mut self, ns: &str) -> Option<String>;

    fn write_attribute_string(
        &mut self,
        prefix: Option<&str>,
        local: &str,
        ns: &str,
        value: &str,
    ) -> Result<(), SinkError> {
        self.write_start_attribute(prefix, local, ns)?;
        self.write_string(value)?;
        self.write_end_attribute()
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: XmlSink + ?Sized> XmlSink for &mut S {
    fn write_start_element(&mut self, prefix: Option<&str>, local: &str, ns: &str) -> Result<(), SinkError> {
        (**self).write_start_element(prefix, local, ns)
    }

    fn write_end_element(&mut self) -> Result<(), SinkError> {
        (**self).write_end_element()
    }

    fn write_start_attribute(&mut self, prefix: Option<&str>, local: &str, ns: &str) -> Result<(), SinkError> {
        (**self).write_start_attribute(prefix, local, ns)
    }

    fn write_end_attribute(&mut self) -> Result<(), SinkError> {
        (**self).write_end_attribute()
    }

    fn write_qualified_name(&mut self, local: &str, ns: &str) -> Result<(), SinkError> {
        (**self).write_qualified_name(local, ns)
    }

    fn write_string(&mut self, text: &str) -> Result<(), SinkError> {
        (**self).write_string(text)
    }

    fn lookup_prefix(&mut self, ns: &str) -> Option<String> {
        (**self).lookup_prefix(ns)
    }

    fn write_attribute_string(
        &mut self,
        prefix: Option<&str>,
        local: &str,
        ns: &str,
        value: &str,
    ) -> Result<(), SinkError> {
        (**self).write_attribute_string(prefix, local, ns, value)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}
