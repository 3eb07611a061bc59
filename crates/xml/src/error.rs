//! Error types for the encoder and its sinks.

use thiserror::Error;

/// Errors raised by an [`XmlSink`](crate::XmlSink).
#[derive(Error, Debug)]
pub enum SinkError {
    /// I/O failure in the underlying writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// quick-xml rejected a write.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An element, attribute or prefix name is not a valid XML name.
    #[error("invalid XML name: {0:?}")]
    InvalidName(String),

    /// The call is not valid in the sink's current state.
    #[error("invalid sink state: {0}")]
    State(String),

    /// Text holds a character that XML 1.0 cannot carry.
    #[error("character {0:?} is not allowed in XML text")]
    InvalidChar(char),

    /// A recorded call log could not be read or written.
    #[error("call log error: {0}")]
    Log(#[from] serde_json::Error),
}

impl SinkError {
    pub(crate) fn state(message: impl Into<String>) -> Self {
        SinkError::State(message.into())
    }
}

/// Errors raised while encoding an object graph.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The output sink failed. The sink may hold a partial document.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// A member accessor did not accept the instance it was handed.
    #[error("cannot read member `{member}` of `{type_name}`")]
    MemberAccess { type_name: String, member: String },

    /// A non-object type reported a view of another shape.
    #[error("`{type_name}` is described as {shape} but its view is {view}")]
    ShapeMismatch { type_name: String, shape: String, view: String },
}

/// Result type for encoding operations.
pub type Result<T> = std::result::Result<T, EncodeError>;
