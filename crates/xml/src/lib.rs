//! # dcx-xml
//!
//! Encodes object graphs as data contract XML, the dialect of .NET's
//! `DataContractSerializer`: `ArrayOf…`/`KeyValueOf…` container names,
//! per-module namespaces with `d{depth}p{n}` prefixes, `i:type` annotations
//! where the declared type does not pin down the runtime type, `i:nil`
//! markers, and `z:Id`/`z:Ref` identity references.
//!
//! Encoding is suspendable. [`GraphEncoder::write_object`] returns a
//! [`WriteSteps`] sequence that stops before every graph node, so a driver
//! can spread one large write over many scheduling slices. The output does
//! not depend on where the write was paused.
//!
//! Types opt in through the [`dcx_contract`] traits.
//!
//! ## Example
//!
//! ```
//! use dcx_contract::{Describe, Encode, MemberDef, TypeDef, TypeHandle, View};
//!
//! struct Score { player: String, points: i32 }
//!
//! impl Describe for Score {
//!     fn describe() -> TypeDef {
//!         TypeDef::contract("Score")
//!             .member(MemberDef::data("player", |s: &Score| &s.player))
//!             .member(MemberDef::data("points", |s: &Score| &s.points))
//!     }
//! }
//!
//! impl Encode for Score {
//!     fn type_handle(&self) -> TypeHandle { Self::handle() }
//!     fn view(&self) -> View<'_> { View::Object(self) }
//! }
//!
//! let score = Score { player: "ada".to_string(), points: 7 };
//! let xml = dcx_xml::to_xml_string(&score)?;
//! assert_eq!(
//!     xml,
//!     concat!(
//!         r#"<Score xmlns:i="http://www.w3.org/2001/XMLSchema-instance" "#,
//!         r#"xmlns="http://schemas.datacontract.org/2004/07/">"#,
//!         "<player>ada</player><points>7</points></Score>",
//!     )
//! );
//! # Ok::<(), dcx_xml::EncodeError>(())
//! ```

mod classify;
mod encoder;
mod error;
mod names;
mod namespace;
mod reference;
mod schema;
mod sink;
mod steps;
mod utils;
mod writer;

use std::io::Write;

use dcx_contract::{Describe, Encode};

pub use classify::{Classification, TypeShapeClassifier};
pub use encoder::GraphEncoder;
pub use error::{EncodeError, Result, SinkError};
pub use names::TypeNameFormatter;
pub use namespace::{
    COLLECTIONS_NAMESPACE, NamespaceContext, NamespaceResolver, ROOT_NAMESPACE, SERIALIZATION_NAMESPACE,
    XSD_NAMESPACE, XSI_NAMESPACE, is_builtin_module, needs_annotation,
};
pub use reference::{Identity, ReferenceTracker};
pub use schema::{EntryDescriptor, MemberDescriptor, MemberSchemaCache, TypeDescriptor};
pub use sink::{Divergence, RecordingSink, SinkCall, SinkLog, SpyMode, XmlSink, XmlSinkConfig, XmlTextSink};
pub use steps::{Step, Visit, WriteSteps};
pub use utils::{format_double, format_float};

/// Encodes `graph` in one go and returns the XML text.
pub fn to_xml_string<T: Describe + Encode>(graph: &T) -> Result<String> {
    let bytes = to_xml_vec(graph)?;
    String::from_utf8(bytes).map_err(|e| EncodeError::Sink(SinkError::State(e.to_string())))
}

/// Encodes `graph` in one go and returns the XML bytes.
pub fn to_xml_vec<T: Describe + Encode>(graph: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    to_xml_writer(&mut buffer, graph)?;
    Ok(buffer)
}

/// Encodes `graph` in one go into `writer`.
pub fn to_xml_writer<W: Write, T: Describe + Encode>(writer: W, graph: &T) -> Result<()> {
    let mut sink = XmlTextSink::new(writer);
    let mut encoder = GraphEncoder::of::<T>();
    encoder.write_object(&mut sink, graph).finish()?;
    Ok(())
}
