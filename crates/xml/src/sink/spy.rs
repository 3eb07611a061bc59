//! A sink decorator that records every call, or checks calls against a
//! recording, for differential testing of two encoders.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::error;

use super::XmlSink;
use crate::error::SinkError;

/// One call made to an [`XmlSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SinkCall {
    StartElement {
        prefix: Option<String>,
        local: String,
        ns: String,
    },
    EndElement,
    StartAttribute {
        prefix: Option<String>,
        local: String,
        ns: String,
    },
    EndAttribute,
    QualifiedName {
        local: String,
        ns: String,
    },
    String {
        text: String,
    },
    LookupPrefix {
        ns: String,
        result: Option<String>,
    },
    Flush,
}

struct Quoted<'a>(Option<&'a str>);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(text) => write!(f, "\"{}\"", text.replace('\n', "\\n")),
            None => f.write_str("null"),
        }
    }
}

fn quoted(text: &str) -> Quoted<'_> {
    Quoted(Some(text))
}

impl fmt::Display for SinkCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkCall::StartElement { prefix, local, ns } => write!(
                f,
                "WriteStartElement({}, {}, {})",
                Quoted(prefix.as_deref()),
                quoted(local),
                quoted(ns)
            ),
            SinkCall::EndElement => f.write_str("WriteEndElement()"),
            SinkCall::StartAttribute { prefix, local, ns } => write!(
                f,
                "WriteStartAttribute({}, {}, {})",
                Quoted(prefix.as_deref()),
                quoted(local),
                quoted(ns)
            ),
            SinkCall::EndAttribute => f.write_str("WriteEndAttribute()"),
            SinkCall::QualifiedName { local, ns } => {
                write!(f, "WriteQualifiedName({}, {})", quoted(local), quoted(ns))
            }
            SinkCall::String { text } => write!(f, "WriteString({})", quoted(text)),
            SinkCall::LookupPrefix { ns, result } => {
                write!(f, "LookupPrefix({}) -> {}", quoted(ns), Quoted(result.as_deref()))
            }
            SinkCall::Flush => f.write_str("Flush()"),
        }
    }
}

/// An ordered list of sink calls. Saved and loaded as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkLog {
    calls: Vec<SinkCall>,
}

impl SinkLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, call: SinkCall) {
        self.calls.push(call);
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SinkError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SinkError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// One line per call, in the `WriteStartElement(null, "x", "ns")` form.
    pub fn render(&self) -> String {
        self.calls.iter().map(|call| format!("{call}\n")).collect()
    }
}

impl From<Vec<SinkCall>> for SinkLog {
    fn from(calls: Vec<SinkCall>) -> Self {
        Self { calls }
    }
}

/// The first call that differs from the recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    /// 1-based position in the log.
    pub position: usize,
    /// `None` when the live run made more calls than were recorded.
    pub expected: Option<SinkCall>,
    /// `None` when the live run stopped before the recording did.
    pub actual: Option<SinkCall>,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.expected, &self.actual) {
            (Some(expected), Some(actual)) => {
                write!(f, "expected {expected} got {actual} at line {}", self.position)
            }
            (None, Some(actual)) => write!(f, "additional entry {actual} at line {}", self.position),
            (Some(expected), None) => write!(f, "missing entry {expected} at line {}", self.position),
            (None, None) => write!(f, "divergence at line {}", self.position),
        }
    }
}

/// Whether a [`RecordingSink`] records or compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpyMode {
    Record,
    Compare(SinkLog),
}

/// Forwards every call to an inner sink and logs it.
///
/// In [`SpyMode::Compare`] each call is also checked against the expected
/// log; only the first divergence is kept. The log always holds the calls
/// actually made.
pub struct RecordingSink<S: XmlSink> {
    inner: S,
    mode: SpyMode,
    log: SinkLog,
    divergence: Option<Divergence>,
}

impl<S: XmlSink> RecordingSink<S> {
    pub fn recording(inner: S) -> Self {
        Self::with_mode(inner, SpyMode::Record)
    }

    pub fn comparing(inner: S, expected: SinkLog) -> Self {
        Self::with_mode(inner, SpyMode::Compare(expected))
    }

    pub fn with_mode(inner: S, mode: SpyMode) -> Self {
        Self {
            inner,
            mode,
            log: SinkLog::new(),
            divergence: None,
        }
    }

    pub fn mode(&self) -> &SpyMode {
        &self.mode
    }

    pub fn log(&self) -> &SinkLog {
        &self.log
    }

    /// `true` while no divergence has been seen.
    pub fn verified(&self) -> bool {
        self.divergence.is_none()
    }

    pub fn divergence(&self) -> Option<&Divergence> {
        self.divergence.as_ref()
    }

    /// Ends a comparison: a recording longer than the live run is a divergence.
    pub fn finish(&mut self) -> Option<&Divergence> {
        if let SpyMode::Compare(expected) = &self.mode
            && self.divergence.is_none()
            && expected.len() > self.log.len()
        {
            let position = self.log.len() + 1;
            let divergence = Divergence {
                position,
                expected: expected.calls().get(position - 1).cloned(),
                actual: None,
            };
            error!(%divergence, "sink call log diverged");
            self.divergence = Some(divergence);
        }
        self.divergence.as_ref()
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn into_log(self) -> SinkLog {
        self.log
    }

    pub fn into_parts(self) -> (S, SinkLog) {
        (self.inner, self.log)
    }

    fn record(&mut self, call: SinkCall) {
        if let SpyMode::Compare(expected) = &self.mode
            && self.divergence.is_none()
        {
            let position = self.log.len() + 1;
            let expected = expected.calls().get(position - 1);
            if expected != Some(&call) {
                let divergence = Divergence {
                    position,
                    expected: expected.cloned(),
                    actual: Some(call.clone()),
                };
                error!(%divergence, "sink call log diverged");
                self.divergence = Some(divergence);
            }
        }
        self.log.push(call);
    }
}

fn owned(prefix: Option<&str>) -> Option<String> {
    prefix.map(str::to_string)
}

impl<S: XmlSink> XmlSink for RecordingSink<S> {
    fn write_start_element(&mut self, prefix: Option<&str>, local: &str, ns: &str) -> Result<(), SinkError> {
        self.record(SinkCall::StartElement {
            prefix: owned(prefix),
            local: local.to_string(),
            ns: ns.to_string(),
        });
        self.inner.write_start_element(prefix, local, ns)
    }

    fn write_end_element(&mut self) -> Result<(), SinkError> {
        self.record(SinkCall::EndElement);
        self.inner.write_end_element()
    }

    fn write_start_attribute(&mut self, prefix: Option<&str>, local: &str, ns: &str) -> Result<(), SinkError> {
        self.record(SinkCall::StartAttribute {
            prefix: owned(prefix),
            local: local.to_string(),
            ns: ns.to_string(),
        });
        self.inner.write_start_attribute(prefix, local, ns)
    }

    fn write_end_attribute(&mut self) -> Result<(), SinkError> {
        self.record(SinkCall::EndAttribute);
        self.inner.write_end_attribute()
    }

    fn write_qualified_name(&mut self, local: &str, ns: &str) -> Result<(), SinkError> {
        self.record(SinkCall::QualifiedName {
            local: local.to_string(),
            ns: ns.to_string(),
        });
        self.inner.write_qualified_name(local, ns)
    }

    fn write_string(&mut self, text: &str) -> Result<(), SinkError> {
        self.record(SinkCall::String { text: text.to_string() });
        self.inner.write_string(text)
    }

    fn lookup_prefix(&mut self, ns: &str) -> Option<String> {
        let result = self.inner.lookup_prefix(ns);
        self.record(SinkCall::LookupPrefix {
            ns: ns.to_string(),
            result: result.clone(),
        });
        result
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.record(SinkCall::Flush);
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::XmlTextSink;

    #[test]
    fn test_call_display() {
        let call = SinkCall::StartElement {
            prefix: None,
            local: "Key".to_string(),
            ns: "urn:a".to_string(),
        };
        assert_eq!(call.to_string(), r#"WriteStartElement(null, "Key", "urn:a")"#);

        let lookup = SinkCall::LookupPrefix {
            ns: "urn:a".to_string(),
            result: Some("d1p1".to_string()),
        };
        assert_eq!(lookup.to_string(), r#"LookupPrefix("urn:a") -> "d1p1""#);

        let text = SinkCall::String {
            text: "a\nb".to_string(),
        };
        assert_eq!(text.to_string(), r#"WriteString("a\nb")"#);
    }

    #[test]
    fn test_divergence_display() {
        let divergence = Divergence {
            position: 3,
            expected: None,
            actual: Some(SinkCall::EndElement),
        };
        assert_eq!(divergence.to_string(), "additional entry WriteEndElement() at line 3");
    }

    #[test]
    fn test_log_round_trips_through_json() -> Result<(), SinkError> {
        let log = SinkLog::from(vec![
            SinkCall::String { text: "x".to_string() },
            SinkCall::LookupPrefix {
                ns: "urn:a".to_string(),
                result: None,
            },
        ]);
        let mut buffer = Vec::new();
        log.to_writer(&mut buffer)?;
        assert_eq!(SinkLog::from_reader(buffer.as_slice())?, log);
        Ok(())
    }

    #[test]
    fn test_compare_flags_first_difference_only() -> Result<(), SinkError> {
        let expected = SinkLog::from(vec![
            SinkCall::StartElement {
                prefix: None,
                local: "a".to_string(),
                ns: String::new(),
            },
            SinkCall::String { text: "1".to_string() },
            SinkCall::EndElement,
        ]);
        let mut sink = RecordingSink::comparing(XmlTextSink::new(Vec::new()), expected);
        sink.write_start_element(None, "a", "")?;
        sink.write_string("2")?;
        sink.write_string("3")?;
        sink.write_end_element()?;

        let divergence = sink.divergence().cloned();
        assert_eq!(
            divergence,
            Some(Divergence {
                position: 2,
                expected: Some(SinkCall::String { text: "1".to_string() }),
                actual: Some(SinkCall::String { text: "2".to_string() }),
            })
        );
        assert_eq!(sink.log().len(), 4);
        Ok(())
    }

    #[test]
    fn test_finish_reports_missing_tail() -> Result<(), SinkError> {
        let expected = SinkLog::from(vec![
            SinkCall::StartElement {
                prefix: None,
                local: "a".to_string(),
                ns: String::new(),
            },
            SinkCall::EndElement,
        ]);
        let mut sink = RecordingSink::comparing(XmlTextSink::new(Vec::new()), expected);
        sink.write_start_element(None, "a", "")?;
        assert!(sink.verified());

        let divergence = sink.finish().cloned();
        assert_eq!(
            divergence,
            Some(Divergence {
                position: 2,
                expected: Some(SinkCall::EndElement),
                actual: None,
            })
        );
        Ok(())
    }
}
