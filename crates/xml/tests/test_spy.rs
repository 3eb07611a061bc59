//! Differential checks through the recording sink.

mod common;

use common::*;
use dcx_xml::{GraphEncoder, RecordingSink, Result, SinkCall, SinkLog, XmlTextSink};
use tempfile::TempDir;

fn record(graph: &Sample) -> Result<SinkLog> {
    let mut sink = RecordingSink::recording(XmlTextSink::new(Vec::new()));
    GraphEncoder::of::<Sample>().write_object(&mut sink, graph).finish()?;
    Ok(sink.into_log())
}

#[test]
fn test_recorded_log_replays_clean() -> Result<()> {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("sample.json");
    record(&sample())?.save(&path)?;

    let expected = SinkLog::load(&path)?;
    let mut sink = RecordingSink::comparing(XmlTextSink::new(Vec::new()), expected.clone());
    GraphEncoder::of::<Sample>().write_object(&mut sink, &sample()).finish()?;

    assert!(sink.finish().is_none());
    assert_eq!(sink.log(), &expected);
    Ok(())
}

#[test]
fn test_changed_value_is_reported() -> Result<()> {
    let expected = record(&sample())?;
    let mut changed = sample();
    changed.beta = 3;

    let mut sink = RecordingSink::comparing(XmlTextSink::new(Vec::new()), expected);
    GraphEncoder::of::<Sample>().write_object(&mut sink, &changed).finish()?;

    let divergence = sink.finish().cloned().expect("divergence");
    assert_eq!(divergence.expected, Some(SinkCall::String { text: "2".to_string() }));
    assert_eq!(divergence.actual, Some(SinkCall::String { text: "3".to_string() }));
    assert!(
        divergence
            .to_string()
            .starts_with(r#"expected WriteString("2") got WriteString("3") at line "#)
    );
    Ok(())
}

#[test]
fn test_longer_run_reports_additional_entry() -> Result<()> {
    let mut short = sample();
    short.list.pop();
    let expected = record(&short)?;

    let mut sink = RecordingSink::comparing(XmlTextSink::new(Vec::new()), expected);
    GraphEncoder::of::<Sample>().write_object(&mut sink, &sample()).finish()?;

    let divergence = sink.divergence().cloned().expect("divergence");
    assert_eq!(divergence.expected, Some(SinkCall::EndElement));
    assert_eq!(
        divergence.actual,
        Some(SinkCall::StartElement {
            prefix: None,
            local: "string".to_string(),
            ns: ARRAYS.to_string(),
        })
    );
    assert!(!sink.verified());
    Ok(())
}

#[test]
fn test_log_renders_call_lines() -> Result<()> {
    let log = record(&sample())?;
    let rendered = log.render();
    let first = rendered.lines().next().unwrap_or_default();
    assert_eq!(
        first,
        format!(r#"WriteStartElement(null, "Sample", "{ROOT}")"#)
    );
    assert!(rendered.trim_end().ends_with("Flush()"));
    Ok(())
}
