//! Runs the driver end to end against temporary files.

use std::path::PathBuf;

use anyhow::Result;
use dcx::{DriverConfig, run};
use dcx_xml::{SinkCall, SinkLog};
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> DriverConfig {
    DriverConfig::for_testing(dir.path().join("output.xml"))
}

#[tokio::test]
async fn test_run_writes_whole_document() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config_in(&dir);
    let summary = run(&config).await?;

    let xml = std::fs::read_to_string(&config.output)?;
    assert_eq!(xml, dcx_xml::to_xml_string(&dcx::fixtures::save_values(config.containers))?);
    assert_eq!(summary.bytes, xml.len());
    assert!(summary.verified());
    assert!(summary.calls > 0);
    Ok(())
}

#[tokio::test]
async fn test_slice_size_changes_slices_not_output() -> Result<()> {
    let dir = TempDir::new()?;
    let mut outputs = Vec::new();
    let mut summaries = Vec::new();
    for (index, per_slice) in [1usize, 7, 10_000].into_iter().enumerate() {
        let config = DriverConfig {
            output: dir.path().join(format!("out{index}.xml")),
            steps_per_slice: per_slice,
            ..DriverConfig::for_testing(PathBuf::new())
        };
        summaries.push(run(&config).await?);
        outputs.push(std::fs::read(&config.output)?);
    }

    assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(summaries.iter().all(|summary| summary.steps == summaries[0].steps));
    assert_eq!(summaries[0].slices, summaries[0].steps + 1);
    assert_eq!(summaries[2].slices, 1);
    Ok(())
}

#[tokio::test]
async fn test_record_then_compare() -> Result<()> {
    let dir = TempDir::new()?;
    let log_path = dir.path().join("calls.json");

    let record = DriverConfig {
        record: Some(log_path.clone()),
        ..config_in(&dir)
    };
    let recorded = run(&record).await?;
    let log = SinkLog::load(&log_path)?;
    assert_eq!(log.len(), recorded.calls);
    assert_eq!(log.calls().last(), Some(&SinkCall::Flush));

    let compare = DriverConfig {
        compare: Some(log_path),
        steps_per_slice: 3,
        ..config_in(&dir)
    };
    let compared = run(&compare).await?;
    assert!(compared.verified(), "{:?}", compared.divergence);
    Ok(())
}

#[tokio::test]
async fn test_compare_reports_divergence() -> Result<()> {
    let dir = TempDir::new()?;
    let log_path = dir.path().join("calls.json");

    let fewer = DriverConfig {
        record: Some(log_path.clone()),
        containers: 1,
        ..config_in(&dir)
    };
    run(&fewer).await?;

    let more = DriverConfig {
        compare: Some(log_path),
        containers: 2,
        ..config_in(&dir)
    };
    let summary = run(&more).await?;
    let divergence = summary.divergence.expect("divergence");
    assert!(divergence.position > 1);
    assert!(divergence.to_string().contains(" at line "));
    Ok(())
}

#[tokio::test]
async fn test_missing_compare_log_fails() {
    let dir = TempDir::new().expect("temp dir");
    let config = DriverConfig {
        compare: Some(dir.path().join("absent.json")),
        ..config_in(&dir)
    };
    let err = run(&config).await.unwrap_err();
    assert!(err.to_string().contains("loading call log"));
}
