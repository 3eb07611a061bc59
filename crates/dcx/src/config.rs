//! Driver configuration.
//!
//! Every option can be given on the command line or through the environment.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DCX_OUTPUT` | output.xml | XML output file |
//! | `DCX_STEPS_PER_SLICE` | 1 | Encoder steps per scheduling slice |
//! | `DCX_SLICE_DELAY_MS` | 0 | Pause between slices (0 yields instead) |
//! | `DCX_LOG_LEVEL` | info | Log level |
//! | `DCX_INDENT` | true | Tab-indent the output and write an XML declaration |
//! | `DCX_CONTAINERS` | 2 | Largest `Container(n)` fixture |
//! | `DCX_RECORD` | | Save the sink call log to this file |
//! | `DCX_COMPARE` | | Compare sink calls against this log |

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use dcx_xml::XmlSinkConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "dcx")]
#[command(about = "Encodes the sample graphs as data contract XML, one slice at a time")]
pub struct DriverConfig {
    /// File the XML is written to.
    #[arg(short, long, env = "DCX_OUTPUT", default_value = "output.xml")]
    pub output: PathBuf,

    /// Encoder steps taken per scheduling slice.
    #[arg(long, env = "DCX_STEPS_PER_SLICE", default_value = "1")]
    pub steps_per_slice: usize,

    /// Milliseconds to sleep between slices; 0 yields to the runtime instead.
    #[arg(long, env = "DCX_SLICE_DELAY_MS", default_value = "0")]
    pub slice_delay_ms: u64,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "DCX_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Tab-indent the output and start it with an XML declaration.
    #[arg(long, env = "DCX_INDENT", default_value = "true", action = ArgAction::Set)]
    pub indent: bool,

    /// Largest `Container(n)` fixture; `Container(0..=n)` are all written.
    #[arg(long, env = "DCX_CONTAINERS", default_value = "2")]
    pub containers: usize,

    /// Record every sink call to this JSON file.
    #[arg(long, env = "DCX_RECORD")]
    pub record: Option<PathBuf>,

    /// Check every sink call against the log in this JSON file.
    #[arg(long, env = "DCX_COMPARE")]
    pub compare: Option<PathBuf>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("output.xml"),
            steps_per_slice: 1,
            slice_delay_ms: 0,
            log_level: "info".to_string(),
            indent: true,
            containers: 2,
            record: None,
            compare: None,
        }
    }
}

impl DriverConfig {
    /// Reads the configuration from `DCX_*` variables only, ignoring the
    /// command line. Falls back to defaults if any variable is malformed.
    pub fn from_env() -> Self {
        Self::try_parse_from(["dcx"]).unwrap_or_default()
    }

    pub fn sink_config(&self) -> XmlSinkConfig {
        if self.indent {
            XmlSinkConfig {
                indent: Some((b'\t', 1)),
                declaration: true,
            }
        } else {
            XmlSinkConfig::default()
        }
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.steps_per_slice == 0 {
            errors.push("Steps per slice cannot be 0".to_string());
        }

        if self.containers > usize::from(u8::MAX) {
            errors.push(format!("Containers cannot exceed {}", u8::MAX));
        }

        if self.record.is_some() && self.compare.is_some() {
            errors.push("Record and compare cannot be used together".to_string());
        }

        if self.output.as_os_str().is_empty() {
            errors.push("Output path cannot be empty".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Unindented output and a large slice budget.
    pub fn for_testing(output: PathBuf) -> Self {
        Self {
            output,
            steps_per_slice: 64,
            log_level: "debug".to_string(),
            indent: false,
            ..Default::default()
        }
    }
}
