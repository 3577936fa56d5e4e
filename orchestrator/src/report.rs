//! Result sinks.

use comms::specs::Report;
use log::warn;
use tokio::sync::mpsc;

/// Emits the result of an evaluated query.
///
/// Reporters are called from reaper tasks, concurrently, and must not block
/// for long.
pub trait Reporter: Send + Sync {
    fn report(&self, report: &Report);
}

/// Prints one human readable line per result to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReporter;

impl Reporter for TextReporter {
    fn report(&self, report: &Report) {
        println!("{report}");
    }
}

/// Prints one JSON object per result to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn report(&self, report: &Report) {
        match serde_json::to_string(report) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("failed to encode result {report}: {e}"),
        }
    }
}

/// Forwards results to a channel, used to collect them in-process.
impl Reporter for mpsc::UnboundedSender<Report> {
    fn report(&self, report: &Report) {
        if self.send(*report).is_err() {
            warn!("result collector is gone, dropping: {report}");
        }
    }
}
