//! Log severity as stored in the search index.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::Level;

/// Field an event can set to raise its severity above `ERROR`,
/// e.g. `tracing::error!(severity = "fatal", "...")`.
pub const SEVERITY_FIELD: &str = "severity";

/// Ordered from most to least severe: `Panic < Fatal < ... < Trace`.
///
/// An entry is shipped when `entry <= minimum`, so a minimum of `Info` ships
/// `Panic`, `Fatal`, `Error`, `Warn` and `Info`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Severity {
    Panic,
    Fatal,
    Error,
    #[serde(rename = "WARNING")]
    #[strum(to_string = "WARNING", serialize = "WARN")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl Severity {
    /// Whether an entry of this severity passes a `minimum` threshold.
    pub fn is_enabled(self, minimum: Severity) -> bool {
        self <= minimum
    }

    /// Least severe `tracing` level that can still produce this severity.
    pub fn as_level(self) -> Level {
        match self {
            Severity::Panic | Severity::Fatal | Severity::Error => Level::ERROR,
            Severity::Warn => Level::WARN,
            Severity::Info => Level::INFO,
            Severity::Debug => Level::DEBUG,
            Severity::Trace => Level::TRACE,
        }
    }
}

impl From<&Level> for Severity {
    fn from(level: &Level) -> Self {
        match *level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warn,
            Level::INFO => Severity::Info,
            Level::DEBUG => Severity::Debug,
            _ => Severity::Trace,
        }
    }
}
