//! Aggregated startup reporting
//!
//! Startup-phase failures (discovery, configuration binding,
//! construction) are collected across all candidates and surfaced
//! together, so one malformed plugin never blocks the rest.

use chrono::{DateTime, Utc};
use hakai_foundation::{HakaiError, InstanceId};
use std::fmt;
use std::time::Duration;

/// One successfully instantiated plugin.
#[derive(Debug, Clone)]
pub struct InstanceSummary {
    pub contract: &'static str,
    pub type_name: &'static str,
    pub instance: InstanceId,
}

/// One failed startup candidate.
#[derive(Debug)]
pub struct StartupFailure {
    pub contract: &'static str,
    pub type_name: &'static str,
    pub error: HakaiError,
}

/// The aggregate outcome of one bootstrap pass.
#[derive(Debug)]
pub struct StartupReport {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    /// Descriptors confirmed by the discovery scan.
    pub discovered: usize,
    pub instantiated: Vec<InstanceSummary>,
    pub failures: Vec<StartupFailure>,
    /// Set when the discovery scan ended early on its deadline.
    pub discovery_incomplete: bool,
}

impl StartupReport {
    /// Whether every candidate came up.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.discovery_incomplete
    }
}

impl fmt::Display for StartupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "startup: {} discovered, {} ready, {} failed ({} ms)",
            self.discovered,
            self.instantiated.len(),
            self.failures.len(),
            self.duration.as_millis()
        )?;
        for summary in &self.instantiated {
            writeln!(f, "  ready  {}/{}", summary.contract, summary.type_name)?;
        }
        for failure in &self.failures {
            writeln!(
                f,
                "  failed {}/{}: {}",
                failure.contract, failure.type_name, failure.error
            )?;
        }
        if self.discovery_incomplete {
            writeln!(f, "  discovery ended early on its deadline")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_ready_and_failed() {
        let report = StartupReport {
            started_at: Utc::now(),
            duration: Duration::from_millis(3),
            discovered: 2,
            instantiated: vec![InstanceSummary {
                contract: "effects",
                type_name: "paddle_expand",
                instance: InstanceId::new(),
            }],
            failures: vec![StartupFailure {
                contract: "audio",
                type_name: "sound_cues",
                error: HakaiError::config_binding("sound_cues", "required field 'volume'"),
            }],
            discovery_incomplete: false,
        };
        assert!(!report.is_clean());
        let rendered = report.to_string();
        assert!(rendered.contains("ready  effects/paddle_expand"));
        assert!(rendered.contains("failed audio/sound_cues"));
    }
}
