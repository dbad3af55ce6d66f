//! JSON run report.

use canopy_common::{CanopyError, CanopyResult};
use canopy_sim::{CommunityStats, Environment, EnvironmentSnapshot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

use crate::runner::RunSummary;

/// Everything written at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Seed the run used
    pub seed: u64,
    /// Loop outcome
    pub summary: RunSummary,
    /// Final community statistics
    pub stats: CommunityStats,
    /// Final state
    pub snapshot: EnvironmentSnapshot,
}

impl RunReport {
    /// Build a report from the final environment.
    #[must_use]
    pub fn new(env: &Environment, summary: RunSummary) -> Self {
        Self {
            seed: env.seed(),
            summary,
            stats: CommunityStats::collect(env),
            snapshot: env.snapshot(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> CanopyResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CanopyError::Serialization(e.to_string()))
    }

    /// Write to `path`, or to stdout when `None`.
    pub fn write(&self, path: Option<&Path>) -> CanopyResult<()> {
        let json = self.to_json()?;
        match path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, json)?;
                info!("Wrote report to {}", path.display());
            },
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(json.as_bytes())?;
                stdout.write_all(b"\n")?;
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::runner;
    use tempfile::TempDir;

    fn finished_run() -> RunReport {
        let mut env = Environment::with_seed(120, 120, 5, 11).expect("environment");
        let summary = runner::run(
            &mut env,
            &RunConfig {
                ticks: 12,
                ..RunConfig::default()
            },
        );
        RunReport::new(&env, summary)
    }

    #[test]
    fn test_report_contents() {
        let report = finished_run();
        assert_eq!(report.seed, 11);
        assert_eq!(report.snapshot.step, 12);
        assert_eq!(report.stats.plant_count, report.snapshot.plants.len());
    }

    #[test]
    fn test_report_written_to_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("out").join("report.json");
        let report = finished_run();

        report.write(Some(&path)).expect("write report");

        let contents = fs::read_to_string(&path).expect("read report");
        let parsed: serde_json::Value = serde_json::from_str(&contents).expect("json");
        assert_eq!(parsed["seed"], 11);
        assert_eq!(parsed["summary"]["ticks_run"], 12);
        assert!(parsed["snapshot"]["plants"].is_array());
    }
}
