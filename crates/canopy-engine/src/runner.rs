//! Tick loop.

use canopy_sim::{CommunityStats, Environment};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::RunConfig;

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Ran the requested number of ticks
    Completed,
    /// Every plant died
    Extinct,
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Ticks executed
    pub ticks_run: u64,
    /// Why the loop ended
    pub stop_reason: StopReason,
    /// Plants removed during this run
    pub removed: usize,
    /// Showers during this run
    pub showers: u32,
    /// Wall time spent, in milliseconds
    pub elapsed_ms: u128,
}

/// Drive `env` for `run.ticks` ticks.
pub fn run(env: &mut Environment, run: &RunConfig) -> RunSummary {
    let started = Instant::now();
    let showers_before = env.shower_count();
    let interval = Duration::from_millis(run.tick_interval_ms);
    let log_interval = run.log_interval.max(1);

    let mut removed = 0;
    let mut ticks_run = 0;
    let mut stop_reason = StopReason::Completed;

    for _ in 0..run.ticks {
        let report = env.tick();
        ticks_run += 1;
        removed += report.removed;

        if report.removed > 0 {
            debug!(step = report.step, removed = report.removed, "Plants culled");
        }
        if ticks_run % log_interval == 0 {
            let stats = CommunityStats::collect(env);
            info!(
                step = report.step,
                hour = report.hour,
                raining = report.raining,
                alive = stats.plant_count,
                dead = stats.dead_count,
                avg_health = stats.average_health,
                "Community"
            );
        }

        if run.stop_when_extinct && report.alive == 0 {
            info!(step = report.step, "Every plant has died");
            stop_reason = StopReason::Extinct;
            break;
        }
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    let summary = RunSummary {
        ticks_run,
        stop_reason,
        removed,
        showers: env.shower_count() - showers_before,
        elapsed_ms: started.elapsed().as_millis(),
    };
    info!(
        ticks = summary.ticks_run,
        removed = summary.removed,
        showers = summary.showers,
        elapsed_ms = summary.elapsed_ms as u64,
        "Run finished"
    );
    summary
}
