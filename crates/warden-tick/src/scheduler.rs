//! Fixed-interval tick scheduler.
//!
//! Fires on a fixed cadence (one second by default) with budget
//! monitoring, overrun handling, and pause/resume support.
//!
//! # Manual mode
//!
//! When `interval_ms` is 0 the scheduler never fires and
//! [`TickScheduler::wait_for_tick`] pends forever. Hosts that want to
//! drive sweeps themselves (tests, single-threaded embedders) use this.

use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when a tick fires late (the previous sweep overran).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickPolicy {
    /// Skip the missed tick(s) and resume from now.
    /// Safest default: sweeps never run back-to-back to make up time.
    #[default]
    Skip,
    /// Ignore the overrun: the next tick fires at its originally
    /// scheduled time, which may already be in the past.
    Drop,
}

/// Full configuration for the tick scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Tick interval in milliseconds. 0 = manual mode (never fires).
    pub interval_ms: u64,
    /// Overrun handling policy.
    pub policy: TickPolicy,
    /// Budget warning threshold (0.0–1.0). Default: 0.80 (80%).
    /// A tracing warning is emitted when a tick's sweeps take longer
    /// than this fraction of the interval.
    pub budget_warn_threshold: f64,
    /// Budget critical threshold (0.0–1.0). Default: 1.0 (100%).
    pub budget_critical_threshold: f64,
    /// Enable per-tick metrics collection.
    pub metrics_enabled: bool,
    /// Random jitter (0–max µs) added to the *first* tick so drivers
    /// started together do not sweep in lockstep.
    pub initial_jitter_us: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            policy: TickPolicy::default(),
            budget_warn_threshold: 0.80,
            budget_critical_threshold: 1.0,
            metrics_enabled: true,
            initial_jitter_us: 2_000, // 0–2 ms default jitter
        }
    }
}

impl TickConfig {
    /// Shortest supported (non-zero) interval.
    pub const MIN_INTERVAL_MS: u64 = 10;

    /// Create a config for a specific interval with sensible defaults.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval_ms: interval.as_millis() as u64,
            ..Default::default()
        }
    }

    /// A config that never fires.
    pub fn manual() -> Self {
        Self {
            interval_ms: 0,
            ..Default::default()
        }
    }

    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`TickScheduler::new`]. Rules:
    /// - non-zero `interval_ms` raised to at least [`Self::MIN_INTERVAL_MS`].
    /// - Thresholds clamped to `0.0..=1.0`.
    /// - `budget_warn_threshold` forced ≤ `budget_critical_threshold`.
    pub fn validated(mut self) -> Self {
        if self.interval_ms != 0 && self.interval_ms < Self::MIN_INTERVAL_MS {
            warn!(
                interval_ms = self.interval_ms,
                min = Self::MIN_INTERVAL_MS,
                "interval_ms below minimum — clamping"
            );
            self.interval_ms = Self::MIN_INTERVAL_MS;
        }
        self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        self.budget_critical_threshold = self.budget_critical_threshold.clamp(0.0, 1.0);
        if self.budget_warn_threshold > self.budget_critical_threshold {
            self.budget_warn_threshold = self.budget_critical_threshold;
        }
        self
    }

    /// Duration of a single tick. Returns `None` in manual mode.
    pub fn interval(&self) -> Option<Duration> {
        if self.interval_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.interval_ms))
        }
    }
}

// ---------------------------------------------------------------------------
// Tick info (returned to caller each tick)
// ---------------------------------------------------------------------------

/// Information about a fired tick, returned by [`TickScheduler::wait_for_tick`].
#[derive(Debug, Clone)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// The fixed interval. Timed state machines count ticks, not
    /// wall-clock time, so a skipped tick only delays transitions.
    pub dt: Duration,
    /// `true` if this tick fired late (scheduler detected overrun).
    pub overrun: bool,
    /// How many ticks were skipped due to overrun (0 in normal operation).
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Runtime metrics for the tick scheduler.
///
/// All timing values refer to the *sweep* execution time reported via
/// [`TickScheduler::record_tick_end`].
#[derive(Debug, Clone, Default)]
pub struct TickMetrics {
    /// Total ticks executed.
    pub total_ticks: u64,
    /// Total overruns detected.
    pub total_overruns: u64,
    /// Total ticks skipped (Skip policy).
    pub total_skipped: u64,
    /// Exponential moving average of sweep time (α = 0.1).
    pub avg_tick_time: Duration,
    /// Maximum sweep time observed.
    pub max_tick_time: Duration,
    /// Current budget utilization (0.0–∞). >1.0 means overrun.
    pub budget_utilization: f64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-interval tick scheduler.
///
/// One per [`TickDriver`](crate::TickDriver). Sweeps run between
/// `wait_for_tick` and `record_tick_end`, so a slow sweep can delay the
/// next tick but never overlap it.
pub struct TickScheduler {
    config: TickConfig,
    interval: Option<Duration>,
    tick_count: u64,
    /// When the next tick should fire (Tokio instant for `sleep_until`).
    next_tick: Option<TokioInstant>,
    /// Wall-clock instant when the current tick's sweeps started.
    /// Set by `wait_for_tick`, consumed by `record_tick_end`.
    tick_start: Option<Instant>,
    paused: bool,
    metrics: TickMetrics,
}

impl TickScheduler {
    /// Create a new scheduler from config.
    ///
    /// The first tick is scheduled with optional jitter.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        let interval = config.interval();

        let next_tick = interval.map(|d| {
            let jitter = if config.initial_jitter_us > 0 {
                let us = rand::rng().random_range(0..config.initial_jitter_us);
                Duration::from_micros(us)
            } else {
                Duration::ZERO
            };
            TokioInstant::now() + d + jitter
        });

        match interval {
            None => debug!("tick scheduler created in manual mode (never fires)"),
            Some(d) => debug!(
                interval_ms = d.as_millis() as u64,
                policy = ?config.policy,
                "tick scheduler created"
            ),
        }

        Self {
            config,
            interval,
            tick_count: 0,
            next_tick,
            tick_start: None,
            paused: false,
            metrics: TickMetrics::default(),
        }
    }

    /// Create a scheduler for a specific interval with default settings.
    pub fn with_interval(interval: Duration) -> Self {
        Self::new(TickConfig::with_interval(interval))
    }

    /// Wait until the next tick is due. Returns [`TickInfo`] for the tick.
    ///
    /// In manual mode or when paused, this future pends forever; inside
    /// `tokio::select!` the other branches are still processed.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let (next, interval) = match (self.next_tick, self.interval) {
            (Some(next), Some(interval)) if !self.paused => (next, interval),
            _ => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        time::sleep_until(next).await;

        let now = TokioInstant::now();
        self.tick_count += 1;
        self.tick_start = Some(Instant::now());

        // Detect overrun: did we wake up significantly late?
        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > interval / 10; // >10% late = overrun
        let mut ticks_skipped = 0u64;

        self.next_tick = Some(match self.config.policy {
            TickPolicy::Skip => {
                if overrun {
                    ticks_skipped = (late_by.as_nanos() / interval.as_nanos()) as u64;
                    if ticks_skipped > 0 {
                        warn!(
                            tick = self.tick_count,
                            skipped = ticks_skipped,
                            late_ms = late_by.as_secs_f64() * 1000.0,
                            "tick overrun — skipping ahead"
                        );
                    }
                }
                // Always schedule from now, not from the missed deadline.
                now + interval
            }
            TickPolicy::Drop => {
                if overrun {
                    warn!(
                        tick = self.tick_count,
                        late_ms = late_by.as_secs_f64() * 1000.0,
                        "tick overrun — dropping (next tick at original schedule)"
                    );
                }
                next + interval
            }
        });

        if overrun {
            self.metrics.total_overruns += 1;
        }
        self.metrics.total_skipped += ticks_skipped;
        self.metrics.total_ticks += 1;

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            dt: interval,
            overrun,
            ticks_skipped,
        }
    }

    /// Record that the sweeps for the current tick have finished.
    ///
    /// Enables budget monitoring and metrics. If not called, budget
    /// warnings won't fire.
    pub fn record_tick_end(&mut self) {
        let Some(start) = self.tick_start.take() else {
            return;
        };
        let elapsed = start.elapsed();

        if let Some(budget) = self.interval {
            let utilization = elapsed.as_secs_f64() / budget.as_secs_f64();
            self.metrics.budget_utilization = utilization;

            if utilization >= self.config.budget_critical_threshold {
                warn!(
                    tick = self.tick_count,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    budget_ms = budget.as_secs_f64() * 1000.0,
                    utilization_pct = format!("{:.1}", utilization * 100.0),
                    "CRITICAL: sweep exceeded tick interval"
                );
            } else if utilization >= self.config.budget_warn_threshold {
                warn!(
                    tick = self.tick_count,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    budget_ms = budget.as_secs_f64() * 1000.0,
                    utilization_pct = format!("{:.1}", utilization * 100.0),
                    "sweep approaching tick interval"
                );
            }
        }

        if self.config.metrics_enabled {
            if elapsed > self.metrics.max_tick_time {
                self.metrics.max_tick_time = elapsed;
            }
            // Exponential moving average (α = 0.1).
            let alpha = 0.1;
            let prev = self.metrics.avg_tick_time.as_secs_f64();
            let curr = elapsed.as_secs_f64();
            self.metrics.avg_tick_time =
                Duration::from_secs_f64(prev * (1.0 - alpha) + curr * alpha);
        }
    }

    /// Pause the tick loop. `wait_for_tick` will pend until [`resume`](Self::resume) is called.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(tick = self.tick_count, "tick scheduler paused");
        }
    }

    /// Resume the tick loop after a pause.
    ///
    /// Resets the next-tick deadline to `now + interval` so the time
    /// spent paused is not reported as an overrun.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            if let Some(interval) = self.interval {
                self.next_tick = Some(TokioInstant::now() + interval);
            }
            debug!(tick = self.tick_count, "tick scheduler resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether this scheduler is in manual mode (interval = 0).
    pub fn is_manual(&self) -> bool {
        self.interval.is_none()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Snapshot of current metrics.
    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }

    /// The fixed tick interval, or `None` in manual mode.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}
