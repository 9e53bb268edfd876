//! Background sweep driver: a [`TickScheduler`] running in its own task.
//!
//! ```text
//! TickDriver::start()
//!     └─ tokio::spawn ── loop {
//!            select! {
//!                shutdown  → break
//!                pause     → scheduler.pause() / resume()
//!                tick      → sweep₁, sweep₂, … (in registration order)
//!                            record_tick_end()
//!            }
//!        }
//! ```
//!
//! Sweeps are synchronous and run back-to-back inside the task, so one
//! tick's sweeps always finish before the next tick is awaited. A slow
//! sweep is handled by the scheduler's [`TickPolicy`](crate::TickPolicy),
//! never by running two sweeps at once.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{TickConfig, TickError, TickInfo, TickMetrics, TickScheduler};

/// A job run on every tick.
pub trait Sweep: Send + Sync + 'static {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Advances timed state by one tick. Must not block.
    fn sweep(&self, tick: &TickInfo);
}

struct Running {
    shutdown: watch::Sender<bool>,
    paused: watch::Sender<bool>,
    task: JoinHandle<TickMetrics>,
}

/// Owns the recurring job that drives a list of [`Sweep`]s.
pub struct TickDriver {
    name: &'static str,
    config: TickConfig,
    sweeps: Vec<Arc<dyn Sweep>>,
    running: Option<Running>,
}

impl TickDriver {
    pub fn new(name: &'static str, config: TickConfig) -> Self {
        Self {
            name,
            config,
            sweeps: Vec::new(),
            running: None,
        }
    }

    /// Appends a sweep. Sweeps run in the order they were added.
    pub fn with_sweep(mut self, sweep: Arc<dyn Sweep>) -> Self {
        self.sweeps.push(sweep);
        self
    }

    /// Spawns the background task.
    ///
    /// # Errors
    /// - [`TickError::AlreadyRunning`] if the task is already live.
    /// - [`TickError::NoRuntime`] outside a Tokio runtime.
    pub fn start(&mut self) -> Result<(), TickError> {
        if self.is_running() {
            return Err(TickError::AlreadyRunning(self.name));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| TickError::NoRuntime(self.name))?;

        let (shutdown, shutdown_rx) = watch::channel(false);
        let (paused, paused_rx) = watch::channel(false);
        let scheduler = TickScheduler::new(self.config.clone());
        let sweeps = self.sweeps.clone();
        let name = self.name;

        let task = runtime.spawn(run(name, scheduler, sweeps, shutdown_rx, paused_rx));
        self.running = Some(Running {
            shutdown,
            paused,
            task,
        });

        tracing::info!(
            driver = name,
            interval_ms = self.config.interval_ms,
            sweeps = self.sweeps.len(),
            "tick driver started"
        );
        Ok(())
    }

    /// Stops the task and waits for the in-flight tick (if any) to finish.
    ///
    /// Session state is left untouched; only timed transitions stop.
    /// Returns the scheduler's final metrics.
    ///
    /// # Errors
    /// - [`TickError::NotRunning`] if the driver was never started.
    /// - [`TickError::TaskFailed`] if a sweep panicked.
    pub async fn shutdown(&mut self) -> Result<TickMetrics, TickError> {
        let Running { shutdown, task, .. } =
            self.running.take().ok_or(TickError::NotRunning(self.name))?;

        // The receiver may already be gone if the task died; either way
        // awaiting the handle below reports what happened.
        let _ = shutdown.send(true);

        let metrics = task
            .await
            .map_err(|e| TickError::TaskFailed(self.name, e.to_string()))?;

        tracing::info!(
            driver = self.name,
            ticks = metrics.total_ticks,
            overruns = metrics.total_overruns,
            "tick driver stopped"
        );
        Ok(metrics)
    }

    /// Stops sweeping until [`resume`](Self::resume). A sweep already in
    /// progress finishes first.
    ///
    /// # Errors
    /// [`TickError::NotRunning`] if the driver is not started.
    pub fn pause(&self) -> Result<(), TickError> {
        self.set_paused(true)
    }

    /// Resumes sweeping. The first tick comes one interval later.
    ///
    /// # Errors
    /// [`TickError::NotRunning`] if the driver is not started.
    pub fn resume(&self) -> Result<(), TickError> {
        self.set_paused(false)
    }

    pub fn is_paused(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| *running.paused.borrow())
    }

    fn set_paused(&self, paused: bool) -> Result<(), TickError> {
        let running = self.running.as_ref().ok_or(TickError::NotRunning(self.name))?;
        running.paused.send_replace(paused);
        Ok(())
    }

    /// Whether the background task is live.
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.task.abort();
        }
    }
}

async fn run(
    name: &'static str,
    mut scheduler: TickScheduler,
    sweeps: Vec<Arc<dyn Sweep>>,
    mut shutdown: watch::Receiver<bool>,
    mut paused: watch::Receiver<bool>,
) -> TickMetrics {
    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            Ok(()) = paused.changed() => {
                if *paused.borrow_and_update() {
                    scheduler.pause();
                } else {
                    scheduler.resume();
                }
            }
            info = scheduler.wait_for_tick() => {
                for sweep in &sweeps {
                    tracing::trace!(driver = name, sweep = sweep.name(), tick = info.tick, "sweep");
                    sweep.sweep(&info);
                }
                scheduler.record_tick_end();
            }
        }
    }
    scheduler.metrics().clone()
}
