//! Run metrics collection for the simulation.
//!
//! Provides structured logging and counters for monitoring evolution
//! progress and numerical health.

use crate::population::DevelopmentReport;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters shared by the evolutionary loop.
pub struct Metrics {
    generation_count: AtomicU64,
    development_count: AtomicU64,
    unconverged_count: AtomicU64,
    shortfall_count: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Creates a new metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation_count: AtomicU64::new(0),
            development_count: AtomicU64::new(0),
            unconverged_count: AtomicU64::new(0),
            shortfall_count: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a developed generation.
    pub fn record_generation(&self, generation: usize, report: &DevelopmentReport, mean_fitness: f64) {
        let count = self.generation_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.development_count
            .fetch_add(report.developments as u64, Ordering::Relaxed);
        self.unconverged_count
            .fetch_add(report.unconverged as u64, Ordering::Relaxed);

        if report.unconverged > 0 {
            tracing::debug!(
                generation = generation,
                unconverged = report.unconverged,
                developments = report.developments,
                "Development hit the step cap"
            );
        }

        // Log at info level every 10 generations
        if count % 10 == 0 {
            tracing::info!(
                generation = generation,
                mean_fitness = mean_fitness,
                unconverged_total = self.unconverged_count(),
                elapsed_ms = self.elapsed().as_millis() as u64,
                "Evolution progress"
            );
        }
    }

    /// Records a reproduction step that produced fewer children than asked.
    pub fn record_shortfall(&self, short_by: usize) {
        if short_by > 0 {
            self.shortfall_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[must_use]
    pub fn generation_count(&self) -> u64 {
        self.generation_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn development_count(&self) -> u64 {
        self.development_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn unconverged_count(&self) -> u64 {
        self.unconverged_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn shortfall_count(&self) -> u64 {
        self.shortfall_count.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}
