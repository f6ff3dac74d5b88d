// Import metrics module
//
// Lightweight counters for the import pipeline, shared between the
// orchestrator and whoever reports on a run.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::models::ImportPhase;

/// Import pipeline metrics
///
/// Uses atomic operations for thread-safe metric tracking without locks.
/// Counters accumulate over the lifetime of a [`PackImporter`](crate::importer::PackImporter)
/// and are logged at the end of every run.
#[derive(Debug)]
pub struct Metrics {
    /// Source files parsed successfully
    pub files_parsed: AtomicUsize,

    /// Source files that failed to parse
    pub files_failed: AtomicUsize,

    /// Entries merged into a destination pack
    pub entries_imported: AtomicUsize,

    /// Entries skipped (critical issues, warnings gate, duplicates)
    pub entries_skipped: AtomicUsize,

    /// Entries whose conversion failed
    pub entries_failed: AtomicUsize,

    /// Placeholder stubs synthesized
    pub placeholders_created: AtomicUsize,

    /// Packs whose import aborted
    pub packs_failed: AtomicUsize,

    pub scan_time_ms: AtomicU64,
    pub parse_time_ms: AtomicU64,
    pub validate_time_ms: AtomicU64,
    pub import_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            files_parsed: AtomicUsize::new(0),
            files_failed: AtomicUsize::new(0),
            entries_imported: AtomicUsize::new(0),
            entries_skipped: AtomicUsize::new(0),
            entries_failed: AtomicUsize::new(0),
            placeholders_created: AtomicUsize::new(0),
            packs_failed: AtomicUsize::new(0),
            scan_time_ms: AtomicU64::new(0),
            parse_time_ms: AtomicU64::new(0),
            validate_time_ms: AtomicU64::new(0),
            import_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record the outcome of parsing one file
    pub fn record_file_parsed(&self, success: bool) {
        if success {
            self.files_parsed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.files_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record entry counts of one imported pack
    pub fn record_entries(&self, imported: usize, skipped: usize, failed: usize) {
        self.entries_imported.fetch_add(imported, Ordering::Relaxed);
        self.entries_skipped.fetch_add(skipped, Ordering::Relaxed);
        self.entries_failed.fetch_add(failed, Ordering::Relaxed);
    }

    pub fn record_placeholders(&self, count: usize) {
        self.placeholders_created.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_pack_failed(&self) {
        self.packs_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Add time spent in a pipeline phase
    pub fn record_phase_time(&self, phase: ImportPhase, duration: Duration) {
        let counter = match phase {
            ImportPhase::Scanning => &self.scan_time_ms,
            ImportPhase::Parsing => &self.parse_time_ms,
            ImportPhase::Validating => &self.validate_time_ms,
            ImportPhase::Importing => &self.import_time_ms,
            ImportPhase::Idle | ImportPhase::PreviewReady => return,
        };
        counter.fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Share of parsed files that failed, 0.0 when nothing was parsed.
    pub fn parse_failure_rate(&self) -> f64 {
        let failed = self.files_failed.load(Ordering::Relaxed);
        let total = failed + self.files_parsed.load(Ordering::Relaxed);
        if total > 0 {
            failed as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Import Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Files: {} parsed, {} failed ({:.1}% failure rate)",
            self.files_parsed.load(Ordering::Relaxed),
            self.files_failed.load(Ordering::Relaxed),
            self.parse_failure_rate() * 100.0
        );
        tracing::info!(
            "Entries: {} imported, {} skipped, {} failed, {} placeholders",
            self.entries_imported.load(Ordering::Relaxed),
            self.entries_skipped.load(Ordering::Relaxed),
            self.entries_failed.load(Ordering::Relaxed),
            self.placeholders_created.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Phase times: scan {}ms, parse {}ms, validate {}ms, import {}ms",
            self.scan_time_ms.load(Ordering::Relaxed),
            self.parse_time_ms.load(Ordering::Relaxed),
            self.validate_time_ms.load(Ordering::Relaxed),
            self.import_time_ms.load(Ordering::Relaxed)
        );
        if self.packs_failed.load(Ordering::Relaxed) > 0 {
            tracing::warn!("Packs failed: {}", self.packs_failed.load(Ordering::Relaxed));
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
