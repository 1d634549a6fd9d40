//! Checkpointed enumeration of candidate CNRs.
//!
//! The coordinator drives an unbounded candidate sequence from the last
//! persisted checkpoint, skips candidates that are already ingested, and
//! advances the checkpoint exactly once per candidate regardless of outcome,
//! so a nonexistent or permanently failing candidate is never revisited by a
//! later run. Cancellation is observed between candidates; an in-flight
//! candidate always runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::acquire::{CaseLookup, LookupOutcome};
use crate::model::Cnr;
use crate::store::{EntityStore, StoreError};

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_CASE_DELAY_MS: u64 = 2_000;
pub const DEFAULT_BATCH_COOLDOWN_MS: u64 = 5_000;

pub struct CrawlConfig {
    /// Starting point when the store holds no checkpoint; the first
    /// candidate is the next sequence after this CNR.
    pub seed_cnr: Cnr,
    pub batch_size: usize,
    pub case_delay: Duration,
    pub batch_cooldown: Duration,
    pub max_batches: Option<u64>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct CrawlStats {
    pub attempted: u64,
    pub successful: u64,
    pub non_existent: u64,
    pub failed: u64,
    pub skipped: u64,
    pub successful_cases: Vec<String>,
    pub non_existent_cases: Vec<String>,
    pub failed_cases: Vec<String>,
    pub skipped_cases: Vec<String>,
}

impl CrawlStats {
    fn record_successful(&mut self, cnr: &Cnr) {
        self.successful += 1;
        self.successful_cases.push(cnr.to_string());
    }

    fn record_non_existent(&mut self, cnr: &Cnr) {
        self.non_existent += 1;
        self.non_existent_cases.push(cnr.to_string());
    }

    fn record_failed(&mut self, cnr: &Cnr) {
        self.failed += 1;
        self.failed_cases.push(cnr.to_string());
    }

    fn record_skipped(&mut self, cnr: &Cnr) {
        self.skipped += 1;
        self.skipped_cases.push(cnr.to_string());
    }

    pub fn success_rate_percent(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.successful as f64 / self.attempted as f64 * 100.0
        }
    }
}

/// Categorized end-of-run report, written as JSON when a dump directory is
/// configured.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub runtime_seconds: u64,
    pub stats: CrawlStats,
}

/// Generate the next fixed-size batch of candidates after `cursor`,
/// zero-padding each sequence into the 16-character identifier template.
pub fn next_batch(cursor: &Cnr, batch_size: usize) -> Vec<Cnr> {
    let sequence = cursor.sequence();
    (1..=batch_size as u32)
        .map(|offset| cursor.with_sequence(sequence + offset))
        .collect()
}

pub struct CrawlCoordinator<L: CaseLookup> {
    store: EntityStore,
    lookup: L,
    config: CrawlConfig,
    cancel: Arc<AtomicBool>,
    stats: CrawlStats,
    run_started: Instant,
}

impl<L: CaseLookup> CrawlCoordinator<L> {
    pub fn new(
        store: EntityStore,
        lookup: L,
        config: CrawlConfig,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            store,
            lookup,
            config,
            cancel,
            stats: CrawlStats::default(),
            run_started: Instant::now(),
        }
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn into_summary(self) -> RunSummary {
        RunSummary {
            generated_at: crate::util::now_utc_string(),
            runtime_seconds: self.run_started.elapsed().as_secs(),
            stats: self.stats,
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Loop until cancelled or, when configured, until the batch ceiling is
    /// reached. Only the initial checkpoint read can abort the run.
    pub fn run(&mut self) -> Result<(), StoreError> {
        self.run_started = Instant::now();

        let mut cursor = match self.store.checkpoint()? {
            Some(stored) => match Cnr::parse(&stored) {
                Ok(checkpoint) => {
                    info!(checkpoint = %checkpoint, "resuming after persisted checkpoint");
                    checkpoint
                }
                Err(parse_error) => {
                    warn!(
                        checkpoint = %stored,
                        error = %parse_error,
                        "stored checkpoint unreadable, starting from seed"
                    );
                    self.config.seed_cnr.clone()
                }
            },
            None => {
                info!(seed = %self.config.seed_cnr, "no checkpoint found, starting from seed");
                self.config.seed_cnr.clone()
            }
        };

        let mut batches_completed = 0_u64;

        'crawl: loop {
            if self.cancelled() {
                break;
            }
            if let Some(max_batches) = self.config.max_batches {
                if batches_completed >= max_batches {
                    info!(batches = batches_completed, "batch ceiling reached");
                    break;
                }
            }

            let batch = next_batch(&cursor, self.config.batch_size);
            let Some(first) = batch.first() else {
                break;
            };
            info!(
                first = %first,
                size = batch.len(),
                "starting batch"
            );

            for candidate in &batch {
                if self.cancelled() {
                    info!("cancellation observed, stopping between candidates");
                    break 'crawl;
                }

                self.process_candidate(candidate);
                self.advance_checkpoint(candidate);
                cursor = candidate.clone();

                thread::sleep(self.config.case_delay);
            }

            batches_completed += 1;
            self.log_batch_summary(batches_completed);
        }

        self.log_final_summary();
        Ok(())
    }

    fn process_candidate(&mut self, candidate: &Cnr) {
        self.stats.attempted += 1;
        let case_started = Instant::now();

        match self.store.case_exists(candidate.as_str()) {
            Ok(true) => {
                info!(cnr = %candidate, "already ingested, skipping");
                self.stats.record_skipped(candidate);
                return;
            }
            Ok(false) => {}
            Err(store_error) => {
                error!(
                    cnr = %candidate,
                    error = %store_error,
                    "existence check failed, cooling down before continuing"
                );
                self.stats.record_failed(candidate);
                thread::sleep(self.config.batch_cooldown);
                return;
            }
        }

        match self.lookup.lookup(candidate) {
            Ok(LookupOutcome::Record(record)) => match self.store.upsert_case(&record) {
                Ok(case_id) => {
                    info!(
                        cnr = %candidate,
                        case_id,
                        case_type = record.case_type.as_deref().unwrap_or(""),
                        elapsed_ms = case_started.elapsed().as_millis() as u64,
                        "case scraped and stored"
                    );
                    self.stats.record_successful(candidate);
                }
                Err(StoreError::DuplicateCase { .. }) => {
                    // Another coordinator instance got there first.
                    info!(cnr = %candidate, "case appeared concurrently, skipping");
                    self.stats.record_skipped(candidate);
                }
                Err(store_error) => {
                    error!(
                        cnr = %candidate,
                        error = %store_error,
                        "persistence failed, case insertion rolled back"
                    );
                    self.stats.record_failed(candidate);
                }
            },
            Ok(LookupOutcome::NotFound) => {
                info!(cnr = %candidate, "case does not exist");
                self.stats.record_non_existent(candidate);
            }
            Err(acquire_error) => {
                warn!(
                    cnr = %candidate,
                    error = %acquire_error,
                    "acquisition failed permanently for this run"
                );
                self.stats.record_failed(candidate);
            }
        }
    }

    /// Best-effort: a failed write is logged but never aborts the batch,
    /// since in-memory statistics still categorize the candidate.
    fn advance_checkpoint(&mut self, candidate: &Cnr) {
        if let Err(store_error) = self.store.set_checkpoint(candidate.as_str()) {
            warn!(
                cnr = %candidate,
                error = %store_error,
                "checkpoint write failed, continuing"
            );
        }
    }

    fn log_batch_summary(&self, batches_completed: u64) {
        let runtime = self.run_started.elapsed();
        let mean_case_seconds = if self.stats.attempted == 0 {
            0.0
        } else {
            runtime.as_secs_f64() / self.stats.attempted as f64
        };

        info!(
            batch = batches_completed,
            attempted = self.stats.attempted,
            successful = self.stats.successful,
            non_existent = self.stats.non_existent,
            failed = self.stats.failed,
            skipped = self.stats.skipped,
            success_rate_percent = self.stats.success_rate_percent(),
            mean_case_seconds,
            "batch summary"
        );
    }

    fn log_final_summary(&self) {
        info!(
            runtime_seconds = self.run_started.elapsed().as_secs(),
            attempted = self.stats.attempted,
            successful = self.stats.successful,
            non_existent = self.stats.non_existent,
            failed = self.stats.failed,
            skipped = self.stats.skipped,
            success_rate_percent = self.stats.success_rate_percent(),
            "final crawl summary"
        );
        info!(cases = ?self.stats.successful_cases, "successful CNRs");
        info!(cases = ?self.stats.non_existent_cases, "non-existent CNRs");
        info!(cases = ?self.stats.failed_cases, "failed CNRs");
        info!(cases = ?self.stats.skipped_cases, "skipped CNRs");
    }
}
