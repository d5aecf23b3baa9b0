//! Concurrent batch enrichment.
//!
//! Every identifier in a batch gets exactly one lookup. Lookups run
//! concurrently behind an in-flight cap and the runner waits for all of them
//! before building the report: a fan-out / fan-in barrier, not a streaming
//! pipeline. Results come back in input order whatever the completion order.

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use cnpj_core::{BatchReport, EnrichmentResult, Identifier};
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

/// One registry lookup, from identifier to tagged result.
///
/// Implementations must not fail: every error is folded into
/// [`EnrichmentResult::Failure`].
#[async_trait]
pub trait Lookup: Send + Sync {
    async fn lookup(&self, identifier: &Identifier) -> EnrichmentResult;
}

/// Drives single and batch lookups over a [`Lookup`].
pub struct BatchRunner<L> {
    lookup: L,
    concurrency: usize,
}

impl<L: Lookup> BatchRunner<L> {
    /// `concurrency` caps lookups in flight; `0` removes the cap.
    pub fn new(lookup: L, concurrency: usize) -> Self {
        Self {
            lookup,
            concurrency,
        }
    }

    #[cfg(test)]
    pub(crate) fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Single-identifier path: validate typed input, then look it up.
    ///
    /// Input that does not normalise to 14 digits yields a `NotFound` failure
    /// without any request being sent.
    pub async fn enrich_one(&self, raw: &str) -> EnrichmentResult {
        match Identifier::parse(raw) {
            Some(identifier) => self.lookup.lookup(&identifier).await,
            None => {
                debug!(input = raw, "rejected invalid CNPJ before lookup");
                EnrichmentResult::not_found(raw)
            }
        }
    }

    /// Look up every identifier and return the ordered report.
    pub async fn run_batch(&self, identifiers: &[Identifier]) -> BatchReport {
        if identifiers.is_empty() {
            return BatchReport::empty();
        }

        let started_at = Utc::now();
        let start = Instant::now();
        let cap = match self.concurrency {
            0 => identifiers.len(),
            n => n,
        };
        info!(count = identifiers.len(), cap, "starting batch lookup");

        let results: Vec<EnrichmentResult> = stream::iter(identifiers)
            .map(|identifier| self.lookup.lookup(identifier))
            .buffered(cap)
            .collect()
            .await;

        let report = BatchReport::new(results, started_at, start.elapsed());
        info!(
            total = report.len(),
            succeeded = report.success_count(),
            failed = report.failed.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "batch lookup complete"
        );
        report
    }
}
