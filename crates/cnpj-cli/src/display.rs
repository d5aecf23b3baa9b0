//! Terminal rendering for enrichment results.

use std::path::PathBuf;

use cnpj_core::results::COLUMNS;
use cnpj_core::{BatchReport, CompanyRecord, EnrichmentResult, FailureKind};

use crate::pipeline::BatchStats;

// ── Public API ──

/// Print one lookup outcome as a vertical card.
pub fn print_result(result: &EnrichmentResult, saved: Option<&PathBuf>) {
    match result {
        EnrichmentResult::Success(record) => {
            print_record_card(record);
            if let Some(path) = saved {
                println!("Saved to {}", path.display());
            }
        }
        EnrichmentResult::Failure {
            identifier,
            kind,
            message,
        } => {
            let id = identifier.as_ref().map(|i| i.as_str()).unwrap_or("-");
            println!("=== {id} ===");
            println!("  {:<26} {}", "status", kind_label(kind));
            println!("  {:<26} {}", "error", message);
        }
    }
}

/// Print the per-row outcome table and totals for a batch.
pub fn print_batch_summary(report: &BatchReport, stats: &BatchStats) {
    println!(
        "Batch started {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    for (i, result) in report.results.iter().enumerate() {
        match result {
            EnrichmentResult::Success(record) => {
                println!("  {:>4}  {:<16} {}", i + 1, record.cnpj, record.razao_social);
            }
            EnrichmentResult::Failure {
                identifier,
                kind,
                ..
            } => {
                let id = identifier.as_ref().map(|i| i.as_str()).unwrap_or("-");
                println!("  {:>4}  {:<16} ({})", i + 1, id, kind_label(kind));
            }
        }
    }
    println!();

    println!("Summary");
    println!("  {:<26} {}", "cells read", stats.candidates);
    println!("  {:<26} {}", "cells skipped", stats.rejected);
    println!("  {:<26} {}", "lookups", report.len());
    println!("  {:<26} {}", "succeeded", report.success_count());
    println!("  {:<26} {}", "failed", report.failed.len());
    println!("  {:<26} {:.1}s", "elapsed", report.elapsed.as_secs_f64());
    if let Some(path) = &stats.results_path {
        println!("  {:<26} {}", "results table", path.display());
    }
    if let Some(path) = &stats.log_path {
        println!("  {:<26} {}", "error log", path.display());
    }
}

// ── Helpers ──

fn print_record_card(record: &CompanyRecord) {
    println!("=== {} ===", record.cnpj);
    let values = [
        &record.cnpj,
        &record.razao_social,
        &record.opcao_pelo_simples,
        &record.opcao_pelo_mei,
    ];
    for (name, value) in COLUMNS.iter().zip(values) {
        println!("  {:<26} {}", name, value);
    }
}

fn kind_label(kind: &FailureKind) -> String {
    match kind {
        FailureKind::NotFound => "invalid CNPJ".to_string(),
        FailureKind::Http { status } => format!("HTTP {status}"),
        FailureKind::Transport => "network error".to_string(),
        FailureKind::Decode => "unreadable response".to_string(),
    }
}
