//! Enrichment records and batch results.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::identifier::Identifier;

/// Message attached to every identifier the registry could not resolve.
pub const NOT_FOUND_SUFFIX: &str = "CNPJ não encontrado na API Minha Receita";

/// A scalar column value taken from the registry response.
///
/// Absent and `null` fields become `Flag(false)` so every result row has four
/// populated columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// The sentinel for a field the registry did not return.
    pub const MISSING: FieldValue = FieldValue::Flag(false);

    /// Convert an optional JSON value into a column value.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::MISSING,
            Some(Value::Bool(b)) => Self::Flag(*b),
            Some(Value::Number(n)) => n.as_f64().map_or(Self::MISSING, Self::Number),
            Some(Value::String(s)) => Self::Text(s.clone()),
            Some(other) => Self::Text(other.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => f.pad(if *b { "true" } else { "false" }),
            Self::Number(n) => f.pad(&n.to_string()),
            Self::Text(s) => f.pad(s),
        }
    }
}

/// The four registry fields kept for each company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRecord {
    pub cnpj: FieldValue,
    pub razao_social: FieldValue,
    pub opcao_pelo_simples: FieldValue,
    pub opcao_pelo_mei: FieldValue,
}

impl CompanyRecord {
    /// Project a registry JSON object down to the four kept fields.
    ///
    /// Returns `None` when `body` is not an object.
    pub fn from_registry_json(body: &Value) -> Option<Self> {
        let obj = body.as_object()?;
        Some(Self {
            cnpj: FieldValue::from_json(obj.get("cnpj")),
            razao_social: FieldValue::from_json(obj.get("razao_social")),
            opcao_pelo_simples: FieldValue::from_json(obj.get("opcao_pelo_simples")),
            opcao_pelo_mei: FieldValue::from_json(obj.get("opcao_pelo_mei")),
        })
    }
}

/// Why a lookup produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// Input failed local validation; no request was sent.
    NotFound,
    /// The registry answered with a non-2xx status.
    Http { status: u16 },
    /// Timeout, connection, or DNS failure.
    Transport,
    /// The registry answered 2xx with a body we could not read.
    Decode,
}

/// Outcome of one lookup attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentResult {
    Success(CompanyRecord),
    Failure {
        /// Absent when the input never became a valid identifier.
        identifier: Option<Identifier>,
        kind: FailureKind,
        message: String,
    },
}

impl EnrichmentResult {
    /// Failure for input that did not normalise to a CNPJ.
    pub fn not_found(raw: &str) -> Self {
        Self::Failure {
            identifier: None,
            kind: FailureKind::NotFound,
            message: format!("CNPJ {raw} não encontrado na API Minha Receita"),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn record(&self) -> Option<&CompanyRecord> {
        match self {
            Self::Success(record) => Some(record),
            Self::Failure { .. } => None,
        }
    }
}

/// A failed identifier and what went wrong, kept for the error log.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedLookup {
    pub identifier: Identifier,
    pub message: String,
}

/// Ordered results of one batch run.
///
/// `results[i]` always corresponds to the i-th submitted identifier.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub results: Vec<EnrichmentResult>,
    pub failed: Vec<FailedLookup>,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl BatchReport {
    /// Build a report, deriving the failed list from `results`.
    pub fn new(results: Vec<EnrichmentResult>, started_at: DateTime<Utc>, elapsed: Duration) -> Self {
        let failed = results
            .iter()
            .filter_map(|result| match result {
                EnrichmentResult::Failure {
                    identifier: Some(identifier),
                    message,
                    ..
                } => Some(FailedLookup {
                    identifier: identifier.clone(),
                    message: message.clone(),
                }),
                _ => None,
            })
            .collect();
        Self {
            results,
            failed,
            started_at,
            elapsed,
        }
    }

    /// An empty report, used when nothing could be submitted.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Utc::now(), Duration::ZERO)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Successful records, in input order.
    pub fn successes(&self) -> Vec<CompanyRecord> {
        self.results
            .iter()
            .filter_map(EnrichmentResult::record)
            .cloned()
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }
}
