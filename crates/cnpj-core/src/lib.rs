pub mod config;
pub mod identifier;
pub mod record;
pub mod schema;

pub use config::{ErrorLogDetail, LookupConfig, OutputConfig};
pub use identifier::{Candidates, Identifier, InvalidIdentifier, filter_candidates};
pub use record::{BatchReport, CompanyRecord, EnrichmentResult, FailedLookup, FailureKind, FieldValue};
pub use schema::results;
