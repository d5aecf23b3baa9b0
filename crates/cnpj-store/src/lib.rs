//! Storage layer: XLSX candidate extraction, result workbooks, and the error log.

mod error;
pub use error::StoreError;

pub mod error_log;
pub mod layout;
pub mod source;
mod store;
pub mod table;

pub use layout::OutputLayout;
pub use source::extract_candidates;
pub use store::ResultStore;
