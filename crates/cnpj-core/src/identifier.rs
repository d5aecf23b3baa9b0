//! CNPJ identifier normalisation and validation.
//!
//! A CNPJ is a 14-digit code. Users type it with punctuation
//! (`11.222.333/0001-81`), and spreadsheets coerce it to a number, which
//! drops leading zeros (`00004321000199` becomes `4321000199`).
//!
//! # Normalisation rules
//!
//! - Typed input ([`Identifier::parse`]): strip every character that is not an
//!   ASCII digit, then require exactly 14 digits.
//! - Cell input ([`Identifier::from_cell`]): trim surrounding whitespace. If
//!   what remains is made only of digits and is shorter than 14, left-pad with
//!   `'0'` to exactly 14. Anything else falls through to the typed rule.
//!
//! Padding never applies to text containing punctuation, so `"1.2"` is
//! rejected rather than turned into `00000000000012`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of digits in a CNPJ.
pub const CNPJ_LEN: usize = 14;

/// Input that does not normalise to a CNPJ.
#[derive(Debug, Error)]
#[error("not a 14-digit CNPJ: {0:?}")]
pub struct InvalidIdentifier(pub String);

/// A validated 14-digit CNPJ.
///
/// Deserialising goes through [`Identifier::parse`], so serde input is
/// validated the same way as typed input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Normalise typed input: strip non-digits, accept exactly 14 digits.
    ///
    /// Returns `None` for empty, too short, too long, or digit-free input.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = strip_non_digits(raw);
        if digits.len() == CNPJ_LEN {
            Some(Self(digits))
        } else {
            None
        }
    }

    /// Normalise the text of a spreadsheet cell.
    ///
    /// Pure-digit cells shorter than 14 are assumed to have lost their
    /// leading zeros to numeric coercion and are padded back.
    pub fn from_cell(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let pure_digits = !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit());
        if pure_digits && trimmed.len() < CNPJ_LEN {
            return Some(Self(format!("{trimmed:0>width$}", width = CNPJ_LEN)));
        }
        Self::parse(trimmed)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = InvalidIdentifier;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or(InvalidIdentifier(raw))
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Keep only ASCII digits, in order.
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Cell candidates split into identifiers and rejected text.
#[derive(Debug, Default)]
pub struct Candidates {
    pub valid: Vec<Identifier>,
    pub rejected: Vec<String>,
}

/// Normalise every cell candidate with [`Identifier::from_cell`], keeping
/// input order within each half.
pub fn filter_candidates<I, S>(candidates: I) -> Candidates
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Candidates::default();
    for candidate in candidates {
        let raw = candidate.as_ref();
        match Identifier::from_cell(raw) {
            Some(id) => out.valid.push(id),
            None => out.rejected.push(raw.to_string()),
        }
    }
    out
}
