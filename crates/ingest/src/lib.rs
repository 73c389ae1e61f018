pub mod delimited;
pub mod doctext;
pub mod normalize;
pub mod sheet;
pub(crate) mod util;

pub use doctext::Fragment;
pub use normalize::{normalize, NormalizeOutput, SchemaError};

use ledgerlens_core::RawRow;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The declared source format, supplied by the caller (typically inferred
/// from the file extension by the layer above).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Delimited,
    Spreadsheet,
    DocumentText,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Delimited => write!(f, "delimited"),
            SourceFormat::Spreadsheet => write!(f, "spreadsheet"),
            SourceFormat::DocumentText => write!(f, "document-text"),
        }
    }
}

/// Rows plus the non-fatal warnings accumulated while producing them.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub rows: Vec<RawRow>,
    pub warnings: Vec<String>,
}

/// Fatal structural failures. Partial row failures are warnings, never
/// errors: a parser fails the whole run only when it cannot locate a
/// header row at all.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no header row could be located")]
    NoHeader,
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
}

pub fn parse(data: &[u8], format: SourceFormat) -> Result<ParseOutput, ParseError> {
    match format {
        SourceFormat::Delimited => delimited::parse(data),
        SourceFormat::Spreadsheet => sheet::parse(data),
        SourceFormat::DocumentText => doctext::parse(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_display() {
        assert_eq!(SourceFormat::Delimited.to_string(), "delimited");
        assert_eq!(SourceFormat::DocumentText.to_string(), "document-text");
    }

    #[test]
    fn parse_dispatches_on_format() {
        let data = b"Date,Narration,Debit,Credit\n01/04/2024,SALARY APR,,50000\n";
        let out = parse(data, SourceFormat::Delimited).unwrap();
        assert_eq!(out.rows.len(), 1);
    }
}
