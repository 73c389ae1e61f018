use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyReason {
    UnparseableDate,
    AmbiguousAmount,
    MalformedRow,
}

impl fmt::Display for AnomalyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyReason::UnparseableDate => write!(f, "unparseable date"),
            AnomalyReason::AmbiguousAmount => write!(f, "ambiguous amount"),
            AnomalyReason::MalformedRow => write!(f, "malformed row"),
        }
    }
}

/// A row that failed normalization. Anomalies are accumulated and reported
/// alongside a successful run; they never abort it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowAnomaly {
    /// 1-based row number in the source, as reported by the parser.
    pub row: usize,
    pub reason: AnomalyReason,
    pub detail: String,
}

impl RowAnomaly {
    pub fn new(row: usize, reason: AnomalyReason, detail: impl Into<String>) -> Self {
        RowAnomaly { row, reason, detail: detail.into() }
    }
}

impl fmt::Display for RowAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}: {}", self.row, self.reason, self.detail)
    }
}
