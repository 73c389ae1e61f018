use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::anomaly::{AnomalyReason, RowAnomaly};
use super::money::Money;

/// Fallback label assigned when no classification rule matches.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One canonical, normalized ledger entry. Immutable once classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Free-text narration, kept verbatim; matching lower-cases at
    /// classification time.
    pub description: String,
    /// Non-negative amount withdrawn (zero for a credit row).
    pub debit: Money,
    /// Non-negative amount deposited (zero for a debit row).
    pub credit: Money,
    pub category: Option<String>,
    /// Position in the normalized sequence; used for deterministic
    /// tie-breaks in drill-down rankings.
    pub source_index: usize,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        debit: Money,
        credit: Money,
        source_index: usize,
    ) -> Self {
        Transaction {
            date,
            description: description.into(),
            debit,
            credit,
            category: None,
            source_index,
        }
    }

    /// Signed amount: positive = inflow, negative = outflow.
    pub fn amount(&self) -> Money {
        self.credit - self.debit
    }

    pub fn magnitude(&self) -> Money {
        self.amount().abs()
    }

    pub fn is_inflow(&self) -> bool {
        self.amount().is_positive()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Exactly one of debit/credit should be non-zero for a physically
    /// meaningful row. Both zero or both non-zero is flagged, not dropped.
    pub fn balance_anomaly(&self, row: usize) -> Option<RowAnomaly> {
        match (self.debit.is_zero(), self.credit.is_zero()) {
            (true, true) => Some(RowAnomaly::new(
                row,
                AnomalyReason::MalformedRow,
                "both debit and credit are zero",
            )),
            (false, false) => Some(RowAnomaly::new(
                row,
                AnomalyReason::MalformedRow,
                format!("both debit ({}) and credit ({}) are non-zero", self.debit, self.credit),
            )),
            _ => None,
        }
    }
}
