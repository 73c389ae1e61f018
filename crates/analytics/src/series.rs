use std::collections::BTreeMap;

use ledgerlens_core::{Money, Month, MonthRange, Transaction};
use serde::{Deserialize, Serialize};

/// Time-bucket size for the series; caller-specified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesBucket {
    /// `YYYY-MM` for monthly buckets, `YYYY` for yearly.
    pub label: String,
    pub income: Money,
    pub expense: Money,
    pub net: Money,
}

/// Bucket the transactions over the observed date range. Buckets with no
/// transactions still appear, zero-valued — gaps are never silently omitted.
pub fn build(transactions: &[Transaction], granularity: Granularity) -> Vec<SeriesBucket> {
    let (min, max) = match date_bounds(transactions) {
        Some(bounds) => bounds,
        None => return Vec::new(),
    };

    let labels: Vec<String> = match granularity {
        Granularity::Monthly => {
            MonthRange::new(Month::from_date(min), Month::from_date(max))
                .map(|m| m.to_string())
                .collect()
        }
        Granularity::Yearly => (Month::from_date(min).year..=Month::from_date(max).year)
            .map(|y| format!("{y:04}"))
            .collect(),
    };

    let mut totals: BTreeMap<String, (Money, Money)> = BTreeMap::new();
    for tx in transactions {
        let label = bucket_label(tx, granularity);
        let entry = totals.entry(label).or_insert((Money::zero(), Money::zero()));
        let amount = tx.amount();
        if amount.is_positive() {
            entry.0 += amount;
        } else {
            entry.1 += amount.abs();
        }
    }

    labels
        .into_iter()
        .map(|label| {
            let (income, expense) =
                totals.get(&label).copied().unwrap_or((Money::zero(), Money::zero()));
            SeriesBucket { label, income, expense, net: income - expense }
        })
        .collect()
}

fn bucket_label(tx: &Transaction, granularity: Granularity) -> String {
    match granularity {
        Granularity::Monthly => Month::from_date(tx.date).to_string(),
        Granularity::Yearly => format!("{:04}", Month::from_date(tx.date).year),
    }
}

fn date_bounds(transactions: &[Transaction]) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
    let min = transactions.iter().map(|t| t.date).min()?;
    let max = transactions.iter().map(|t| t.date).max()?;
    Some((min, max))
}
