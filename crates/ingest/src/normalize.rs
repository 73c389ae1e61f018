use chrono::{Datelike, NaiveDate};
use ledgerlens_core::{AnomalyReason, CellValue, Money, RawRow, RowAnomaly, Transaction};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::util::parse_amount;

/// Logical fields a statement column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Date,
    Description,
    Debit,
    Credit,
    Amount,
    Balance,
}

const DATE_SYNONYMS: &[&str] = &[
    "date", "txn date", "transaction date", "value date", "tran date", "posting date",
    "value dt", "txn dt", "post date",
];
const DESCRIPTION_SYNONYMS: &[&str] = &[
    "description", "narration", "particulars", "details", "transaction details",
    "remarks", "transaction remarks", "narrative",
];
const DEBIT_SYNONYMS: &[&str] = &[
    "debit", "withdrawal", "withdrawal amt", "withdrawal amt.", "withdrawal amount",
    "debit amount", "debit amt", "dr", "dr amount", "withdrawals",
];
const CREDIT_SYNONYMS: &[&str] = &[
    "credit", "deposit", "deposit amt", "deposit amt.", "deposit amount",
    "credit amount", "credit amt", "cr", "cr amount", "deposits",
];
const AMOUNT_SYNONYMS: &[&str] = &[
    "amount", "transaction amount", "transaction amt", "amt", "amount (inr)",
];
const BALANCE_SYNONYMS: &[&str] = &[
    "balance", "closing balance", "running balance", "available balance", "balance amt",
];

/// Tried in order per row; the first format that parses the whole token wins.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%d/%m/%y", "%d-%b-%Y", "%d %b %Y", "%d %B %Y",
    "%d-%m-%y",
];

fn field_of(label: &str) -> Option<Field> {
    let label = label.trim().to_lowercase();
    let tables: [(&[&str], Field); 6] = [
        (DATE_SYNONYMS, Field::Date),
        (DESCRIPTION_SYNONYMS, Field::Description),
        (DEBIT_SYNONYMS, Field::Debit),
        (CREDIT_SYNONYMS, Field::Credit),
        (AMOUNT_SYNONYMS, Field::Amount),
        (BALANCE_SYNONYMS, Field::Balance),
    ];
    tables
        .iter()
        .find(|(synonyms, _)| synonyms.contains(&label.as_str()))
        .map(|(_, field)| *field)
}

/// Whether a label names a known statement column; used by the document-text
/// parser to locate the header line.
pub(crate) fn is_header_label(label: &str) -> bool {
    field_of(label).is_some()
}

/// Required logical columns could not be resolved; the run aborts.
#[derive(Error, Debug, PartialEq)]
pub enum SchemaError {
    #[error("required column '{0}' could not be resolved from the header")]
    MissingColumn(&'static str),
    #[error("no rows to normalize")]
    Empty,
}

#[derive(Debug, Default)]
pub struct NormalizeOutput {
    pub transactions: Vec<Transaction>,
    pub anomalies: Vec<RowAnomaly>,
}

#[derive(Debug)]
struct ColumnMap {
    date: usize,
    description: usize,
    debit: Option<usize>,
    credit: Option<usize>,
    amount: Option<usize>,
}

fn resolve_columns(row: &RawRow) -> Result<ColumnMap, SchemaError> {
    let mut date = None;
    let mut description = None;
    let mut debit = None;
    let mut credit = None;
    let mut amount = None;
    for (idx, (label, _)) in row.cells.iter().enumerate() {
        // First matching synonym wins per logical field.
        match field_of(label) {
            Some(Field::Date) => date = date.or(Some(idx)),
            Some(Field::Description) => description = description.or(Some(idx)),
            Some(Field::Debit) => debit = debit.or(Some(idx)),
            Some(Field::Credit) => credit = credit.or(Some(idx)),
            Some(Field::Amount) => amount = amount.or(Some(idx)),
            Some(Field::Balance) | None => {}
        }
    }
    let date = date.ok_or(SchemaError::MissingColumn("date"))?;
    let description = description.ok_or(SchemaError::MissingColumn("description"))?;
    if debit.is_none() && credit.is_none() && amount.is_none() {
        return Err(SchemaError::MissingColumn("amount"));
    }
    Ok(ColumnMap { date, description, debit, credit, amount })
}

/// Map heterogeneous raw rows into canonical transactions. Per-row failures
/// become anomalies; only an unresolvable header schema is fatal.
pub fn normalize(rows: &[RawRow]) -> Result<NormalizeOutput, SchemaError> {
    let first = rows.first().ok_or(SchemaError::Empty)?;
    let columns = resolve_columns(first)?;

    let mut out = NormalizeOutput::default();
    for row in rows {
        match normalize_row(row, &columns, out.transactions.len()) {
            Ok((tx, flag)) => {
                out.transactions.push(tx);
                out.anomalies.extend(flag);
            }
            Err(anomaly) => out.anomalies.push(anomaly),
        }
    }
    Ok(out)
}

fn normalize_row(
    row: &RawRow,
    columns: &ColumnMap,
    source_index: usize,
) -> Result<(Transaction, Option<RowAnomaly>), RowAnomaly> {
    let date = parse_date_cell(cell(row, columns.date)).ok_or_else(|| {
        RowAnomaly::new(
            row.row_number,
            AnomalyReason::UnparseableDate,
            format!("'{}' matched no known date format", cell(row, columns.date).as_text()),
        )
    })?;

    let description = cell(row, columns.description).as_text();

    let (debit, credit) = if columns.debit.is_some() || columns.credit.is_some() {
        let debit = columns.debit.map(|c| lenient_amount(cell(row, c))).unwrap_or_default();
        let credit = columns.credit.map(|c| lenient_amount(cell(row, c))).unwrap_or_default();
        (Money::from_decimal(debit), Money::from_decimal(credit))
    } else {
        // Single signed column: split into debit/credit by sign.
        let col = columns.amount.unwrap_or(columns.description);
        let value = strict_amount(cell(row, col)).ok_or_else(|| {
            RowAnomaly::new(
                row.row_number,
                AnomalyReason::AmbiguousAmount,
                format!("'{}' is not a number", cell(row, col).as_text()),
            )
        })?;
        if value >= Decimal::ZERO {
            (Money::zero(), Money::from_decimal(value))
        } else {
            (Money::from_decimal(-value), Money::zero())
        }
    };

    let tx = Transaction::new(date, description, debit, credit, source_index);
    let flag = tx.balance_anomaly(row.row_number);
    Ok((tx, flag))
}

fn cell<'a>(row: &'a RawRow, idx: usize) -> &'a CellValue {
    row.cells.get(idx).map(|(_, v)| v).unwrap_or(&CellValue::Empty)
}

fn parse_date_cell(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(d) => Some(*d),
        CellValue::Empty => None,
        other => {
            let text = other.as_text();
            let token = text.trim();
            // %Y accepts a two-digit year, turning 01/04/24 into year 0024;
            // reject sub-millennium parses so such tokens fall through to %y.
            DATE_FORMATS.iter().find_map(|fmt| {
                NaiveDate::parse_from_str(token, fmt)
                    .ok()
                    .filter(|d| d.year() >= 1000)
            })
        }
    }
}

/// Debit/credit columns: blank or non-numeric cells count as zero.
fn lenient_amount(value: &CellValue) -> Decimal {
    strict_amount(value).unwrap_or(Decimal::ZERO)
}

fn strict_amount(value: &CellValue) -> Option<Decimal> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => parse_amount(s),
        _ => None,
    }
}
