use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A loosely-typed cell as found in the source. Spreadsheet parsers keep
/// numeric and date cells typed; text parsers only ever produce `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render any variant into a parseable string.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

/// An ordered mapping from source column label to cell value, as emitted by
/// a format parser. Ephemeral: consumed only by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based row number in the source, for anomaly reporting.
    pub row_number: usize,
    pub cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<(String, CellValue)>) -> Self {
        RawRow { row_number, cells }
    }

    /// Case-insensitive lookup by column label.
    pub fn get(&self, label: &str) -> Option<&CellValue> {
        let wanted = label.trim().to_lowercase();
        self.cells
            .iter()
            .find(|(l, _)| l.trim().to_lowercase() == wanted)
            .map(|(_, v)| v)
    }
}
