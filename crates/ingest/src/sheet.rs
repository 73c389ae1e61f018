use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDate;
use ledgerlens_core::{CellValue, RawRow};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::{ParseError, ParseOutput};

/// Parse the first worksheet of a spreadsheet workbook. The first non-empty
/// row becomes the header; numeric and date cells keep their type.
pub fn parse(data: &[u8]) -> Result<ParseOutput, ParseError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ParseError::NoHeader)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let mut out = ParseOutput::default();
    let mut header: Option<Vec<String>> = None;

    for (idx, grid_row) in range.rows().enumerate() {
        let row_number = idx + 1;
        if grid_row.iter().all(is_blank) {
            continue;
        }
        match &header {
            None => {
                header = Some(grid_row.iter().map(cell_label).collect());
            }
            Some(labels) => {
                if grid_row.len() > labels.len() {
                    out.warnings.push(format!(
                        "row {row_number}: {} cells beyond the header width ignored",
                        grid_row.len() - labels.len()
                    ));
                }
                let cells = labels
                    .iter()
                    .enumerate()
                    .map(|(col, label)| {
                        let value = grid_row.get(col).map(cell_value).unwrap_or(CellValue::Empty);
                        (label.clone(), value)
                    })
                    .collect();
                out.rows.push(RawRow::new(row_number, cells));
            }
        }
    }

    if header.is_none() {
        return Err(ParseError::NoHeader);
    }
    Ok(out)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_label(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.to_string())
            }
        }
        Data::Int(i) => CellValue::Number(Decimal::from(*i)),
        Data::Float(f) => Decimal::from_f64(*f)
            .map(|d| CellValue::Number(d.round_dp(6)))
            .unwrap_or(CellValue::Empty),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(CellValue::Date)
            .unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Excel epoch is 1899-12-30, accounting for the 1900 leap-year bug.
/// `None` for serials outside chrono's representable range; the cell then
/// reads as empty and the normalizer reports the row.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    let days = chrono::Duration::try_days(serial as i64)?;
    base.checked_add_signed(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excel_serial_conversion() {
        // 45383 = 2024-04-01
        assert_eq!(
            excel_serial_to_date(45383.0),
            NaiveDate::from_ymd_opt(2024, 4, 1)
        );
        assert_eq!(
            excel_serial_to_date(1.0),
            NaiveDate::from_ymd_opt(1899, 12, 31)
        );
    }

    #[test]
    fn out_of_range_serial_is_none_not_panic() {
        assert_eq!(excel_serial_to_date(2.0e18), None);
        assert_eq!(excel_serial_to_date(-2.0e18), None);
        assert_eq!(excel_serial_to_date(f64::MAX), None);
    }

    #[test]
    fn cell_value_keeps_numeric_type() {
        assert_eq!(cell_value(&Data::Int(450)), CellValue::Number(Decimal::from(450)));
        assert_eq!(
            cell_value(&Data::Float(450.5)),
            CellValue::Number(Decimal::from_f64(450.5).unwrap().round_dp(6))
        );
    }

    #[test]
    fn cell_value_trims_text_and_blanks() {
        assert_eq!(
            cell_value(&Data::String(" SALARY APR ".into())),
            CellValue::Text("SALARY APR".into())
        );
        assert_eq!(cell_value(&Data::String("   ".into())), CellValue::Empty);
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn cell_value_iso_datetime_becomes_date() {
        assert_eq!(
            cell_value(&Data::DateTimeIso("2024-04-01T00:00:00".into())),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
        );
    }

    #[test]
    fn is_blank_on_variants() {
        assert!(is_blank(&Data::Empty));
        assert!(is_blank(&Data::String("  ".into())));
        assert!(!is_blank(&Data::Int(0)));
    }

    #[test]
    fn invalid_workbook_is_structural_error() {
        assert!(matches!(
            parse(b"not a spreadsheet"),
            Err(ParseError::Spreadsheet(_))
        ));
    }
}
