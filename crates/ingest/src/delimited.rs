use csv::ReaderBuilder;
use ledgerlens_core::{CellValue, RawRow};

use crate::{ParseError, ParseOutput};

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Parse delimited text. The first non-blank record is the header; ragged
/// data rows are padded or truncated to the header width with a warning.
pub fn parse(data: &[u8]) -> Result<ParseOutput, ParseError> {
    let text = String::from_utf8_lossy(data);
    let header_line = text
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or(ParseError::NoHeader)?;
    let delimiter = detect_delimiter(header_line);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut out = ParseOutput::default();
    let mut header: Option<Vec<String>> = None;
    let mut row_number = 0usize;

    for result in reader.records() {
        row_number += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                out.warnings.push(format!("row {row_number}: {e}"));
                continue;
            }
        };
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let labels = match &header {
            None => {
                header = Some(record.iter().map(|s| s.trim().to_string()).collect());
                continue;
            }
            Some(labels) => labels,
        };

        if record.len() != labels.len() {
            out.warnings.push(format!(
                "row {row_number}: expected {} fields, found {}",
                labels.len(),
                record.len()
            ));
        }

        let cells = labels
            .iter()
            .enumerate()
            .map(|(col, label)| {
                let value = record
                    .get(col)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| CellValue::Text(s.to_string()))
                    .unwrap_or(CellValue::Empty);
                (label.clone(), value)
            })
            .collect();
        out.rows.push(RawRow::new(row_number, cells));
    }

    if header.is_none() {
        return Err(ParseError::NoHeader);
    }
    Ok(out)
}

/// Pick the candidate delimiter that occurs most often in the header line;
/// comma wins ties by candidate order.
fn detect_delimiter(header_line: &str) -> u8 {
    let mut best = (b',', 0usize);
    for candidate in CANDIDATE_DELIMITERS {
        let count = header_line.bytes().filter(|&b| b == candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_comma_file() {
        let data = b"Date,Narration,Debit,Credit\n01/04/2024,SALARY APR,,50000\n03/04/2024,SWIGGY ORDER,450,\n";
        let out = parse(data).unwrap();
        assert_eq!(out.rows.len(), 2);
        assert!(out.warnings.is_empty());
        assert_eq!(out.rows[0].get("narration").unwrap().as_text(), "SALARY APR");
        assert_eq!(out.rows[0].get("credit").unwrap().as_text(), "50000");
        assert!(out.rows[0].get("debit").unwrap().is_empty());
    }

    #[test]
    fn semicolon_delimiter_detected() {
        let data = b"Date;Narration;Amount\n01/04/2024;SALARY APR;50000\n";
        let out = parse(data).unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].get("amount").unwrap().as_text(), "50000");
    }

    #[test]
    fn tab_delimiter_detected() {
        let data = b"Date\tNarration\tAmount\n01/04/2024\tSALARY APR\t50000\n";
        let out = parse(data).unwrap();
        assert_eq!(out.rows[0].cells.len(), 3);
    }

    #[test]
    fn ragged_short_row_padded_with_warning() {
        let data = b"Date,Narration,Debit,Credit\n01/04/2024,SALARY APR\n";
        let out = parse(data).unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.rows[0].get("credit").unwrap().is_empty());
    }

    #[test]
    fn ragged_long_row_truncated_with_warning() {
        let data = b"Date,Narration,Amount\n01/04/2024,SWIGGY ORDER,450,extra,fields\n";
        let out = parse(data).unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].cells.len(), 3);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn quoted_fields_with_embedded_delimiter() {
        let data = b"Date,Narration,Amount\n01/04/2024,\"AMAZON, INDIA\",1200\n";
        let out = parse(data).unwrap();
        assert_eq!(out.rows[0].get("narration").unwrap().as_text(), "AMAZON, INDIA");
    }

    #[test]
    fn blank_rows_skipped() {
        let data = b"Date,Narration,Amount\n\n01/04/2024,X,1\n,,\n";
        let out = parse(data).unwrap();
        assert_eq!(out.rows.len(), 1);
    }

    #[test]
    fn leading_blank_lines_before_header() {
        let data = b"\n\nDate,Narration,Amount\n01/04/2024,X,1\n";
        let out = parse(data).unwrap();
        assert_eq!(out.rows.len(), 1);
    }

    #[test]
    fn empty_input_is_no_header() {
        assert!(matches!(parse(b""), Err(ParseError::NoHeader)));
        assert!(matches!(parse(b"\n  \n"), Err(ParseError::NoHeader)));
    }

    #[test]
    fn header_only_yields_zero_rows() {
        let out = parse(b"Date,Narration,Amount\n").unwrap();
        assert!(out.rows.is_empty());
        assert!(out.warnings.is_empty());
    }
}
