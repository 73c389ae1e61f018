use ledgerlens_core::{CellValue, RawRow};
use serde::{Deserialize, Serialize};

use crate::normalize::is_header_label;
use crate::{ParseError, ParseOutput};

/// One positioned text fragment as emitted by an external document text
/// extractor (page coordinates, origin top-left).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// Fragments within this vertical distance belong to the same line.
const LINE_TOLERANCE: f32 = 2.5;

/// Best-effort reconstruction of tabular rows from text extracted out of a
/// page-oriented document. The payload is either a JSON array of positioned
/// fragments or plain pre-extracted text; unresolvable lines become
/// warnings, never hard failures.
pub fn parse(data: &[u8]) -> Result<ParseOutput, ParseError> {
    if let Ok(fragments) = serde_json::from_slice::<Vec<Fragment>>(data) {
        return parse_fragments(fragments);
    }
    parse_plain(&String::from_utf8_lossy(data))
}

// ── Positioned fragments ─────────────────────────────────────────────────────

fn parse_fragments(mut fragments: Vec<Fragment>) -> Result<ParseOutput, ParseError> {
    fragments.retain(|f| !f.text.trim().is_empty());
    fragments.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let lines = group_into_lines(fragments);

    // The header is the first line matching at least two known column names.
    let header_idx = lines
        .iter()
        .position(|line| {
            line.iter()
                .filter(|f| is_header_label(f.text.trim()))
                .count()
                >= 2
        })
        .ok_or(ParseError::NoHeader)?;
    let header = &lines[header_idx];
    let labels: Vec<String> = header.iter().map(|f| f.text.trim().to_string()).collect();
    let anchors: Vec<f32> = header.iter().map(|f| f.x).collect();

    let mut out = ParseOutput::default();
    for (offset, line) in lines[header_idx + 1..].iter().enumerate() {
        // 1-based over all reconstructed lines, so anomaly row numbers agree
        // with the plain-text path.
        let row_number = header_idx + offset + 2;
        let mut columns: Vec<Option<String>> = vec![None; labels.len()];
        for fragment in line {
            let col = nearest_anchor(&anchors, fragment.x);
            let text = fragment.text.trim();
            match &mut columns[col] {
                Some(existing) => {
                    existing.push(' ');
                    existing.push_str(text);
                }
                slot => *slot = Some(text.to_string()),
            }
        }
        let filled = columns.iter().filter(|c| c.is_some()).count();
        if filled < 2 {
            out.warnings.push(format!(
                "line {row_number}: could not be split into {} columns, skipped",
                labels.len()
            ));
            continue;
        }
        let cells = labels
            .iter()
            .zip(columns)
            .map(|(label, value)| {
                (label.clone(), value.map(CellValue::Text).unwrap_or(CellValue::Empty))
            })
            .collect();
        out.rows.push(RawRow::new(row_number, cells));
    }
    Ok(out)
}

fn group_into_lines(fragments: Vec<Fragment>) -> Vec<Vec<Fragment>> {
    let mut lines: Vec<Vec<Fragment>> = Vec::new();
    for fragment in fragments {
        match lines.last_mut() {
            Some(line) if (fragment.y - line[0].y).abs() <= LINE_TOLERANCE => {
                line.push(fragment)
            }
            _ => lines.push(vec![fragment]),
        }
    }
    for line in &mut lines {
        line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    }
    lines
}

fn nearest_anchor(anchors: &[f32], x: f32) -> usize {
    let mut best = 0usize;
    let mut best_distance = f32::MAX;
    for (idx, anchor) in anchors.iter().enumerate() {
        let distance = (anchor - x).abs();
        if distance < best_distance {
            best = idx;
            best_distance = distance;
        }
    }
    best
}

// ── Plain-text fallback ──────────────────────────────────────────────────────

fn parse_plain(text: &str) -> Result<ParseOutput, ParseError> {
    let mut out = ParseOutput::default();
    let mut header: Option<Vec<String>> = None;

    for (idx, line) in text.lines().enumerate() {
        let row_number = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_columns(line);
        match &header {
            None => {
                let known = fields.iter().filter(|f| is_header_label(f)).count();
                if fields.len() >= 2 && known >= 2 {
                    header = Some(fields);
                }
                // Preamble (bank name, address, period) before the header is
                // expected; it is not worth a warning.
            }
            Some(labels) => {
                if fields.len() != labels.len() {
                    out.warnings.push(format!(
                        "line {row_number}: expected {} columns, found {}, skipped",
                        labels.len(),
                        fields.len()
                    ));
                    continue;
                }
                let cells = labels
                    .iter()
                    .zip(fields)
                    .map(|(label, value)| (label.clone(), CellValue::Text(value)))
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

/// Split a fixed-width-ish line on tabs or runs of two or more spaces, so
/// single-spaced narration stays in one column.
fn split_columns(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut space_run = 0usize;
    for c in line.trim().chars() {
        match c {
            '\t' => {
                if !current.is_empty() {
                    fields.push(std::mem::take(&mut current));
                }
                space_run = 0;
            }
            ' ' => space_run += 1,
            _ => {
                if space_run >= 2 && !current.is_empty() {
                    fields.push(std::mem::take(&mut current));
                } else if space_run == 1 && !current.is_empty() {
                    current.push(' ');
                }
                space_run = 0;
                current.push(c);
            }
        }
    }
    if !current.is_empty() {
        fields.push(current);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(x: f32, y: f32, text: &str) -> Fragment {
        Fragment { x, y, text: text.to_string() }
    }

    fn statement_fragments() -> Vec<Fragment> {
        vec![
            frag(10.0, 5.0, "DEMO BANK STATEMENT"),
            frag(10.0, 20.0, "Date"),
            frag(80.0, 20.0, "Narration"),
            frag(200.0, 20.0, "Debit"),
            frag(260.0, 20.0, "Credit"),
            frag(10.0, 35.0, "01/04/2024"),
            frag(80.0, 35.2, "SALARY"),
            frag(120.0, 34.9, "APR"),
            frag(260.0, 35.0, "50000"),
            frag(10.0, 50.0, "03/04/2024"),
            frag(80.0, 50.0, "SWIGGY ORDER"),
            frag(200.0, 50.0, "450"),
        ]
    }

    #[test]
    fn fragments_reconstruct_rows() {
        let data = serde_json::to_vec(&statement_fragments()).unwrap();
        let out = parse(&data).unwrap();
        assert_eq!(out.rows.len(), 2);
        // Same-line fragments join with a space.
        assert_eq!(out.rows[0].get("narration").unwrap().as_text(), "SALARY APR");
        assert_eq!(out.rows[0].get("credit").unwrap().as_text(), "50000");
        assert!(out.rows[0].get("debit").unwrap().is_empty());
        assert_eq!(out.rows[1].get("debit").unwrap().as_text(), "450");
    }

    #[test]
    fn fragment_rows_numbered_from_document_top() {
        // Line 1 is the bank-name banner, line 2 the header, so data rows
        // start at 3, matching the plain-text path's numbering.
        let data = serde_json::to_vec(&statement_fragments()).unwrap();
        let out = parse(&data).unwrap();
        assert_eq!(out.rows[0].row_number, 3);
        assert_eq!(out.rows[1].row_number, 4);
    }

    #[test]
    fn unresolvable_line_warns_and_skips() {
        let mut fragments = statement_fragments();
        fragments.push(frag(10.0, 65.0, "Page 1 of 3"));
        let data = serde_json::to_vec(&fragments).unwrap();
        let out = parse(&data).unwrap();
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("skipped"));
    }

    #[test]
    fn no_header_fragments_is_fatal() {
        let fragments = vec![frag(0.0, 0.0, "just some prose")];
        let data = serde_json::to_vec(&fragments).unwrap();
        assert!(matches!(parse(&data), Err(ParseError::NoHeader)));
    }

    #[test]
    fn plain_text_fallback() {
        let text = "DEMO BANK\nStatement for April\n\nDate        Narration        Debit    Credit\n01/04/2024  SALARY APR                50000\n";
        // The salary line has no debit column, so it collapses to 3 fields
        // and is skipped with a warning — lossy but loud.
        let out = parse(text.as_bytes()).unwrap();
        assert_eq!(out.rows.len(), 0);
        assert_eq!(out.warnings.len(), 1);

        let text = "Date        Narration        Amount\n01/04/2024  SALARY APR       50000\n03/04/2024  SWIGGY ORDER     -450\n";
        let out = parse(text.as_bytes()).unwrap();
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.rows[0].get("narration").unwrap().as_text(), "SALARY APR");
    }

    #[test]
    fn plain_text_without_header_is_fatal() {
        assert!(matches!(
            parse(b"no table here\njust words\n"),
            Err(ParseError::NoHeader)
        ));
    }

    #[test]
    fn split_columns_keeps_single_spaces() {
        assert_eq!(
            split_columns("01/04/2024  SALARY APR CREDIT   50000"),
            vec!["01/04/2024", "SALARY APR CREDIT", "50000"]
        );
        assert_eq!(split_columns("a\tb\tc"), vec!["a", "b", "c"]);
        assert_eq!(split_columns("   "), Vec::<String>::new());
    }
}
