// src/csv/mod.rs
//
// CSV parsing core shared by the folder importers and the HTTP endpoint.
// Two modes: a strict comma split that enforces the header's column count,
// and a quote-aware scanner for files whose text fields may contain commas.

pub mod normalize;

use tracing::warn;

/// Parsed CSV content: header names plus data rows, in file order.
#[derive(Debug, Default)]
pub struct RawTable {
    /// Column names from the header line, trimmed.
    pub headers: Vec<String>,
    /// Each data row, one `Vec<String>` per line. In quote-aware mode a row
    /// may have fewer or more fields than the header.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Look up a field in `row` by header name. Returns `None` when the name
    /// is unknown or the row is too short for that column.
    pub fn field<'a>(&self, row: &'a [String], name: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == name)?;
        row.get(idx).map(String::as_str)
    }
}

/// Result of a strict-mode parse. Rows whose comma-split field count differs
/// from the header's are dropped and counted, never reported as an error.
#[derive(Debug, Default)]
pub struct StrictParse {
    pub table: RawTable,
    pub skipped: usize,
}

fn non_empty_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().filter(|l| !l.trim().is_empty())
}

/// Strict split mode: each line is split on every comma. Lines with the
/// wrong field count are skipped and counted. Inputs with no header or no
/// data lines yield an empty table.
pub fn parse_strict(content: &str) -> StrictParse {
    let mut lines = non_empty_lines(content);
    let headers: Vec<String> = match lines.next() {
        Some(header) => header.split(',').map(|h| h.trim().to_string()).collect(),
        None => return StrictParse::default(),
    };

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for line in lines {
        let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
        if fields.len() != headers.len() {
            warn!(
                expected = headers.len(),
                got = fields.len(),
                "skipping row with mismatched column count"
            );
            skipped += 1;
            continue;
        }
        rows.push(fields);
    }

    StrictParse {
        table: RawTable { headers, rows },
        skipped,
    }
}

/// Quote-aware mode: commas inside double quotes do not separate fields, and
/// the quote characters are stripped from the output. Column counts are not
/// enforced; consumers index positionally and tolerate short rows.
pub fn parse_quoted(content: &str) -> RawTable {
    let mut lines = non_empty_lines(content);
    let headers = match lines.next() {
        Some(header) => split_quoted(header),
        None => return RawTable::default(),
    };
    let rows = lines.map(split_quoted).collect();
    RawTable { headers, rows }
}

/// Single-pass scanner over one line: a `"` toggles the in-quotes flag, and
/// a `,` ends the current field only when outside quotes. Every field is
/// trimmed and returned without its quote characters.
pub fn split_quoted(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_keeps_matching_rows_in_order() {
        let text = "Date, Pts_Total\n2025-01-01, 7.5\n2025-01-08,6\n";
        let parsed = parse_strict(text);
        assert_eq!(parsed.table.headers, vec!["Date", "Pts_Total"]);
        assert_eq!(parsed.table.rows.len(), 2);
        assert_eq!(parsed.table.rows[0], vec!["2025-01-01", "7.5"]);
        assert_eq!(parsed.table.rows[1], vec!["2025-01-08", "6"]);
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn strict_skips_and_counts_mismatched_rows() {
        let text = "a,b,c\n1,2,3\n1,2\n1,2,3,4\n4,5,6\n";
        let parsed = parse_strict(text);
        assert_eq!(parsed.table.rows.len(), 2);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn strict_trims_every_value() {
        let text = " Date , Score \n 2025-01-01 ,  3 \n";
        let parsed = parse_strict(text);
        assert_eq!(parsed.table.headers, vec!["Date", "Score"]);
        assert_eq!(parsed.table.rows[0], vec!["2025-01-01", "3"]);
    }

    #[test]
    fn fewer_than_two_lines_is_empty_not_an_error() {
        assert!(parse_strict("").table.rows.is_empty());
        assert!(parse_strict("Date,Pts_Total\n").table.rows.is_empty());
        assert!(parse_strict("\n   \n\n").table.rows.is_empty());
        assert!(parse_quoted("Date,Opponent\n").rows.is_empty());
    }

    #[test]
    fn blank_lines_are_excluded_before_parsing() {
        let text = "\nDate,Score\n\n2025-01-01,3\n   \n2025-01-08,4\n";
        let parsed = parse_strict(text);
        assert_eq!(parsed.table.rows.len(), 2);
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn quoted_commas_do_not_split_fields() {
        let fields = split_quoted(r#"2025-01-01,"Manchester United, FC",3"#);
        assert_eq!(fields, vec!["2025-01-01", "Manchester United, FC", "3"]);
    }

    #[test]
    fn quotes_are_stripped_from_output() {
        let fields = split_quoted(r#""a","b,c", d "#);
        assert_eq!(fields, vec!["a", "b,c", "d"]);
    }

    #[test]
    fn quote_aware_tolerates_short_rows() {
        let text = "a,b,c\n1,2\n1,2,3,4\n";
        let parsed = parse_quoted(text);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].len(), 2);
        assert_eq!(parsed.rows[1].len(), 4);
    }

    #[test]
    fn field_lookup_by_header_name() {
        let parsed = parse_strict("Date,Pts_Total\n2025-01-01,7.5\n");
        let row = &parsed.table.rows[0];
        assert_eq!(parsed.table.field(row, "Pts_Total"), Some("7.5"));
        assert_eq!(parsed.table.field(row, "Nope"), None);
    }
}
