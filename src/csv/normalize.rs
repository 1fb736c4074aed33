// src/csv/normalize.rs
//
// Row normalization: raw string fields into the two record shapes. Bad
// numeric input coerces to zero, short or header-contaminated stat rows are
// skipped. Nothing in here performs I/O or returns an error.

use crate::csv::RawTable;
use crate::model::{MatchStatRecord, PerformanceRecord};

/// Season used when a caller does not supply one.
pub const DEFAULT_SEASON: &str = "2025-2026";

/// Minimum positional fields for a detailed stat row. The full layout has 26
/// columns but the trailing total may be absent in older exports.
pub const MIN_MATCH_COLUMNS: usize = 25;

/// Parse a float, defaulting to 0.0 on empty or non-numeric input.
pub fn coerce_score(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

/// Parse an integer count, defaulting to 0 on empty or non-numeric input.
pub fn coerce_count(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

fn optional(raw: Option<&String>) -> Option<String> {
    let value = raw.map(|s| s.trim()).unwrap_or("");
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn count_at(fields: &[String], idx: usize) -> i64 {
    fields.get(idx).map(|s| coerce_count(s)).unwrap_or(0)
}

/// Build an aggregate performance record from a name-keyed row. Reads the
/// `Date` and `Pts_Total` columns; a missing or unparseable score becomes 0.
pub fn normalize_aggregate(
    table: &RawTable,
    row: &[String],
    player_name: &str,
    season: &str,
) -> PerformanceRecord {
    let match_date = table.field(row, "Date").unwrap_or("").to_string();
    let performance_score = table
        .field(row, "Pts_Total")
        .map(coerce_score)
        .unwrap_or(0.0);

    PerformanceRecord {
        player_name: player_name.to_string(),
        match_date,
        performance_score,
        season: season.to_string(),
    }
}

/// Build a detailed stat record from one positional row of the 26-column
/// match layout: date, day, competition, round, venue, result, team,
/// opponent, started, position, minutes, goals, assists, yellow, red, shots
/// on target, pens scored, pens conceded, seven points sub-columns, total.
///
/// Returns `None` (row skipped, caller counts it) when the row is shorter
/// than [`MIN_MATCH_COLUMNS`], the date is empty, or the date is the literal
/// header token `Date` left over from a header line in the data body.
pub fn normalize_match_stat(player_id: &str, fields: &[String]) -> Option<MatchStatRecord> {
    if fields.len() < MIN_MATCH_COLUMNS {
        return None;
    }
    let match_date = fields[0].trim();
    if match_date.is_empty() || match_date == "Date" {
        return None;
    }

    Some(MatchStatRecord {
        player_id: player_id.to_string(),
        match_date: match_date.to_string(),
        competition: optional(fields.get(2)),
        opponent: optional(fields.get(7)),
        minutes_played: count_at(fields, 10),
        goals: count_at(fields, 11),
        assists: count_at(fields, 12),
        yellow_cards: count_at(fields, 13),
        red_cards: count_at(fields, 14),
        shots_on_target: count_at(fields, 15),
        penalties_scored: count_at(fields, 16),
        penalties_conceded: count_at(fields, 17),
        points: count_at(fields, 25),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse_strict;

    fn stat_row(n: usize) -> Vec<String> {
        let mut fields = vec![String::new(); n];
        if n > 0 {
            fields[0] = "2025-01-01".to_string();
        }
        fields
    }

    #[test]
    fn aggregate_reads_date_and_score_by_name() {
        let parsed = parse_strict("Date,Pts_Total\n2025-01-01,7.5\n");
        let record = normalize_aggregate(
            &parsed.table,
            &parsed.table.rows[0],
            "Test Player",
            DEFAULT_SEASON,
        );
        assert_eq!(
            record,
            crate::model::PerformanceRecord {
                player_name: "Test Player".to_string(),
                match_date: "2025-01-01".to_string(),
                performance_score: 7.5,
                season: "2025-2026".to_string(),
            }
        );
    }

    #[test]
    fn aggregate_empty_score_defaults_to_zero() {
        let parsed = parse_strict("Date,Pts_Total\n2025-01-01,\n");
        let record = normalize_aggregate(
            &parsed.table,
            &parsed.table.rows[0],
            "Test Player",
            DEFAULT_SEASON,
        );
        assert_eq!(record.performance_score, 0.0);
    }

    #[test]
    fn aggregate_non_numeric_score_defaults_to_zero() {
        let parsed = parse_strict("Date,Pts_Total\n2025-01-01,abc\n");
        let record =
            normalize_aggregate(&parsed.table, &parsed.table.rows[0], "P", DEFAULT_SEASON);
        assert_eq!(record.performance_score, 0.0);
    }

    #[test]
    fn short_stat_row_is_skipped() {
        assert!(normalize_match_stat("p1", &stat_row(24)).is_none());
        assert!(normalize_match_stat("p1", &[]).is_none());
    }

    #[test]
    fn header_token_in_data_body_is_skipped() {
        let mut fields = stat_row(26);
        fields[0] = "Date".to_string();
        assert!(normalize_match_stat("p1", &fields).is_none());
    }

    #[test]
    fn empty_date_is_skipped() {
        let mut fields = stat_row(26);
        fields[0] = "  ".to_string();
        assert!(normalize_match_stat("p1", &fields).is_none());
    }

    #[test]
    fn stat_fields_map_positionally_with_zero_defaults() {
        let mut fields = stat_row(26);
        fields[2] = "Premier League".to_string();
        fields[7] = "Arsenal".to_string();
        fields[10] = "90".to_string();
        fields[11] = "2".to_string();
        fields[12] = "x".to_string(); // non-numeric assists
        fields[15] = "4".to_string();
        fields[25] = "12".to_string();

        let record = normalize_match_stat("p1", &fields).unwrap();
        assert_eq!(record.player_id, "p1");
        assert_eq!(record.competition.as_deref(), Some("Premier League"));
        assert_eq!(record.opponent.as_deref(), Some("Arsenal"));
        assert_eq!(record.minutes_played, 90);
        assert_eq!(record.goals, 2);
        assert_eq!(record.assists, 0);
        assert_eq!(record.shots_on_target, 4);
        assert_eq!(record.points, 12);
        assert_eq!(record.yellow_cards, 0);
    }

    #[test]
    fn row_at_min_columns_defaults_missing_total_to_zero() {
        let record = normalize_match_stat("p1", &stat_row(25)).unwrap();
        assert_eq!(record.points, 0);
    }

    #[test]
    fn empty_strings_become_null_markers() {
        let record = normalize_match_stat("p1", &stat_row(26)).unwrap();
        assert!(record.competition.is_none());
        assert!(record.opponent.is_none());
    }
}
