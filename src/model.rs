use serde::{Deserialize, Serialize};

/// One per-match aggregate score row, keyed on
/// (player_name, match_date, season) in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub player_name: String,
    /// Raw date text from the file; the database stores it as given.
    pub match_date: String,
    pub performance_score: f64,
    pub season: String,
}

/// One detailed per-match stat line, keyed on (player_id, match_date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStatRecord {
    pub player_id: String,
    pub match_date: String,
    pub competition: Option<String>,
    pub opponent: Option<String>,
    pub minutes_played: i64,
    pub goals: i64,
    pub assists: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
    pub shots_on_target: i64,
    pub penalties_scored: i64,
    pub penalties_conceded: i64,
    pub points: i64,
}

/// Shape of a row in the player pool table, as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRow {
    pub id: String,
    pub name: String,
}
