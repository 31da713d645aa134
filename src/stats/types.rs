use serde::{Deserialize, Serialize};

/// How a tag selection combines: every selected tag must be present, or
/// any one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFilterMode {
    And,
    Or,
}

/// Aggregate rates over a set of matches. All rates are percentages at
/// 0.1-point resolution; `None` means the denominator was zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total: usize,
    pub first_count: usize,
    pub second_count: usize,
    pub win_rate: Option<f64>,
    pub first_rate: Option<f64>,
    pub second_rate: Option<f64>,
    pub first_win_rate: Option<f64>,
    pub second_win_rate: Option<f64>,
}

/// Per-tag breakdown row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRow {
    pub name: String,
    pub count: usize,
    pub win_rate: Option<f64>,
    pub first_rate: Option<f64>,
    pub second_rate: Option<f64>,
    pub first_win_rate: Option<f64>,
    pub second_win_rate: Option<f64>,
}

/// One sample of the rating series: instant in milliseconds, rating value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub x: i64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixCell {
    pub wins: usize,
    pub total: usize,
    /// `None` when no games were recorded for the pairing ("N/A", never 0%).
    pub win_rate: Option<f64>,
}

/// Deck-vs-opponent-deck grid. `cells[r][c]` pairs `rows[r]` with `cols[c]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupMatrix {
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    pub cells: Vec<Vec<MatrixCell>>,
}
