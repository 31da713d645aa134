//! Pure aggregation over match records. Every function is total over any
//! input slice (including empty) and never mutates or fails; zero
//! denominators come back as `None`, not errors.

mod types;

pub use types::{Kpis, MatchupMatrix, MatrixCell, RatePoint, TagFilterMode, TagRow};

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::db::models::{Match, MatchResult, TurnOrder};

/// Label used in the matchup matrix when a deck name is missing.
pub const UNKNOWN_DECK: &str = "(unknown)";

/// Percentage at 0.1-point resolution, or `None` when the denominator is
/// zero.
pub fn rate(num: usize, den: usize) -> Option<f64> {
    if den == 0 {
        return None;
    }
    Some((num as f64 / den as f64 * 1000.0).round() / 10.0)
}

pub fn kpis(matches: &[Match]) -> Kpis {
    let total = matches.len();
    let wins = matches
        .iter()
        .filter(|m| m.result == MatchResult::Win)
        .count();

    let first_count = matches
        .iter()
        .filter(|m| m.turn_order == TurnOrder::First)
        .count();
    let second_count = matches
        .iter()
        .filter(|m| m.turn_order == TurnOrder::Second)
        .count();
    let first_wins = matches
        .iter()
        .filter(|m| m.turn_order == TurnOrder::First && m.result == MatchResult::Win)
        .count();
    let second_wins = matches
        .iter()
        .filter(|m| m.turn_order == TurnOrder::Second && m.result == MatchResult::Win)
        .count();

    Kpis {
        total,
        first_count,
        second_count,
        win_rate: rate(wins, total),
        first_rate: rate(first_count, total),
        second_rate: rate(second_count, total),
        first_win_rate: rate(first_wins, first_count),
        second_win_rate: rate(second_wins, second_count),
    }
}

#[derive(Default)]
struct TagAccum {
    count: usize,
    wins: usize,
    first: usize,
    first_wins: usize,
    second: usize,
    second_wins: usize,
}

/// One row per distinct non-empty tag name, sorted descending by count.
/// Ties keep first-encounter order.
pub fn tag_stats(matches: &[Match]) -> Vec<TagRow> {
    let mut order: Vec<String> = Vec::new();
    let mut accum: HashMap<String, TagAccum> = HashMap::new();

    for m in matches {
        for tag in &m.tags {
            if tag.tag_name.is_empty() {
                continue;
            }
            let entry = accum.entry(tag.tag_name.clone()).or_insert_with(|| {
                order.push(tag.tag_name.clone());
                TagAccum::default()
            });
            entry.count += 1;
            if m.result == MatchResult::Win {
                entry.wins += 1;
            }
            match m.turn_order {
                TurnOrder::First => {
                    entry.first += 1;
                    if m.result == MatchResult::Win {
                        entry.first_wins += 1;
                    }
                }
                TurnOrder::Second => {
                    entry.second += 1;
                    if m.result == MatchResult::Win {
                        entry.second_wins += 1;
                    }
                }
            }
        }
    }

    let mut rows: Vec<TagRow> = order
        .into_iter()
        .map(|name| {
            let a = &accum[&name];
            TagRow {
                count: a.count,
                win_rate: rate(a.wins, a.count),
                first_rate: rate(a.first, a.count),
                second_rate: rate(a.second, a.count),
                first_win_rate: rate(a.first_wins, a.first),
                second_win_rate: rate(a.second_wins, a.second),
                name,
            }
        })
        .collect();

    // sort_by is stable, so ties stay in encounter order
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// (instant in milliseconds, rating) for every rated match, ascending by
/// instant. Unrated matches are skipped silently.
pub fn rate_series(matches: &[Match]) -> Vec<RatePoint> {
    let mut series: Vec<RatePoint> = matches
        .iter()
        .filter_map(|m| {
            m.rating.map(|y| RatePoint {
                x: m.played_at.timestamp_millis(),
                y,
            })
        })
        .collect();
    series.sort_by_key(|p| p.x);
    series
}

/// Rows are the player's deck names, columns the opponents', both sorted
/// lexicographically. Missing names group under [`UNKNOWN_DECK`].
pub fn matchup_matrix(matches: &[Match]) -> MatchupMatrix {
    let mut row_set = BTreeSet::new();
    let mut col_set = BTreeSet::new();
    let mut tallies: HashMap<(String, String), (usize, usize)> = HashMap::new();

    for m in matches {
        let row = if m.my_deck_name.is_empty() {
            UNKNOWN_DECK.to_string()
        } else {
            m.my_deck_name.clone()
        };
        let col = if m.op_deck_name.is_empty() {
            UNKNOWN_DECK.to_string()
        } else {
            m.op_deck_name.clone()
        };
        row_set.insert(row.clone());
        col_set.insert(col.clone());

        let entry = tallies.entry((row, col)).or_default();
        entry.1 += 1;
        if m.result == MatchResult::Win {
            entry.0 += 1;
        }
    }

    let rows: Vec<String> = row_set.into_iter().collect();
    let cols: Vec<String> = col_set.into_iter().collect();

    let cells = rows
        .iter()
        .map(|r| {
            cols.iter()
                .map(|c| {
                    let (wins, total) = tallies
                        .get(&(r.clone(), c.clone()))
                        .copied()
                        .unwrap_or((0, 0));
                    MatrixCell {
                        wins,
                        total,
                        win_rate: rate(wins, total),
                    }
                })
                .collect()
        })
        .collect();

    MatchupMatrix { rows, cols, cells }
}

/// Filter by tag selection. An empty selection passes everything through
/// untouched; a match with no tags never passes a non-empty selection.
pub fn filter_by_tags(matches: &[Match], selected: &[String], mode: TagFilterMode) -> Vec<Match> {
    if selected.is_empty() {
        return matches.to_vec();
    }

    matches
        .iter()
        .filter(|m| {
            let names: HashSet<&str> = m
                .tags
                .iter()
                .filter(|t| !t.tag_name.is_empty())
                .map(|t| t.tag_name.as_str())
                .collect();
            if names.is_empty() {
                return false;
            }
            match mode {
                TagFilterMode::And => selected.iter().all(|s| names.contains(s.as_str())),
                TagFilterMode::Or => selected.iter().any(|s| names.contains(s.as_str())),
            }
        })
        .cloned()
        .collect()
}
