use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Loss,
}

impl MatchResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchResult::Win => "win",
            MatchResult::Loss => "loss",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnOrder {
    First,
    Second,
}

impl TurnOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnOrder::First => "first",
            TurnOrder::Second => "second",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InitiativeMethod {
    Coin,
}

impl InitiativeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitiativeMethod::Coin => "coin",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CoinFace {
    Heads,
    Tails,
}

impl CoinFace {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoinFace::Heads => "heads",
            CoinFace::Tails => "tails",
        }
    }
}

/// How turn order was decided. The value is absent when it wasn't recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    pub method: InitiativeMethod,
    pub value: Option<CoinFace>,
}

/// A reference from a match to a tag. `tag_id` goes NULL when the tag
/// entity is deleted; `tag_name` is the snapshot that keeps history
/// readable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagRef {
    pub tag_id: Option<String>,
    pub tag_name: String,
}

/// One recorded game. `my_deck_name`/`op_deck_name` are write-time
/// snapshots, never live joins; `tags_flat` is derived from `tags` by
/// `flat_tag_names` on every write that touches them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub project_id: String,
    pub played_at: DateTime<Utc>,
    pub result: MatchResult,
    pub turn_order: TurnOrder,
    pub initiative: Initiative,
    pub rating: Option<f64>,
    pub my_deck_id: Option<String>,
    pub my_deck_name: String,
    pub op_deck_name: String,
    pub tags: Vec<TagRef>,
    #[serde(default)]
    pub tags_flat: Vec<String>,
    pub note: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatch {
    pub project_id: String,
    pub played_at: DateTime<Utc>,
    pub result: MatchResult,
    pub turn_order: TurnOrder,
    pub initiative: Initiative,
    pub rating: Option<f64>,
    pub my_deck_id: Option<String>,
    pub my_deck_name: String,
    pub op_deck_name: String,
    pub tags: Vec<TagRef>,
    pub note: Option<String>,
}

/// The single derivation point for `tags_flat`: the set of non-empty tag
/// names in reference order, duplicates collapsed. Every write path that
/// touches `tags` goes through here.
pub fn flat_tag_names(tags: &[TagRef]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for tag in tags {
        if tag.tag_name.is_empty() {
            continue;
        }
        if seen.insert(tag.tag_name.clone()) {
            names.push(tag.tag_name.clone());
        }
    }
    names
}
