use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user's own deck. Matches snapshot its name at write time, so the
/// entity can be renamed or deleted without touching history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub labels: Vec<String>,
    pub favorite: bool,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeck {
    pub name: String,
    pub color: Option<String>,
    pub labels: Vec<String>,
    pub favorite: bool,
    pub note: Option<String>,
}
