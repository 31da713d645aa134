pub mod deck;
pub mod matches;
pub mod project;
pub mod tag;

pub use deck::{Deck, NewDeck};
pub use matches::{
    flat_tag_names, CoinFace, Initiative, InitiativeMethod, Match, MatchResult, NewMatch, TagRef,
    TurnOrder,
};
pub use project::{NewProject, Period, Project};
pub use tag::{NewTag, Tag};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `meta` singleton row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub schema_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
