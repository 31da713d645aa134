use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::db::{
    connection::Database,
    migrations::SCHEMA_VERSION,
    models::{flat_tag_names, Deck, Match, Project, Tag},
    repositories::{
        decks::{all_decks, upsert_deck},
        matches::{all_matches, upsert_match_row, write_tag_index},
        projects::{all_projects, upsert_project},
        tags::{all_tags, upsert_tag},
    },
};
use crate::error::StoreError;

/// Full backup of every collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullExport {
    pub exported_at: DateTime<Utc>,
    pub schema_version: i32,
    pub active_project_id: Option<String>,
    pub projects: Vec<Project>,
    pub decks: Vec<Deck>,
    pub tags: Vec<Tag>,
    pub matches: Vec<Match>,
}

/// One project and its matches. Deck and tag names are already embedded in
/// the match snapshots, so the master lists are not included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectExport {
    pub exported_at: DateTime<Utc>,
    pub schema_version: i32,
    pub project: Option<Project>,
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecksExport {
    pub exported_at: DateTime<Utc>,
    pub schema_version: i32,
    pub decks: Vec<Deck>,
}

/// Any subset of the four collections. Records are upserted by id with no
/// deduplication and no identity remapping: re-importing a file overwrites
/// by id, and merging independently created datasets can silently collide.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportDocument {
    pub projects: Option<Vec<Project>>,
    pub decks: Option<Vec<Deck>>,
    pub tags: Option<Vec<Tag>>,
    pub matches: Option<Vec<Match>>,
}

impl ImportDocument {
    /// Parse failure surfaces before any transaction starts, so a bad file
    /// never produces a partial import.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|err| StoreError::MalformedImport(err.to_string()).into())
    }
}

impl Database {
    pub async fn export_all(&self, active_project_id: Option<String>) -> Result<FullExport> {
        self.execute(move |conn| {
            Ok(FullExport {
                exported_at: Utc::now(),
                schema_version: SCHEMA_VERSION,
                active_project_id,
                projects: all_projects(conn)?,
                decks: all_decks(conn)?,
                tags: all_tags(conn)?,
                matches: all_matches(conn)?,
            })
        })
        .await
    }

    /// Includes soft-deleted matches: a project export is a backup, not a
    /// report.
    pub async fn export_project(&self, project_id: &str) -> Result<ProjectExport> {
        let project_id = project_id.to_string();
        self.execute(move |conn| {
            let project = all_projects(conn)?
                .into_iter()
                .find(|p| p.id == project_id);
            let matches = all_matches(conn)?
                .into_iter()
                .filter(|m| m.project_id == project_id)
                .collect();
            Ok(ProjectExport {
                exported_at: Utc::now(),
                schema_version: SCHEMA_VERSION,
                project,
                matches,
            })
        })
        .await
    }

    pub async fn export_decks(&self) -> Result<DecksExport> {
        self.execute(|conn| {
            Ok(DecksExport {
                exported_at: Utc::now(),
                schema_version: SCHEMA_VERSION,
                decks: all_decks(conn)?,
            })
        })
        .await
    }

    /// Upsert every present collection inside one transaction. Matches
    /// re-derive `tags_flat` on the way in; whatever the file carried for
    /// that field is ignored.
    pub async fn import(&self, document: ImportDocument) -> Result<()> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            let mut counts = [0usize; 4];
            if let Some(projects) = &document.projects {
                for project in projects {
                    upsert_project(&tx, project)?;
                }
                counts[0] = projects.len();
            }
            if let Some(decks) = &document.decks {
                for deck in decks {
                    upsert_deck(&tx, deck)?;
                }
                counts[1] = decks.len();
            }
            if let Some(tags) = &document.tags {
                for tag in tags {
                    upsert_tag(&tx, tag)?;
                }
                counts[2] = tags.len();
            }
            if let Some(matches) = &document.matches {
                for record in matches {
                    let mut record = record.clone();
                    record.tags_flat = flat_tag_names(&record.tags);
                    upsert_match_row(&tx, &record)?;
                    write_tag_index(&tx, &record.id, &record.tags_flat)?;
                }
                counts[3] = matches.len();
            }

            tx.commit()?;

            info!(
                "Imported {} projects, {} decks, {} tags, {} matches",
                counts[0], counts[1], counts[2], counts[3]
            );
            Ok(())
        })
        .await
    }
}
