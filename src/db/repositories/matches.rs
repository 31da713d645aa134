use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{
        decode_json, encode_json, parse_coin_face, parse_datetime, parse_initiative_method,
        parse_result, parse_turn_order,
    },
    models::{flat_tag_names, Initiative, Match, NewMatch},
};
use crate::error::StoreError;

pub(crate) const MATCH_COLUMNS: &str = "id, project_id, played_at, result, turn_order, \
     initiative_method, initiative_value, rating, my_deck_id, my_deck_name, op_deck_name, \
     tags, tags_flat, note, deleted, created_at, updated_at";

pub(crate) fn row_to_match(row: &Row) -> Result<Match> {
    let played_at: String = row.get("played_at")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    let result: String = row.get("result")?;
    let turn_order: String = row.get("turn_order")?;
    let initiative_method: String = row.get("initiative_method")?;
    let initiative_value: Option<String> = row.get("initiative_value")?;
    let tags: String = row.get("tags")?;
    let tags_flat: String = row.get("tags_flat")?;

    Ok(Match {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        played_at: parse_datetime(&played_at, "played_at")?,
        result: parse_result(&result)?,
        turn_order: parse_turn_order(&turn_order)?,
        initiative: Initiative {
            method: parse_initiative_method(&initiative_method)?,
            value: parse_coin_face(initiative_value)?,
        },
        rating: row.get("rating")?,
        my_deck_id: row.get("my_deck_id")?,
        my_deck_name: row.get("my_deck_name")?,
        op_deck_name: row.get("op_deck_name")?,
        tags: decode_json(&tags, "tags")?,
        tags_flat: decode_json(&tags_flat, "tags_flat")?,
        note: row.get("note")?,
        deleted: row.get("deleted")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

/// Upsert the match row itself. The caller is responsible for having
/// derived `tags_flat` first and for rewriting the tag index rows in the
/// same transaction.
pub(crate) fn upsert_match_row(conn: &Connection, record: &Match) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO matches
             (id, project_id, played_at, result, turn_order, initiative_method,
              initiative_value, rating, my_deck_id, my_deck_name, op_deck_name,
              tags, tags_flat, note, deleted, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            record.id,
            record.project_id,
            record.played_at.to_rfc3339(),
            record.result.as_str(),
            record.turn_order.as_str(),
            record.initiative.method.as_str(),
            record.initiative.value.map(|v| v.as_str()),
            record.rating,
            record.my_deck_id,
            record.my_deck_name,
            record.op_deck_name,
            encode_json(&record.tags)?,
            encode_json(&record.tags_flat)?,
            record.note,
            record.deleted,
            record.created_at.to_rfc3339(),
            record.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Replace the multi-valued tag-name index rows for one match.
pub(crate) fn write_tag_index(conn: &Connection, match_id: &str, names: &[String]) -> Result<()> {
    conn.execute(
        "DELETE FROM match_tag_index WHERE match_id = ?1",
        params![match_id],
    )?;
    let mut stmt =
        conn.prepare("INSERT INTO match_tag_index (match_id, tag_name) VALUES (?1, ?2)")?;
    for name in names {
        stmt.execute(params![match_id, name])?;
    }
    Ok(())
}

pub(crate) fn all_matches(conn: &Connection) -> Result<Vec<Match>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches ORDER BY played_at ASC"
    ))?;
    let mut rows = stmt.query([])?;
    let mut matches = Vec::new();
    while let Some(row) = rows.next()? {
        matches.push(row_to_match(row)?);
    }
    Ok(matches)
}

impl Database {
    pub async fn add_match(&self, input: NewMatch) -> Result<Match> {
        self.execute(move |conn| {
            let now = Utc::now();
            let record = Match {
                id: Uuid::new_v4().to_string(),
                project_id: input.project_id,
                played_at: input.played_at,
                result: input.result,
                turn_order: input.turn_order,
                initiative: input.initiative,
                rating: input.rating,
                my_deck_id: input.my_deck_id,
                my_deck_name: input.my_deck_name,
                op_deck_name: input.op_deck_name,
                tags_flat: flat_tag_names(&input.tags),
                tags: input.tags,
                note: input.note,
                deleted: false,
                created_at: now,
                updated_at: now,
            };

            let tx = conn.transaction()?;
            upsert_match_row(&tx, &record)?;
            write_tag_index(&tx, &record.id, &record.tags_flat)?;
            tx.commit()?;

            Ok(record)
        })
        .await
    }

    pub async fn get_match(&self, match_id: &str) -> Result<Option<Match>> {
        let match_id = match_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1"
            ))?;
            let mut rows = stmt.query(params![match_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_match(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Read-modify-write update of a whole match record. `tags_flat` is
    /// re-derived here, not trusted from the caller, and the tag index is
    /// rewritten in the same transaction.
    pub async fn update_match(&self, record: Match) -> Result<Match> {
        self.execute(move |conn| {
            let mut updated = record;
            updated.tags_flat = flat_tag_names(&updated.tags);
            updated.updated_at = Utc::now();

            let tx = conn.transaction()?;
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM matches WHERE id = ?1)",
                params![updated.id],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(StoreError::not_found("match", &updated.id).into());
            }
            upsert_match_row(&tx, &updated)?;
            write_tag_index(&tx, &updated.id, &updated.tags_flat)?;
            tx.commit()?;

            Ok(updated)
        })
        .await
    }

    /// Soft delete (or restore with `deleted = false`). The record stays
    /// retrievable; analytics and default listings skip it.
    pub async fn set_match_deleted(&self, match_id: &str, deleted: bool) -> Result<()> {
        let match_id = match_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE matches SET deleted = ?1, updated_at = ?2 WHERE id = ?3",
                params![deleted, Utc::now().to_rfc3339(), match_id],
            )?;
            if rows_affected == 0 {
                return Err(StoreError::not_found("match", &match_id).into());
            }
            Ok(())
        })
        .await
    }

    /// Non-deleted matches for a project, oldest first.
    pub async fn list_matches_by_project(&self, project_id: &str) -> Result<Vec<Match>> {
        let project_id = project_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MATCH_COLUMNS} FROM matches
                 WHERE project_id = ?1 AND deleted = 0
                 ORDER BY played_at ASC"
            ))?;
            let mut rows = stmt.query(params![project_id])?;
            let mut matches = Vec::new();
            while let Some(row) = rows.next()? {
                matches.push(row_to_match(row)?);
            }
            Ok(matches)
        })
        .await
    }

    /// Every match for a project including soft-deleted ones, for
    /// history/audit views and restore.
    pub async fn list_all_matches_by_project(&self, project_id: &str) -> Result<Vec<Match>> {
        let project_id = project_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MATCH_COLUMNS} FROM matches
                 WHERE project_id = ?1
                 ORDER BY played_at ASC"
            ))?;
            let mut rows = stmt.query(params![project_id])?;
            let mut matches = Vec::new();
            while let Some(row) = rows.next()? {
                matches.push(row_to_match(row)?);
            }
            Ok(matches)
        })
        .await
    }

    /// Non-deleted matches carrying the given tag name, via the flattened
    /// tag index.
    pub async fn list_matches_by_tag_name(&self, tag_name: &str) -> Result<Vec<Match>> {
        let tag_name = tag_name.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MATCH_COLUMNS} FROM matches
                 WHERE deleted = 0
                   AND id IN (SELECT match_id FROM match_tag_index WHERE tag_name = ?1)
                 ORDER BY played_at ASC"
            ))?;
            let mut rows = stmt.query(params![tag_name])?;
            let mut matches = Vec::new();
            while let Some(row) = rows.next()? {
                matches.push(row_to_match(row)?);
            }
            Ok(matches)
        })
        .await
    }
}
