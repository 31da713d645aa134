use anyhow::Result;
use chrono::Utc;
use log::info;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{decode_json, encode_json, parse_datetime},
    models::{flat_tag_names, NewTag, Tag, TagRef},
    repositories::matches::write_tag_index,
};
use crate::error::StoreError;

fn row_to_tag(row: &Row) -> Result<Tag> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        description: row.get("description")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

pub(crate) fn upsert_tag(conn: &Connection, tag: &Tag) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO tags (id, name, color, description, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            tag.id,
            tag.name,
            tag.color,
            tag.description,
            tag.created_at.to_rfc3339(),
            tag.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub(crate) fn all_tags(conn: &Connection) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, color, description, created_at, updated_at
         FROM tags
         ORDER BY name ASC",
    )?;

    let mut rows = stmt.query([])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row_to_tag(row)?);
    }
    Ok(tags)
}

impl Database {
    pub async fn add_tag(&self, input: NewTag) -> Result<Tag> {
        self.execute(move |conn| {
            let now = Utc::now();
            let tag = Tag {
                id: Uuid::new_v4().to_string(),
                name: input.name,
                color: input.color,
                description: input.description,
                created_at: now,
                updated_at: now,
            };
            upsert_tag(conn, &tag)?;
            Ok(tag)
        })
        .await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.execute(|conn| all_tags(conn)).await
    }

    /// Rename only the tag entity. Matches keep whatever `tag_name`
    /// snapshot they were written with, the same policy as deck names.
    pub async fn rename_tag(&self, tag_id: &str, new_name: String) -> Result<Tag> {
        let tag_id = tag_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE tags SET name = ?1, updated_at = ?2 WHERE id = ?3",
                params![new_name, Utc::now().to_rfc3339(), tag_id],
            )?;
            if rows_affected == 0 {
                return Err(StoreError::not_found("tag", &tag_id).into());
            }

            let mut stmt = conn.prepare(
                "SELECT id, name, color, description, created_at, updated_at
                 FROM tags
                 WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![tag_id])?;
            match rows.next()? {
                Some(row) => row_to_tag(row),
                None => Err(StoreError::not_found("tag", &tag_id).into()),
            }
        })
        .await
    }

    /// Delete the tag and, in the same transaction, null out `tag_id` on
    /// every match reference that pointed to it. `tag_name` snapshots are
    /// preserved, so `tags_flat` comes out unchanged. Matches without a
    /// matching reference are not rewritten.
    pub async fn delete_tag(&self, tag_id: &str) -> Result<()> {
        let tag_id = tag_id.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM tags WHERE id = ?1", params![tag_id])?;

            let mut patched = Vec::new();
            {
                let mut stmt = tx.prepare("SELECT id, tags FROM matches")?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    let match_id: String = row.get(0)?;
                    let raw: String = row.get(1)?;
                    let mut tags: Vec<TagRef> = decode_json(&raw, "tags")?;

                    let mut changed = false;
                    for tag_ref in &mut tags {
                        if tag_ref.tag_id.as_deref() == Some(tag_id.as_str()) {
                            tag_ref.tag_id = None;
                            changed = true;
                        }
                    }
                    if changed {
                        patched.push((match_id, tags));
                    }
                }
            }

            let now = Utc::now().to_rfc3339();
            let patched_count = patched.len();
            for (match_id, tags) in patched {
                let flat = flat_tag_names(&tags);
                tx.execute(
                    "UPDATE matches SET tags = ?1, tags_flat = ?2, updated_at = ?3 WHERE id = ?4",
                    params![encode_json(&tags)?, encode_json(&flat)?, now, match_id],
                )?;
                write_tag_index(&tx, &match_id, &flat)?;
            }

            tx.commit()?;

            if patched_count > 0 {
                info!("Detached deleted tag {tag_id} from {patched_count} matches");
            }
            Ok(())
        })
        .await
    }
}
