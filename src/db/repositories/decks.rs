use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{decode_json, encode_json, parse_datetime},
    models::{Deck, NewDeck},
};
use crate::error::StoreError;

fn row_to_deck(row: &Row) -> Result<Deck> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    let labels: String = row.get("labels")?;

    Ok(Deck {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        labels: decode_json(&labels, "labels")?,
        favorite: row.get("favorite")?,
        note: row.get("note")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

pub(crate) fn upsert_deck(conn: &Connection, deck: &Deck) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO decks
             (id, name, color, labels, favorite, note, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            deck.id,
            deck.name,
            deck.color,
            encode_json(&deck.labels)?,
            deck.favorite,
            deck.note,
            deck.created_at.to_rfc3339(),
            deck.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub(crate) fn all_decks(conn: &Connection) -> Result<Vec<Deck>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, color, labels, favorite, note, created_at, updated_at
         FROM decks
         ORDER BY name ASC",
    )?;

    let mut rows = stmt.query([])?;
    let mut decks = Vec::new();
    while let Some(row) = rows.next()? {
        decks.push(row_to_deck(row)?);
    }
    Ok(decks)
}

impl Database {
    pub async fn add_deck(&self, input: NewDeck) -> Result<Deck> {
        self.execute(move |conn| {
            let now = Utc::now();
            let deck = Deck {
                id: Uuid::new_v4().to_string(),
                name: input.name,
                color: input.color,
                labels: input.labels,
                favorite: input.favorite,
                note: input.note,
                created_at: now,
                updated_at: now,
            };
            upsert_deck(conn, &deck)?;
            Ok(deck)
        })
        .await
    }

    pub async fn list_decks(&self) -> Result<Vec<Deck>> {
        self.execute(|conn| all_decks(conn)).await
    }

    pub async fn get_deck(&self, deck_id: &str) -> Result<Option<Deck>> {
        let deck_id = deck_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, color, labels, favorite, note, created_at, updated_at
                 FROM decks
                 WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![deck_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_deck(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Read-modify-write update: the caller fetches the deck, edits it, and
    /// puts the whole record back. Fails if the id does not exist rather
    /// than creating a new record. Historical match snapshots are never
    /// touched by deck edits.
    pub async fn update_deck(&self, deck: Deck) -> Result<Deck> {
        self.execute(move |conn| {
            let mut updated = deck;
            updated.updated_at = Utc::now();

            let rows_affected = conn.execute(
                "UPDATE decks
                 SET name = ?1,
                     color = ?2,
                     labels = ?3,
                     favorite = ?4,
                     note = ?5,
                     updated_at = ?6
                 WHERE id = ?7",
                params![
                    updated.name,
                    updated.color,
                    encode_json(&updated.labels)?,
                    updated.favorite,
                    updated.note,
                    updated.updated_at.to_rfc3339(),
                    updated.id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(StoreError::not_found("deck", &updated.id).into());
            }
            Ok(updated)
        })
        .await
    }

    /// Hard delete. Matches keep their `my_deck_name` snapshot.
    pub async fn delete_deck(&self, deck_id: &str) -> Result<()> {
        let deck_id = deck_id.to_string();
        self.execute(move |conn| {
            conn.execute("DELETE FROM decks WHERE id = ?1", params![deck_id])?;
            Ok(())
        })
        .await
    }
}
