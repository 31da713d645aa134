use anyhow::Result;
use rusqlite::Row;

use crate::db::{connection::Database, helpers::parse_datetime, models::Meta};

fn row_to_meta(row: &Row) -> Result<Meta> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Meta {
        schema_version: row.get("schema_version")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn get_meta(&self) -> Result<Meta> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT schema_version, created_at, updated_at FROM meta WHERE id = 'app'",
            )?;
            let mut rows = stmt.query([])?;
            match rows.next()? {
                Some(row) => row_to_meta(row),
                None => Err(anyhow::anyhow!("meta singleton missing")),
            }
        })
        .await
    }
}
