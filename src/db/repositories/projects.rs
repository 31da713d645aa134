use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_optional_datetime},
    models::{NewProject, Period, Project},
};
use crate::error::StoreError;

fn row_to_project(row: &Row) -> Result<Project> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    let period_start: Option<String> = row.get("period_start")?;
    let period_end: Option<String> = row.get("period_end")?;

    let start = parse_optional_datetime(period_start, "period_start")?;
    let end = parse_optional_datetime(period_end, "period_end")?;
    let period = if start.is_some() || end.is_some() {
        Some(Period { start, end })
    } else {
        None
    };

    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        period,
        archived: row.get("archived")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

pub(crate) fn upsert_project(conn: &Connection, project: &Project) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO projects
             (id, name, description, period_start, period_end, archived, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            project.id,
            project.name,
            project.description,
            project
                .period
                .as_ref()
                .and_then(|p| p.start.map(|dt| dt.to_rfc3339())),
            project
                .period
                .as_ref()
                .and_then(|p| p.end.map(|dt| dt.to_rfc3339())),
            project.archived,
            project.created_at.to_rfc3339(),
            project.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub(crate) fn all_projects(conn: &Connection) -> Result<Vec<Project>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, period_start, period_end, archived, created_at, updated_at
         FROM projects
         ORDER BY updated_at DESC",
    )?;

    let mut rows = stmt.query([])?;
    let mut projects = Vec::new();
    while let Some(row) = rows.next()? {
        projects.push(row_to_project(row)?);
    }
    Ok(projects)
}

impl Database {
    pub async fn add_project(&self, input: NewProject) -> Result<Project> {
        self.execute(move |conn| {
            let now = Utc::now();
            let project = Project {
                id: Uuid::new_v4().to_string(),
                name: input.name,
                description: input.description,
                period: input.period,
                archived: false,
                created_at: now,
                updated_at: now,
            };
            upsert_project(conn, &project)?;
            Ok(project)
        })
        .await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.execute(|conn| all_projects(conn)).await
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Option<Project>> {
        let project_id = project_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, description, period_start, period_end, archived, created_at, updated_at
                 FROM projects
                 WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![project_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_project(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn update_project(&self, project: Project) -> Result<Project> {
        self.execute(move |conn| {
            let mut updated = project;
            updated.updated_at = Utc::now();

            let rows_affected = conn.execute(
                "UPDATE projects
                 SET name = ?1,
                     description = ?2,
                     period_start = ?3,
                     period_end = ?4,
                     archived = ?5,
                     updated_at = ?6
                 WHERE id = ?7",
                params![
                    updated.name,
                    updated.description,
                    updated
                        .period
                        .as_ref()
                        .and_then(|p| p.start.map(|dt| dt.to_rfc3339())),
                    updated
                        .period
                        .as_ref()
                        .and_then(|p| p.end.map(|dt| dt.to_rfc3339())),
                    updated.archived,
                    updated.updated_at.to_rfc3339(),
                    updated.id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(StoreError::not_found("project", &updated.id).into());
            }
            Ok(updated)
        })
        .await
    }

    /// Hard delete. Matches referencing the project are left in place.
    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        let project_id = project_id.to_string();
        self.execute(move |conn| {
            conn.execute("DELETE FROM projects WHERE id = ?1", params![project_id])?;
            Ok(())
        })
        .await
    }
}
