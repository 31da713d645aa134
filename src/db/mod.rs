mod connection;
mod helpers;
mod migrations;
pub mod models;
mod repositories;

pub use connection::Database;
pub use migrations::SCHEMA_VERSION;
pub use repositories::transfer::{DecksExport, FullExport, ImportDocument, ProjectExport};
