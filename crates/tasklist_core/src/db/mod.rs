//! SQLite bootstrap for the `kv_store` table behind `SqliteKeyValueStore`.
//!
//! Connections leave this module with a busy timeout set, every migration
//! applied (tracked in `PRAGMA user_version`) and the key-value table present.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Table holding every persisted key.
pub const KV_TABLE: &str = "kv_store";

pub type DbResult<T> = Result<T, DbError>;

/// Failure to produce a connection ready for key-value access.
#[derive(Debug)]
pub enum DbError {
    /// SQLite refused to open, configure or migrate the file.
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// The schema version looks current but `kv_store` is absent, usually a
    /// file written by another application.
    MissingKvTable { user_version: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "schema v{found} needs a newer build (this one reads up to v{supported})"
            ),
            Self::MissingKvTable { user_version } => {
                write!(f, "database at schema v{user_version} has no `{KV_TABLE}` table")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::MissingKvTable { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
