//! SQLite implementation of the partner and contract stores.
//!
//! rusqlite is synchronous, so every operation opens a connection and
//! runs inside `tokio::task::spawn_blocking`. Schema creation is
//! idempotent and happens at construction.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::{ContractStore, NewContract, PartnerStore, StoreError};
use crate::types::{Contract, Partner};

/// File-backed store for partners and contracts.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `db_path` and ensure
    /// the schema exists.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Connection {
                message: e.to_string(),
            })?;
        }

        let store = Self { db_path };
        store.initialize_db()?;
        Ok(store)
    }

    fn initialize_db(&self) -> Result<(), StoreError> {
        let conn = open(&self.db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS partners (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS contracts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                is_active INTEGER NOT NULL,
                partner_ids TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Insert a partner row. Partners are normally provisioned
    /// out-of-band; this exists for seeding and tests.
    pub fn insert_partner(
        &self,
        name: &str,
        email: Option<&str>,
    ) -> Result<Partner, StoreError> {
        let conn = open(&self.db_path)?;
        conn.execute(
            "INSERT INTO partners (name, email) VALUES (?1, ?2)",
            params![name, email],
        )?;
        Ok(Partner {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.map(str::to_string),
        })
    }
}

fn open(db_path: &Path) -> Result<Connection, StoreError> {
    Connection::open(db_path).map_err(|e| {
        log::error!("STORE ERROR: failed to open {}: {}", db_path.display(), e);
        StoreError::Connection {
            message: e.to_string(),
        }
    })
}

async fn blocking<T, F>(f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Query {
            message: format!("blocking task failed: {e}"),
        })?
}

fn partner_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Partner> {
    Ok(Partner {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

fn contract_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contract> {
    Ok(Contract {
        id: row.get(0)?,
        title: row.get(1)?,
        is_active: row.get(2)?,
        partner_ids: row.get(3)?,
    })
}

#[async_trait]
impl PartnerStore for SqliteStore {
    async fn fetch_all(&self) -> Result<Vec<Partner>, StoreError> {
        let db_path = self.db_path.clone();
        blocking(move || {
            let conn = open(&db_path)?;
            let mut stmt =
                conn.prepare("SELECT id, name, email FROM partners ORDER BY id")?;
            let rows = stmt.query_map([], partner_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
        .await
    }

    async fn fetch_by_ids(&self, ids: &[i64]) -> Result<Vec<Partner>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let db_path = self.db_path.clone();
        let ids = ids.to_vec();
        blocking(move || {
            let conn = open(&db_path)?;
            let placeholders = vec!["?"; ids.len()].join(", ");
            let sql = format!(
                "SELECT id, name, email FROM partners WHERE id IN ({placeholders}) ORDER BY id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(ids.iter()), partner_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
        .await
    }
}

#[async_trait]
impl ContractStore for SqliteStore {
    async fn fetch_all(&self) -> Result<Vec<Contract>, StoreError> {
        let db_path = self.db_path.clone();
        blocking(move || {
            let conn = open(&db_path)?;
            let mut stmt = conn
                .prepare("SELECT id, title, is_active, partner_ids FROM contracts ORDER BY id")?;
            let rows = stmt.query_map([], contract_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
        .await
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Contract>, StoreError> {
        let db_path = self.db_path.clone();
        blocking(move || {
            let conn = open(&db_path)?;
            conn.query_row(
                "SELECT id, title, is_active, partner_ids FROM contracts WHERE id = ?1",
                params![id],
                contract_from_row,
            )
            .optional()
            .map_err(Into::into)
        })
        .await
    }

    async fn count_active(&self) -> Result<i64, StoreError> {
        let db_path = self.db_path.clone();
        blocking(move || {
            let conn = open(&db_path)?;
            conn.query_row(
                "SELECT COUNT(*) FROM contracts WHERE is_active = 1",
                [],
                |row| row.get(0),
            )
            .map_err(Into::into)
        })
        .await
    }

    async fn insert(&self, contract: NewContract) -> Result<Contract, StoreError> {
        let db_path = self.db_path.clone();
        blocking(move || {
            let conn = open(&db_path)?;
            conn.execute(
                "INSERT INTO contracts (title, is_active, partner_ids) VALUES (?1, ?2, ?3)",
                params![contract.title, contract.is_active, contract.partner_ids],
            )?;
            Ok(Contract {
                id: conn.last_insert_rowid(),
                title: contract.title,
                is_active: contract.is_active,
                partner_ids: contract.partner_ids,
            })
        })
        .await
    }

    async fn update(&self, contract: &Contract) -> Result<(), StoreError> {
        let db_path = self.db_path.clone();
        let contract = contract.clone();
        blocking(move || {
            let conn = open(&db_path)?;
            conn.execute(
                "UPDATE contracts SET title = ?1, is_active = ?2, partner_ids = ?3 WHERE id = ?4",
                params![
                    contract.title,
                    contract.is_active,
                    contract.partner_ids,
                    contract.id
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let db_path = self.db_path.clone();
        blocking(move || {
            let conn = open(&db_path)?;
            let affected = conn.execute("DELETE FROM contracts WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
    }
}
