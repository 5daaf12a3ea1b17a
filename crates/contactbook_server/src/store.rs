//! Process-wide owner of the SQLite connection.
//!
//! Built once at startup and shared with handlers through `AppState`.
//! The schema is checked when the store is built; each call then runs one
//! repository operation on the blocking pool while holding the connection
//! lock.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use contactbook_core::db::{open_db, open_db_in_memory, DbError};
use contactbook_core::{
    ContactService, ContactServiceOptions, RepoError, RepoResult, SqliteContactRepository,
};
use log::warn;
use rusqlite::Connection;

use crate::config::DatabaseLocation;
use crate::errors::ApiError;

#[derive(Debug)]
pub enum StoreError {
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Db(DbError),
    /// The connection lacks the expected contacts schema.
    NotReady(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { path, source } => write!(
                f,
                "cannot create database directory `{}`: {source}",
                path.display()
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotReady(err) => write!(f, "database not ready: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::NotReady(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::NotReady(value)
    }
}

pub struct ContactStore {
    conn: Mutex<Connection>,
    options: ContactServiceOptions,
}

impl ContactStore {
    pub fn open(
        location: &DatabaseLocation,
        options: ContactServiceOptions,
    ) -> Result<Self, StoreError> {
        let conn = match location {
            DatabaseLocation::Memory => open_db_in_memory()?,
            DatabaseLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
                open_db(path)?
            }
        };
        Self::from_connection(conn, options)
    }

    /// Wraps a bootstrapped connection after checking its schema once.
    pub fn from_connection(
        conn: Connection,
        options: ContactServiceOptions,
    ) -> Result<Self, StoreError> {
        SqliteContactRepository::try_new(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            options,
        })
    }

    pub fn options(&self) -> ContactServiceOptions {
        self.options
    }

    /// Runs `op` against a service bound to the shared connection.
    pub async fn run<T, F>(self: &Arc<Self>, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&ContactService<SqliteContactRepository<'c>>) -> RepoResult<T>
            + Send
            + 'static,
    {
        let store = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            // A panicking op leaves no open statement or transaction behind,
            // so the connection stays usable after poisoning.
            let conn = store.conn.lock().unwrap_or_else(|poisoned| {
                warn!("event=store_lock module=http status=recovered");
                store.conn.clear_poison();
                poisoned.into_inner()
            });
            let repo = SqliteContactRepository::assume_ready(&conn);
            let service = ContactService::with_options(repo, store.options);
            let result = op(&service);
            result.map_err(ApiError::from)
        })
        .await
        .map_err(ApiError::internal)?
    }
}
