//! Study Link Storage Layer
//!
//! Persists actors, study requests, and study links in SQLite.
//!
//! # Architecture
//!
//! - One table per entity; pairs stored in canonical (smallest-first) order
//! - Unique indexes on the canonical pair back the pending and link invariants
//! - All multi-step writes go through [`SqliteStore::atomically`]
//! - Read sequences are lazy, keyset-paginated [`RequestCursor`]s
//!
//! # Examples
//!
//! ```no_run
//! use studylink_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for request and link operations
//! ```

#![warn(missing_docs)]

mod config;
mod cursor;
mod guard;
mod rows;

pub use config::StoreConfig;
pub use cursor::{RequestCursor, RequestFilter};
pub use guard::Tx;

use rusqlite::Connection;
use std::path::Path;
use studylink_domain::{ActorId, CanonicalPair, RequestId, StudyLink, StudyRequest};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error (including busy timeouts)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A pending request already exists for the pair
    #[error("A pending request already exists for this pair")]
    PendingConflict,

    /// A link already exists for the pair
    #[error("A link already exists for this pair")]
    LinkConflict,
}

/// SQLite-backed store for study requests and links
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each request handler should open
/// its own SqliteStore on the shared database file; the consistency guard
/// serializes their writes.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a store at the given path with default settings
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use studylink_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("studylink.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let config = if path.as_ref().as_os_str() == ":memory:" {
            StoreConfig::in_memory()
        } else {
            StoreConfig::at(path.as_ref())
        };
        Self::open(&config)
    }

    /// Open a store from configuration
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            Connection::open(&config.path)?
        };
        conn.busy_timeout(config.busy_timeout())?;
        if config.wal && !config.is_in_memory() {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        }

        let mut store = Self { conn };
        store.initialize_schema()?;
        tracing::debug!(path = %config.path.display(), "Opened study link store");
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Register an actor so it can send and receive requests
    ///
    /// Idempotent; returns `true` only when the actor was not known before.
    pub fn register_actor(&self, actor: &ActorId, now: u64) -> Result<bool, StoreError> {
        rows::register_actor(&self.conn, actor, now)
    }

    /// Whether the actor is registered
    pub fn actor_exists(&self, actor: &ActorId) -> Result<bool, StoreError> {
        rows::actor_exists(&self.conn, actor)
    }

    /// Get a request by ID
    pub fn get_request(&self, id: RequestId) -> Result<Option<StudyRequest>, StoreError> {
        rows::get_request(&self.conn, id)
    }

    /// All pending requests for the pair, in either direction
    pub fn pending_for_pair(&self, pair: &CanonicalPair) -> Result<Vec<StudyRequest>, StoreError> {
        rows::pending_for_pair(&self.conn, pair)
    }

    /// Get the link for a canonical pair
    pub fn link_for_pair(&self, pair: &CanonicalPair) -> Result<Option<StudyLink>, StoreError> {
        rows::link_for_pair(&self.conn, pair)
    }

    /// Actors linked to `actor`, most recently linked first
    pub fn partners_of(&self, actor: &ActorId) -> Result<Vec<ActorId>, StoreError> {
        rows::partners_of(&self.conn, actor)
    }

    /// Total number of links
    pub fn count_links(&self) -> Result<u64, StoreError> {
        rows::count_links(&self.conn)
    }

    /// Lazily walk requests matching `filter`, newest first
    pub fn requests(&self, filter: RequestFilter, page_size: usize) -> RequestCursor<'_> {
        RequestCursor::new(&self.conn, filter, page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studylink_domain::RequestStatus;

    fn actor(s: &str) -> ActorId {
        ActorId::new(s).unwrap()
    }

    #[test]
    fn test_sibling_pending_rows_without_index() {
        // Drop the backstop index to reproduce a state the invariant forbids
        let mut store = SqliteStore::new(":memory:").unwrap();
        store
            .conn
            .execute_batch("DROP INDEX idx_requests_pending_pair")
            .unwrap();

        let forward = StudyRequest::pending(actor("alice"), actor("bob"), 1).unwrap();
        let backward = StudyRequest::pending(actor("bob"), actor("alice"), 2).unwrap();
        let pair = forward.pair();

        store
            .atomically(|tx| -> Result<(), StoreError> {
                tx.insert_request(&forward)?;
                tx.insert_request(&backward)
            })
            .unwrap();
        assert_eq!(store.pending_for_pair(&pair).unwrap().len(), 2);

        let closed = store
            .atomically(|tx| -> Result<usize, StoreError> {
                let mut closed = 0;
                for request in tx.pending_for_pair(&pair)? {
                    if tx.update_status(request.id, RequestStatus::Pending, RequestStatus::Closed, 3)? {
                        closed += 1;
                    }
                }
                Ok(closed)
            })
            .unwrap();
        assert_eq!(closed, 2);
        assert!(store.pending_for_pair(&pair).unwrap().is_empty());
    }
}
