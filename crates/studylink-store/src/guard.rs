//! Consistency guard
//!
//! Every multi-step write runs inside [`SqliteStore::atomically`]. The
//! transaction is opened with `BEGIN IMMEDIATE`, so the database write lock is
//! held from the first precondition read to the commit. Two writers can never
//! interleave a check and an insert; the second one waits (up to the busy
//! timeout) and then sees the first one's committed state.

use crate::{rows, SqliteStore, StoreError};
use rusqlite::{Connection, TransactionBehavior};
use studylink_domain::{
    ActorId, CanonicalPair, LinkId, RequestId, RequestStatus, StudyLink, StudyRequest,
};

/// Handle to an open write transaction
///
/// Only obtainable through [`SqliteStore::atomically`]; everything done
/// through it commits or rolls back as one unit.
pub struct Tx<'a> {
    conn: &'a Connection,
}

impl SqliteStore {
    /// Run `f` inside a single immediate transaction
    ///
    /// Commits when `f` returns `Ok`; rolls back when it returns `Err` or
    /// panics. Any value `f` produces (such as pending lifecycle events) is
    /// only handed back after the commit succeeded.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use studylink_domain::ActorId;
    /// use studylink_store::{SqliteStore, StoreError};
    ///
    /// let mut store = SqliteStore::new(":memory:").unwrap();
    /// let alice = ActorId::new("alice").unwrap();
    /// let known = store
    ///     .atomically(|tx| -> Result<bool, StoreError> { tx.actor_exists(&alice) })
    ///     .unwrap();
    /// assert!(!known);
    /// ```
    pub fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Tx<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;

        let result = f(&Tx { conn: &tx });
        match result {
            Ok(value) => {
                tx.commit().map_err(StoreError::from)?;
                Ok(value)
            }
            Err(e) => {
                tracing::debug!("Transaction rolled back");
                // Dropping the transaction rolls it back
                drop(tx);
                Err(e)
            }
        }
    }
}

impl Tx<'_> {
    /// Whether the actor is registered
    pub fn actor_exists(&self, actor: &ActorId) -> Result<bool, StoreError> {
        rows::actor_exists(self.conn, actor)
    }

    /// Get a request by ID
    pub fn get_request(&self, id: RequestId) -> Result<Option<StudyRequest>, StoreError> {
        rows::get_request(self.conn, id)
    }

    /// All pending requests for the pair, in either direction
    pub fn pending_for_pair(&self, pair: &CanonicalPair) -> Result<Vec<StudyRequest>, StoreError> {
        rows::pending_for_pair(self.conn, pair)
    }

    /// Insert a request
    ///
    /// Fails with [`StoreError::PendingConflict`] if a pending request
    /// already exists for the same canonical pair.
    pub fn insert_request(&self, request: &StudyRequest) -> Result<(), StoreError> {
        rows::insert_request(self.conn, request)
    }

    /// Compare-and-set a request's status, refreshing `updated_at`
    ///
    /// Returns `false` if the request is no longer in status `from`.
    pub fn update_status(
        &self,
        id: RequestId,
        from: RequestStatus,
        to: RequestStatus,
        now: u64,
    ) -> Result<bool, StoreError> {
        rows::update_status(self.conn, id, from, to, now)
    }

    /// Get the link for a canonical pair
    pub fn link_for_pair(&self, pair: &CanonicalPair) -> Result<Option<StudyLink>, StoreError> {
        rows::link_for_pair(self.conn, pair)
    }

    /// Insert a link
    ///
    /// Fails with [`StoreError::LinkConflict`] if the pair is already linked.
    pub fn insert_link(&self, link: &StudyLink) -> Result<(), StoreError> {
        rows::insert_link(self.conn, link)
    }

    /// Delete a link, returning whether a row was removed
    pub fn delete_link(&self, id: LinkId) -> Result<bool, StoreError> {
        rows::delete_link(self.conn, id)
    }
}
