//! Lazy newest-first request sequences
//!
//! A [`RequestCursor`] fetches one page at a time using keyset pagination on
//! the row sequence number, so a caller that stops after the first few items
//! never loads the rest of an actor's history.

use crate::rows::{request_from_row, REQUEST_COLUMNS};
use crate::StoreError;
use rusqlite::{params, Connection};
use std::collections::VecDeque;
use studylink_domain::{ActorId, StudyRequest};

/// Which requests a cursor walks over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFilter {
    /// Pending requests the actor has received
    IncomingPending(ActorId),

    /// Pending requests the actor has sent
    OutgoingPending(ActorId),

    /// Every request the actor is part of, any status
    History(ActorId),
}

impl RequestFilter {
    fn where_clause(&self) -> &'static str {
        match self {
            RequestFilter::IncomingPending(_) => "receiver_id = ?1 AND status = 'pending'",
            RequestFilter::OutgoingPending(_) => "sender_id = ?1 AND status = 'pending'",
            RequestFilter::History(_) => "(sender_id = ?1 OR receiver_id = ?1)",
        }
    }

    fn actor(&self) -> &ActorId {
        match self {
            RequestFilter::IncomingPending(actor)
            | RequestFilter::OutgoingPending(actor)
            | RequestFilter::History(actor) => actor,
        }
    }
}

/// Iterator over requests, newest first, fetched page by page
pub struct RequestCursor<'a> {
    conn: &'a Connection,
    filter: RequestFilter,
    page_size: usize,
    before_seq: i64,
    buffer: VecDeque<StudyRequest>,
    exhausted: bool,
}

impl<'a> RequestCursor<'a> {
    pub(crate) fn new(conn: &'a Connection, filter: RequestFilter, page_size: usize) -> Self {
        Self {
            conn,
            filter,
            page_size: page_size.max(1),
            before_seq: i64::MAX,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    fn fetch_page(&mut self) -> Result<(), StoreError> {
        let sql = format!(
            "SELECT {} FROM study_requests WHERE {} AND seq < ?2 ORDER BY seq DESC LIMIT ?3",
            REQUEST_COLUMNS,
            self.filter.where_clause()
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let page = stmt
            .query_map(
                params![
                    self.filter.actor().as_str(),
                    self.before_seq,
                    self.page_size as i64
                ],
                request_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        if page.len() < self.page_size {
            self.exhausted = true;
        }
        if let Some((seq, _)) = page.last() {
            self.before_seq = *seq;
        }
        self.buffer.extend(page.into_iter().map(|(_, request)| request));
        Ok(())
    }
}

impl Iterator for RequestCursor<'_> {
    type Item = Result<StudyRequest, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.fetch_page() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}
