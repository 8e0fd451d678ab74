//! Error types for study link operations

use studylink_domain::{ActorId, RequestId, RequestStatus};
use studylink_store::StoreError;
use thiserror::Error;

/// Errors returned by [`StudyService`](crate::StudyService) operations
///
/// Every variant except [`ServiceError::Store`] is a recoverable domain
/// outcome that maps to a specific caller-visible answer. `Store` is an
/// infrastructure failure (connectivity, busy timeout, corrupt data) and is
/// never used to report a rule violation.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Sender and receiver are the same actor
    #[error("Cannot send a study request to yourself")]
    SelfRequest,

    /// An actor could not be resolved
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    /// The two actors are already study partners
    #[error("Already study partners")]
    AlreadyLinked,

    /// A pending request already exists between the two actors
    #[error("A pending request already exists between these actors")]
    DuplicatePending,

    /// The request does not exist
    #[error("Request not found: {0}")]
    RequestNotFound(RequestId),

    /// No link exists between the caller and the given actor
    #[error("No study partnership with {0}")]
    LinkNotFound(ActorId),

    /// The caller is not the party the operation requires
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// The request is no longer pending
    #[error("Request {id} is not pending (status: {status})")]
    NotPending {
        /// The request
        id: RequestId,
        /// Its current status
        status: RequestStatus,
    },

    /// The decision value is neither `approve` nor `decline`
    #[error("{0}")]
    InvalidDecision(String),

    /// An actor or request identifier could not be parsed
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Storage layer failure
    #[error("Storage error: {0}")]
    Store(#[source] StoreError),
}

impl ServiceError {
    /// Whether this is a domain outcome rather than an infrastructure failure
    pub fn is_domain(&self) -> bool {
        !matches!(self, ServiceError::Store(_))
    }

    /// Whether this is one of the two "not found" outcomes
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::RequestNotFound(_) | ServiceError::LinkNotFound(_)
        )
    }
}

impl From<StoreError> for ServiceError {
    /// Unique-constraint conflicts are rule violations, not storage failures.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PendingConflict => ServiceError::DuplicatePending,
            StoreError::LinkConflict => ServiceError::AlreadyLinked,
            other => ServiceError::Store(other),
        }
    }
}
