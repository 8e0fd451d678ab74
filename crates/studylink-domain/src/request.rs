//! Study requests and their state machine
//!
//! ```text
//!         create()                 respond(APPROVE)
//! (none) ----------> PENDING ----------------------------> APPROVED
//!                       |  \                                   |
//!                       |   \ respond(DECLINE)                 | (side effect)
//!                       |    -----------------------> DECLINED  v
//!                       | cancel() / superseded            Link created
//!                       ---------------------------> CLOSED
//! ```
//!
//! [`RequestStatus::apply`] is the total transition function: every
//! (status, event) pair either yields a [`Transition`] or an
//! [`InvalidTransition`].

use crate::{ActorId, CanonicalPair, RequestId};
use std::fmt;

/// Status of a study request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    /// Awaiting a response from the receiver
    Pending,

    /// Accepted by the receiver; a link exists from this point on
    Approved,

    /// Rejected by the receiver
    Declined,

    /// Cancelled by the sender, superseded on approval, or a link-removal record
    Closed,
}

impl RequestStatus {
    /// Get the storage name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Declined => "declined",
            RequestStatus::Closed => "closed",
        }
    }

    /// Parse a status from its storage name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(RequestStatus::Pending),
            "approved" => Some(RequestStatus::Approved),
            "declined" => Some(RequestStatus::Declined),
            "closed" => Some(RequestStatus::Closed),
            _ => None,
        }
    }

    /// Terminal states accept no further events
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Apply an event to this status
    ///
    /// # Examples
    ///
    /// ```
    /// use studylink_domain::{RequestEvent, RequestStatus};
    ///
    /// let t = RequestStatus::Pending.apply(RequestEvent::Approve).unwrap();
    /// assert_eq!(t.to, RequestStatus::Approved);
    /// assert!(t.creates_link);
    ///
    /// assert!(RequestStatus::Declined.apply(RequestEvent::Approve).is_err());
    /// ```
    pub fn apply(self, event: RequestEvent) -> Result<Transition, InvalidTransition> {
        let to = match (self, event) {
            (RequestStatus::Pending, RequestEvent::Approve) => RequestStatus::Approved,
            (RequestStatus::Pending, RequestEvent::Decline) => RequestStatus::Declined,
            (RequestStatus::Pending, RequestEvent::Cancel) => RequestStatus::Closed,
            (RequestStatus::Pending, RequestEvent::Supersede) => RequestStatus::Closed,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(Transition {
            from: self,
            to,
            creates_link: event == RequestEvent::Approve,
        })
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid request status: {}", s))
    }
}

/// Events that drive a request through its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestEvent {
    /// Receiver accepts
    Approve,

    /// Receiver rejects
    Decline,

    /// Sender withdraws
    Cancel,

    /// A sibling request for the same pair was approved
    Supersede,
}

impl RequestEvent {
    /// Lowercase name used in logs and errors
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestEvent::Approve => "approve",
            RequestEvent::Decline => "decline",
            RequestEvent::Cancel => "cancel",
            RequestEvent::Supersede => "supersede",
        }
    }
}

/// Outcome of a valid state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status before the event
    pub from: RequestStatus,

    /// Status after the event
    pub to: RequestStatus,

    /// Whether the transition must create a link in the same transaction
    pub creates_link: bool,
}

/// An event that is undefined for the current status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    /// Status the request was in
    pub from: RequestStatus,

    /// Event that was rejected
    pub event: RequestEvent,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot {} a request that is {}", self.event.as_str(), self.from)
    }
}

impl std::error::Error for InvalidTransition {}

/// A receiver's answer to a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Accept the request and form a link
    Approve,

    /// Reject the request
    Decline,
}

impl Decision {
    /// Get the decision name
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Decline => "decline",
        }
    }
}

impl From<Decision> for RequestEvent {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approve => RequestEvent::Approve,
            Decision::Decline => RequestEvent::Decline,
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    /// Only `approve` and `decline` are accepted; anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" => Ok(Decision::Approve),
            "decline" => Ok(Decision::Decline),
            _ => Err(format!(
                "Invalid decision '{}': expected 'approve' or 'decline'",
                s
            )),
        }
    }
}

/// A directed proposal to form a study partnership
///
/// Requests are never deleted; terminal requests remain as history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyRequest {
    /// Unique identifier
    pub id: RequestId,

    /// Actor who proposed the partnership
    pub sender: ActorId,

    /// Actor asked to accept
    pub receiver: ActorId,

    /// Current lifecycle status
    pub status: RequestStatus,

    /// Creation time (milliseconds since Unix epoch)
    pub created_at: u64,

    /// Time of the last status transition (milliseconds since Unix epoch)
    pub updated_at: u64,
}

impl StudyRequest {
    /// Create a new pending request
    ///
    /// Returns `None` when sender and receiver are the same actor.
    pub fn pending(sender: ActorId, receiver: ActorId, now: u64) -> Option<Self> {
        if sender == receiver {
            return None;
        }
        Some(Self {
            id: RequestId::new(),
            sender,
            receiver,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create the closed history record written when a link is removed
    ///
    /// The remover is recorded as the sender and the former partner as the
    /// receiver. The record never re-enters the state machine.
    pub fn removal_record(remover: ActorId, partner: ActorId, now: u64) -> Option<Self> {
        let mut record = Self::pending(remover, partner, now)?;
        record.status = RequestStatus::Closed;
        Some(record)
    }

    /// The canonical pair this request is about
    pub fn pair(&self) -> CanonicalPair {
        CanonicalPair::ordered(&self.sender, &self.receiver)
    }

    /// Whether the actor is the sender or the receiver
    pub fn involves(&self, actor: &ActorId) -> bool {
        &self.sender == actor || &self.receiver == actor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(s: &str) -> ActorId {
        ActorId::new(s).unwrap()
    }

    #[test]
    fn test_pending_transitions() {
        let approve = RequestStatus::Pending.apply(RequestEvent::Approve).unwrap();
        assert_eq!(approve.to, RequestStatus::Approved);
        assert!(approve.creates_link);

        let decline = RequestStatus::Pending.apply(RequestEvent::Decline).unwrap();
        assert_eq!(decline.to, RequestStatus::Declined);
        assert!(!decline.creates_link);

        let cancel = RequestStatus::Pending.apply(RequestEvent::Cancel).unwrap();
        assert_eq!(cancel.to, RequestStatus::Closed);

        let supersede = RequestStatus::Pending.apply(RequestEvent::Supersede).unwrap();
        assert_eq!(supersede.to, RequestStatus::Closed);
        assert!(!supersede.creates_link);
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        let events = [
            RequestEvent::Approve,
            RequestEvent::Decline,
            RequestEvent::Cancel,
            RequestEvent::Supersede,
        ];
        for status in [
            RequestStatus::Approved,
            RequestStatus::Declined,
            RequestStatus::Closed,
        ] {
            assert!(status.is_terminal());
            for event in events {
                let err = status.apply(event).unwrap_err();
                assert_eq!(err.from, status);
                assert_eq!(err.event, event);
            }
        }
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = RequestStatus::Declined.apply(RequestEvent::Approve).unwrap_err();
        assert_eq!(err.to_string(), "cannot approve a request that is declined");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(RequestStatus::parse("PENDING"), Some(RequestStatus::Pending));
        assert_eq!("closed".parse::<RequestStatus>(), Ok(RequestStatus::Closed));
        assert!(RequestStatus::parse("archived").is_none());
    }

    #[test]
    fn test_decision_parse() {
        assert_eq!("approve".parse::<Decision>(), Ok(Decision::Approve));
        assert_eq!(" Decline ".parse::<Decision>(), Ok(Decision::Decline));
        assert!("maybe".parse::<Decision>().is_err());
        assert!("".parse::<Decision>().is_err());
    }

    #[test]
    fn test_self_request_rejected() {
        assert!(StudyRequest::pending(actor("alice"), actor("alice"), 1).is_none());
    }

    #[test]
    fn test_removal_record_is_closed() {
        let record = StudyRequest::removal_record(actor("bob"), actor("alice"), 10).unwrap();
        assert_eq!(record.status, RequestStatus::Closed);
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(record.pair().low(), &actor("alice"));
        assert!(record.involves(&actor("alice")));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_status() -> impl Strategy<Value = RequestStatus> {
        prop_oneof![
            Just(RequestStatus::Pending),
            Just(RequestStatus::Approved),
            Just(RequestStatus::Declined),
            Just(RequestStatus::Closed),
        ]
    }

    fn any_event() -> impl Strategy<Value = RequestEvent> {
        prop_oneof![
            Just(RequestEvent::Approve),
            Just(RequestEvent::Decline),
            Just(RequestEvent::Cancel),
            Just(RequestEvent::Supersede),
        ]
    }

    proptest! {
        /// Property: only pending requests move, and they always land in a terminal state
        #[test]
        fn test_transition_table_is_total(status in any_status(), event in any_event()) {
            match status.apply(event) {
                Ok(t) => {
                    prop_assert_eq!(status, RequestStatus::Pending);
                    prop_assert_eq!(t.from, status);
                    prop_assert!(t.to.is_terminal());
                    prop_assert_eq!(t.creates_link, t.to == RequestStatus::Approved);
                }
                Err(e) => {
                    prop_assert!(status.is_terminal());
                    prop_assert_eq!(e.from, status);
                }
            }
        }

        /// Property: storage names round-trip through the parser
        #[test]
        fn test_status_storage_name(status in any_status()) {
            prop_assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
    }
}
