//! Lifecycle events consumed by the notification collaborator
//!
//! Events are produced only after the writing transaction has committed and
//! are never fed back into this system.

use crate::{ActorId, LinkId, RequestId};
use std::fmt;

/// An outbound notification of a committed state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A new pending request was created
    RequestCreated {
        /// The new request
        request_id: RequestId,
        /// Proposing actor
        sender: ActorId,
        /// Actor asked to respond
        receiver: ActorId,
    },

    /// A request was approved and a link created
    RequestApproved {
        /// The approved request
        request_id: RequestId,
        /// The link created by the approval
        link_id: LinkId,
    },

    /// A request was declined by its receiver
    RequestDeclined {
        /// The declined request
        request_id: RequestId,
    },

    /// A request was cancelled by its sender
    RequestCancelled {
        /// The cancelled request
        request_id: RequestId,
    },

    /// A link was removed by one of its members
    LinkRemoved {
        /// The deleted link
        link_id: LinkId,
        /// Smaller member of the canonical pair
        member_a: ActorId,
        /// Larger member of the canonical pair
        member_b: ActorId,
    },
}

impl LifecycleEvent {
    /// Stable event name for logs and downstream routing
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleEvent::RequestCreated { .. } => "request_created",
            LifecycleEvent::RequestApproved { .. } => "request_approved",
            LifecycleEvent::RequestDeclined { .. } => "request_declined",
            LifecycleEvent::RequestCancelled { .. } => "request_cancelled",
            LifecycleEvent::LinkRemoved { .. } => "link_removed",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::RequestCreated {
                request_id,
                sender,
                receiver,
            } => write!(f, "{} {} ({} -> {})", self.kind(), request_id, sender, receiver),
            LifecycleEvent::RequestApproved {
                request_id,
                link_id,
            } => write!(f, "{} {} (link {})", self.kind(), request_id, link_id),
            LifecycleEvent::RequestDeclined { request_id }
            | LifecycleEvent::RequestCancelled { request_id } => {
                write!(f, "{} {}", self.kind(), request_id)
            }
            LifecycleEvent::LinkRemoved {
                link_id,
                member_a,
                member_b,
            } => write!(f, "{} {} ({}, {})", self.kind(), link_id, member_a, member_b),
        }
    }
}
