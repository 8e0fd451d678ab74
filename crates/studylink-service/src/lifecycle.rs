//! Request lifecycle manager
//!
//! [`StudyService`] is the entry point for the API layer. Every write
//! re-validates its preconditions inside one consistency-guard transaction and
//! publishes lifecycle events only after that transaction has committed.

use crate::registry::{self, Removal};
use crate::{current_timestamp_ms, ServiceConfig, ServiceError};
use studylink_domain::{
    ActorId, Decision, EventSink, LifecycleEvent, RequestEvent, RequestId, StudyRequest,
    Transition,
};
use studylink_store::{RequestCursor, RequestFilter, SqliteStore, Tx};

/// Study partnership service
///
/// Holds an injected store handle and event sink. Open one per request
/// handler thread; they coordinate through the database, not through memory.
///
/// # Examples
///
/// ```no_run
/// use studylink_domain::{ActorId, Decision, NullSink};
/// use studylink_service::{ServiceConfig, StudyService};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut service = StudyService::open(ServiceConfig::in_memory(), NullSink)?;
/// let alice = ActorId::new("alice")?;
/// let bob = ActorId::new("bob")?;
/// service.register_actor(&alice)?;
/// service.register_actor(&bob)?;
///
/// let request = service.send_request(&alice, &bob)?;
/// service.respond_to_request(&bob, request.id, Decision::Approve)?;
/// assert_eq!(service.my_partners(&alice)?, vec![bob]);
/// # Ok(())
/// # }
/// ```
pub struct StudyService<S: EventSink> {
    store: SqliteStore,
    sink: S,
    config: ServiceConfig,
}

impl<S: EventSink> StudyService<S> {
    /// Create a service over an already opened store
    pub fn new(store: SqliteStore, sink: S, config: ServiceConfig) -> Self {
        Self {
            store,
            sink,
            config,
        }
    }

    /// Open the configured store and create a service over it
    pub fn open(config: ServiceConfig, sink: S) -> Result<Self, ServiceError> {
        let store = SqliteStore::open(&config.store)?;
        Ok(Self::new(store, sink, config))
    }

    /// Get a reference to the underlying store
    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Make an actor resolvable; returns `true` if it was new
    pub fn register_actor(&self, actor: &ActorId) -> Result<bool, ServiceError> {
        Ok(self.store.register_actor(actor, current_timestamp_ms())?)
    }

    /// Propose a partnership from `sender` to `receiver`
    ///
    /// Preconditions are checked in a fixed order and the first failure wins:
    /// distinct actors, both registered, not already linked, no pending
    /// request in either direction.
    pub fn send_request(
        &mut self,
        sender: &ActorId,
        receiver: &ActorId,
    ) -> Result<StudyRequest, ServiceError> {
        if sender == receiver {
            return Err(ServiceError::SelfRequest);
        }

        let now = current_timestamp_ms();
        let request = self
            .store
            .atomically(|tx| -> Result<StudyRequest, ServiceError> {
                for actor in [sender, receiver] {
                    if !tx.actor_exists(actor)? {
                        return Err(ServiceError::ActorNotFound(actor.clone()));
                    }
                }

                if registry::exists(tx, sender, receiver)? {
                    return Err(ServiceError::AlreadyLinked);
                }

                let request = StudyRequest::pending(sender.clone(), receiver.clone(), now)
                    .ok_or(ServiceError::SelfRequest)?;
                if !tx.pending_for_pair(&request.pair())?.is_empty() {
                    return Err(ServiceError::DuplicatePending);
                }

                tx.insert_request(&request)?;
                Ok(request)
            })
            .inspect_err(|e| log_rejection("send_request", e))?;

        tracing::info!(
            request_id = %request.id,
            sender = %sender,
            receiver = %receiver,
            "Study request created"
        );
        self.publish(LifecycleEvent::RequestCreated {
            request_id: request.id,
            sender: request.sender.clone(),
            receiver: request.receiver.clone(),
        });

        Ok(request)
    }

    /// Approve or decline a pending request as its receiver
    ///
    /// Approval sets the request to approved, creates the link, and closes
    /// any other pending request for the same pair, all in one transaction.
    pub fn respond_to_request(
        &mut self,
        responder: &ActorId,
        request_id: RequestId,
        decision: Decision,
    ) -> Result<StudyRequest, ServiceError> {
        let now = current_timestamp_ms();
        let (request, event) = self
            .store
            .atomically(|tx| -> Result<(StudyRequest, LifecycleEvent), ServiceError> {
                let mut request = load_request(tx, request_id)?;
                if &request.receiver != responder {
                    return Err(ServiceError::NotAuthorized(format!(
                        "only the receiver of request {} can respond to it",
                        request_id
                    )));
                }

                let step = transition(tx, &mut request, decision.into(), now)?;

                let event = if step.creates_link {
                    let link = registry::create(tx, &request.sender, &request.receiver, now)?;
                    let superseded = close_siblings(tx, &request, now)?;
                    if superseded > 0 {
                        tracing::warn!(
                            request_id = %request.id,
                            superseded,
                            "Closed sibling pending requests on approval"
                        );
                    }
                    LifecycleEvent::RequestApproved {
                        request_id: request.id,
                        link_id: link.id,
                    }
                } else {
                    LifecycleEvent::RequestDeclined {
                        request_id: request.id,
                    }
                };
                Ok((request, event))
            })
            .inspect_err(|e| log_rejection("respond_to_request", e))?;

        tracing::info!(
            request_id = %request.id,
            decision = decision.as_str(),
            "Study request answered"
        );
        self.publish(event);

        Ok(request)
    }

    /// Respond with a decision given as text
    ///
    /// Anything other than `approve` or `decline` is rejected with
    /// [`ServiceError::InvalidDecision`] before the store is touched.
    pub fn respond_to_request_str(
        &mut self,
        responder: &ActorId,
        request_id: RequestId,
        decision: &str,
    ) -> Result<StudyRequest, ServiceError> {
        let decision: Decision = decision.parse().map_err(ServiceError::InvalidDecision)?;
        self.respond_to_request(responder, request_id, decision)
    }

    /// Withdraw a pending request as its sender
    pub fn cancel_request(
        &mut self,
        caller: &ActorId,
        request_id: RequestId,
    ) -> Result<StudyRequest, ServiceError> {
        let now = current_timestamp_ms();
        let request = self
            .store
            .atomically(|tx| -> Result<StudyRequest, ServiceError> {
                let mut request = load_request(tx, request_id)?;
                if &request.sender != caller {
                    return Err(ServiceError::NotAuthorized(format!(
                        "only the sender of request {} can cancel it",
                        request_id
                    )));
                }

                transition(tx, &mut request, RequestEvent::Cancel, now)?;
                Ok(request)
            })
            .inspect_err(|e| log_rejection("cancel_request", e))?;

        tracing::info!(request_id = %request.id, "Study request cancelled");
        self.publish(LifecycleEvent::RequestCancelled {
            request_id: request.id,
        });

        Ok(request)
    }

    /// Pending requests the actor has received, newest first
    pub fn incoming_pending(&self, actor: &ActorId) -> RequestCursor<'_> {
        self.cursor(RequestFilter::IncomingPending(actor.clone()))
    }

    /// Pending requests the actor has sent, newest first
    pub fn outgoing_pending(&self, actor: &ActorId) -> RequestCursor<'_> {
        self.cursor(RequestFilter::OutgoingPending(actor.clone()))
    }

    /// Every request the actor is part of, any status, newest first
    pub fn history(&self, actor: &ActorId) -> RequestCursor<'_> {
        self.cursor(RequestFilter::History(actor.clone()))
    }

    /// Get a request by ID
    pub fn get_request(&self, request_id: RequestId) -> Result<Option<StudyRequest>, ServiceError> {
        Ok(self.store.get_request(request_id)?)
    }

    /// Actors linked to `actor`, most recently linked first
    pub fn my_partners(&self, actor: &ActorId) -> Result<Vec<ActorId>, ServiceError> {
        registry::partners_of(&self.store, actor)
    }

    /// Whether the two actors are currently partners
    pub fn are_partners(&self, a: &ActorId, b: &ActorId) -> Result<bool, ServiceError> {
        Ok(registry::link_for(&self.store, a, b)?.is_some())
    }

    /// Dissolve the caller's partnership with `partner`
    ///
    /// Either member may remove the link. A closed history record is appended
    /// and a `LinkRemoved` event published after commit.
    pub fn remove_partner(
        &mut self,
        caller: &ActorId,
        partner: &ActorId,
    ) -> Result<Removal, ServiceError> {
        let now = current_timestamp_ms();
        let removal = self
            .store
            .atomically(|tx| registry::remove(tx, caller, partner, now))
            .inspect_err(|e| log_rejection("remove_partner", e))?;

        tracing::info!(
            link_id = %removal.link.id,
            removed_by = %caller,
            "Study link removed"
        );
        self.publish(LifecycleEvent::LinkRemoved {
            link_id: removal.link.id,
            member_a: removal.link.member_a.clone(),
            member_b: removal.link.member_b.clone(),
        });

        Ok(removal)
    }

    fn cursor(&self, filter: RequestFilter) -> RequestCursor<'_> {
        self.store.requests(filter, self.config.page_size)
    }

    fn publish(&self, event: LifecycleEvent) {
        tracing::debug!(kind = event.kind(), "Publishing lifecycle event");
        self.sink.publish(event);
    }
}

fn load_request(tx: &Tx<'_>, request_id: RequestId) -> Result<StudyRequest, ServiceError> {
    tx.get_request(request_id)?
        .ok_or(ServiceError::RequestNotFound(request_id))
}

/// Apply `event` to the request and persist the new status
fn transition(
    tx: &Tx<'_>,
    request: &mut StudyRequest,
    event: RequestEvent,
    now: u64,
) -> Result<Transition, ServiceError> {
    let not_pending = |request: &StudyRequest| ServiceError::NotPending {
        id: request.id,
        status: request.status,
    };

    let step = request.status.apply(event).map_err(|_| not_pending(request))?;
    if !tx.update_status(request.id, step.from, step.to, now)? {
        return Err(not_pending(request));
    }

    request.status = step.to;
    request.updated_at = now;
    Ok(step)
}

/// Supersede every other pending request for the approved request's pair
fn close_siblings(tx: &Tx<'_>, approved: &StudyRequest, now: u64) -> Result<usize, ServiceError> {
    let mut closed = 0;
    for mut sibling in tx.pending_for_pair(&approved.pair())? {
        if sibling.id == approved.id {
            continue;
        }
        transition(tx, &mut sibling, RequestEvent::Supersede, now)?;
        closed += 1;
    }
    Ok(closed)
}

fn log_rejection(operation: &str, err: &ServiceError) {
    if err.is_domain() {
        tracing::debug!(operation, error = %err, "Operation rejected");
    } else {
        tracing::warn!(operation, error = %err, "Operation failed");
    }
}
