//! Study Link Service
//!
//! Request lifecycle and link registry for study partnerships between actors.
//!
//! # Overview
//!
//! The service is responsible for:
//! - **Requests**: sending, approving, declining, and cancelling partnership requests
//! - **Links**: the symmetric set of confirmed partnerships, and their removal
//! - **Queries**: lazy, newest-first views of incoming, outgoing, and historical requests
//! - **Events**: lifecycle notifications published after each committed change
//!
//! # Request Lifecycle
//!
//! | From | Event | To | Who |
//! |------|-------|----|-----|
//! | **pending** | approve | approved (link created) | receiver |
//! | **pending** | decline | declined | receiver |
//! | **pending** | cancel | closed | sender |
//! | **pending** | supersede | closed | approval of a sibling request |
//!
//! Every other combination is rejected with [`ServiceError::NotPending`].
//!
//! # Concurrency
//!
//! Each service instance owns one SQLite connection. Instances on the same
//! database file coordinate through `BEGIN IMMEDIATE` transactions and the
//! schema's unique constraints, so two instances racing to create the same
//! request or approve the same request produce exactly one winner.
//!
//! # Usage
//!
//! ```no_run
//! use studylink_domain::{ActorId, Decision};
//! use studylink_service::{ChannelSink, EventDispatcher, LogNotifier, ServiceConfig, StudyService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (sink, events) = ChannelSink::new();
//!     let dispatcher = tokio::spawn(async move {
//!         EventDispatcher::new(LogNotifier).drain(events).await
//!     });
//!
//!     let config = ServiceConfig::from_file("studylink.toml")?;
//!     let mut service = StudyService::open(config, sink)?;
//!
//!     let alice = ActorId::new("alice")?;
//!     let bob = ActorId::new("bob")?;
//!     let request = service.send_request(&alice, &bob)?;
//!     service.respond_to_request(&bob, request.id, Decision::Approve)?;
//!
//!     for request in service.history(&alice) {
//!         let request = request?;
//!         println!("{} -> {} ({})", request.sender, request.receiver, request.status);
//!     }
//!
//!     drop(service);
//!     let stats = dispatcher.await?;
//!     println!("Delivered {} events", stats.delivered);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod config;
mod dispatcher;
mod error;
mod events;
mod lifecycle;
pub mod registry;

pub use config::{ConfigError, ServiceConfig};
pub use dispatcher::{DispatchStats, EventDispatcher, LogNotifier, Notifier};
pub use error::ServiceError;
pub use events::ChannelSink;
pub use lifecycle::StudyService;
pub use registry::Removal;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in milliseconds since Unix epoch
pub(crate) fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
