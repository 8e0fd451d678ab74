//! Study Link Domain Layer
//!
//! This crate contains the core data model for study partnerships. It has no
//! dependencies beyond `uuid` and defines the value types, the request state
//! machine, and the trait interfaces that the store and service layers build on.
//!
//! ## Key Concepts
//!
//! - **Actor**: An externally authenticated identity, treated as an opaque value
//! - **Study Request**: A directed proposal from one actor to another
//! - **Study Link**: A confirmed, undirected partnership between two actors
//! - **Canonical Pair**: An unordered actor pair normalized to a fixed order
//! - **Lifecycle Events**: Outbound notifications emitted after a commit
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - Pure business rules only (the transition table lives here)
//! - Persistence lives in `studylink-store`
//! - Trait definitions for all outbound interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actor;
pub mod event;
pub mod ids;
pub mod link;
pub mod pair;
pub mod request;
pub mod traits;

// Re-exports for convenience
pub use actor::ActorId;
pub use event::LifecycleEvent;
pub use ids::{LinkId, RequestId};
pub use link::StudyLink;
pub use pair::CanonicalPair;
pub use request::{
    Decision, InvalidTransition, RequestEvent, RequestStatus, StudyRequest, Transition,
};
pub use traits::{EventSink, NullSink};
