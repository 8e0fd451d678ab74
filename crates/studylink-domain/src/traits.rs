//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Implementations live in other crates.

use crate::LifecycleEvent;
use std::sync::Arc;

/// Destination for lifecycle events
///
/// Publishing is fire-and-forget: the caller has already committed and does
/// not wait for, or learn about, delivery failures. Implementations must not
/// block on the downstream consumer.
///
/// Implemented by the service layer (`studylink-service`)
pub trait EventSink {
    /// Hand an event to the notification collaborator
    fn publish(&self, event: LifecycleEvent);
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn publish(&self, event: LifecycleEvent) {
        (**self).publish(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn publish(&self, event: LifecycleEvent) {
        (**self).publish(event)
    }
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: LifecycleEvent) {}
}
