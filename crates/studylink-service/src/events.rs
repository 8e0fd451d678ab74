//! Event sinks backed by a tokio channel

use studylink_domain::{EventSink, LifecycleEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Sink that forwards events into an unbounded channel
///
/// Sending never blocks. If the receiving side is gone the event is logged
/// and dropped; the committed operation is not affected.
///
/// # Examples
///
/// ```
/// use studylink_domain::{EventSink, LifecycleEvent, RequestId};
/// use studylink_service::ChannelSink;
///
/// let (sink, mut events) = ChannelSink::new();
/// sink.publish(LifecycleEvent::RequestDeclined { request_id: RequestId::new() });
/// assert_eq!(events.try_recv().unwrap().kind(), "request_declined");
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<LifecycleEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver that consumes its events
    pub fn new() -> (Self, UnboundedReceiver<LifecycleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: LifecycleEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::warn!(event = %e.0, "Dropping lifecycle event: no consumer");
        }
    }
}
