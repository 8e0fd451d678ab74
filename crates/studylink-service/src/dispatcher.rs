//! Background worker that delivers lifecycle events to a notifier

use std::convert::Infallible;
use std::fmt;
use studylink_domain::LifecycleEvent;
use tokio::sync::mpsc::UnboundedReceiver;

/// Downstream consumer of lifecycle events
///
/// Implemented by the notification collaborator. A failed delivery is logged
/// and skipped; the dispatcher never retries.
pub trait Notifier {
    /// Error type for delivery failures
    type Error: fmt::Display;

    /// Deliver one event
    fn notify(&mut self, event: &LifecycleEvent) -> Result<(), Self::Error>;
}

/// Notifier that writes every event to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    type Error = Infallible;

    fn notify(&mut self, event: &LifecycleEvent) -> Result<(), Self::Error> {
        tracing::info!(kind = event.kind(), "{}", event);
        Ok(())
    }
}

/// Delivery counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events the notifier accepted
    pub delivered: usize,

    /// Events the notifier rejected
    pub failed: usize,
}

/// Worker draining a [`ChannelSink`](crate::ChannelSink) receiver
///
/// # Examples
///
/// ```no_run
/// use studylink_service::{ChannelSink, EventDispatcher, LogNotifier};
///
/// #[tokio::main]
/// async fn main() {
///     let (sink, events) = ChannelSink::new();
///     let mut dispatcher = EventDispatcher::new(LogNotifier);
///
///     // hand `sink` to each StudyService, then:
///     # drop(sink);
///     let stats = dispatcher.run(events).await;
///     println!("delivered {}", stats.delivered);
/// }
/// ```
pub struct EventDispatcher<N: Notifier> {
    notifier: N,
    stats: DispatchStats,
}

impl<N: Notifier> EventDispatcher<N> {
    /// Create a dispatcher for the given notifier
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            stats: DispatchStats::default(),
        }
    }

    /// Get the delivery counters so far
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Get a reference to the notifier
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Deliver events until every sender is dropped or Ctrl+C is received
    pub async fn run(&mut self, mut events: UnboundedReceiver<LifecycleEvent>) -> DispatchStats {
        tracing::info!("Event dispatcher started");

        loop {
            tokio::select! {
                received = events.recv() => match received {
                    Some(event) => self.deliver(&event),
                    None => {
                        tracing::debug!("All event senders dropped");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping event dispatcher");
                    break;
                }
            }
        }

        tracing::info!(
            delivered = self.stats.delivered,
            failed = self.stats.failed,
            "Event dispatcher stopped"
        );
        self.stats
    }

    /// Deliver events until every sender is dropped
    pub async fn drain(&mut self, mut events: UnboundedReceiver<LifecycleEvent>) -> DispatchStats {
        while let Some(event) = events.recv().await {
            self.deliver(&event);
        }
        self.stats
    }

    fn deliver(&mut self, event: &LifecycleEvent) {
        match self.notifier.notify(event) {
            Ok(()) => self.stats.delivered += 1,
            Err(e) => {
                self.stats.failed += 1;
                tracing::warn!(kind = event.kind(), error = %e, "Event delivery failed");
            }
        }
    }
}
