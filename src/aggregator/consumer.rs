//! Snapshot consumers

use super::types::{AggregatorEvent, FetchFailure, PageUpdate};
use tokio::sync::mpsc;

/// Sink notified by the aggregator.
///
/// Callbacks run on the aggregator task, one at a time, so they should return
/// quickly. Consumers only ever see shared snapshots and cannot mutate the
/// collection.
pub trait SnapshotConsumer: Send + 'static {
    /// Called once per appended page with the full accumulated collection
    fn on_snapshot(&mut self, update: &PageUpdate);

    /// Called when a fetch fails
    fn on_fetch_failed(&mut self, _failure: &FetchFailure) {}

    /// Called after the collection has been cleared
    fn on_reset(&mut self) {}
}

/// Discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConsumer;

impl SnapshotConsumer for NoopConsumer {
    fn on_snapshot(&mut self, _update: &PageUpdate) {}
}

/// Forwards notifications as [`AggregatorEvent`]s over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelConsumer {
    tx: mpsc::UnboundedSender<AggregatorEvent>,
}

impl ChannelConsumer {
    /// Create the consumer and the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AggregatorEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, event: AggregatorEvent) {
        // A dropped receiver just means nobody is listening any more
        let _ = self.tx.send(event);
    }
}

impl SnapshotConsumer for ChannelConsumer {
    fn on_snapshot(&mut self, update: &PageUpdate) {
        self.forward(AggregatorEvent::PageAppended(update.clone()));
    }

    fn on_fetch_failed(&mut self, failure: &FetchFailure) {
        self.forward(AggregatorEvent::FetchFailed(failure.clone()));
    }

    fn on_reset(&mut self) {
        self.forward(AggregatorEvent::Reset);
    }
}
