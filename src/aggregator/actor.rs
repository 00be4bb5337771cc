//! Aggregator task and its handle

use super::consumer::SnapshotConsumer;
use super::state::{Completion, FetchState};
use super::types::{AggregatorStatus, PageRequest, Snapshot};
use crate::error::{Error, Result};
use crate::listing::{ListingClient, Page};
use crate::types::Filter;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

#[derive(Debug)]
enum Command {
    RequestMore,
    Reset,
    Shutdown,
}

struct Completed {
    request: PageRequest,
    result: Result<Page>,
}

/// Owner of the aggregator state.
///
/// Runs as a single tokio task; every state change happens inside
/// [`Aggregator::run`]. Network calls run in their own tasks and report back
/// through a channel, so the state is never touched from two places at once.
pub struct Aggregator {
    client: Arc<dyn ListingClient>,
    filter: Arc<Filter>,
    state: FetchState,
    consumer: Box<dyn SnapshotConsumer>,
    commands: mpsc::UnboundedReceiver<Command>,
    completed_tx: mpsc::UnboundedSender<Completed>,
    completed_rx: mpsc::UnboundedReceiver<Completed>,
    status: watch::Sender<AggregatorStatus>,
}

impl Aggregator {
    /// Start an aggregator task on the current tokio runtime.
    ///
    /// Nothing is fetched until the first `request_more()` or `reset()`.
    pub fn spawn<C>(
        client: Arc<dyn ListingClient>,
        filter: Filter,
        page_size: u32,
        consumer: C,
    ) -> AggregatorHandle
    where
        C: SnapshotConsumer,
    {
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();

        let state = FetchState::new(page_size);
        let (status, status_rx) = watch::channel(state.status());

        let aggregator = Self {
            client,
            filter: Arc::new(filter),
            state,
            consumer: Box::new(consumer),
            commands,
            completed_tx,
            completed_rx,
            status,
        };
        tokio::spawn(aggregator.run());

        AggregatorHandle {
            commands: command_tx,
            status: status_rx,
        }
    }

    async fn run(mut self) {
        debug!(page_size = self.state.cursor().page_size(), "Aggregator started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::RequestMore) => self.request_more(),
                    Some(Command::Reset) => self.reset(),
                    Some(Command::Shutdown) | None => break,
                },
                Some(completed) = self.completed_rx.recv() => self.on_completed(completed),
            }
        }

        debug!("Aggregator stopped");
    }

    fn request_more(&mut self) {
        let Some(request) = self.state.begin() else {
            debug!(
                fetching = self.state.is_fetching(),
                has_more = self.state.cursor().can_fetch_more(),
                "request_more ignored"
            );
            return;
        };

        debug!(
            epoch = request.epoch,
            offset = request.offset,
            page_size = request.page_size,
            "Requesting page"
        );
        self.publish();

        let client = Arc::clone(&self.client);
        let filter = Arc::clone(&self.filter);
        let completed_tx = self.completed_tx.clone();
        tokio::spawn(async move {
            let fetch = tokio::spawn(async move {
                client
                    .fetch_page(&filter, request.page_size, request.offset)
                    .await
            });

            // A panicking client still has to release the fetch guard
            let result = match fetch.await {
                Ok(result) => result,
                Err(e) => Err(Error::Other(format!("listing fetch task failed: {e}"))),
            };

            // The aggregator may already be gone; the response is then moot
            let _ = completed_tx.send(Completed { request, result });
        });
    }

    fn reset(&mut self) {
        self.state.reset();
        debug!(epoch = self.state.epoch(), "Listing reset");
        self.publish();
        self.consumer.on_reset();
        self.request_more();
    }

    fn on_completed(&mut self, completed: Completed) {
        match self.state.complete(completed.request, completed.result) {
            Completion::Appended(update) => {
                self.publish();
                if !update.has_more {
                    info!(
                        total = update.snapshot.len(),
                        "Listing exhausted after short page of {}", update.page_len
                    );
                }
                self.consumer.on_snapshot(&update);
            }
            Completion::Failed(failure) => {
                warn!(
                    kind = %failure.kind,
                    offset = failure.offset,
                    "Listing fetch failed: {}", failure.message
                );
                self.publish();
                self.consumer.on_fetch_failed(&failure);
            }
            Completion::Stale { epoch } => {
                debug!(
                    stale_epoch = epoch,
                    current_epoch = self.state.epoch(),
                    "Discarding stale listing response"
                );
                self.publish();
            }
        }
    }

    fn publish(&self) {
        self.status.send_replace(self.state.status());
    }
}

/// Cloneable front end to a running [`Aggregator`]
///
/// `request_more()` and `reset()` only enqueue a command and never block,
/// so they can be called from scroll or resize handlers as often as needed.
#[derive(Debug, Clone)]
pub struct AggregatorHandle {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<AggregatorStatus>,
}

impl AggregatorHandle {
    /// Fetch the next page unless one is in flight or the listing is exhausted
    pub fn request_more(&self) -> Result<()> {
        self.send(Command::RequestMore)
    }

    /// Clear the collection, rewind to the first page and fetch it
    pub fn reset(&self) -> Result<()> {
        self.send(Command::Reset)
    }

    /// Stop the aggregator task. In-flight responses are dropped.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }

    /// The collection as of the last completed page
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.status.borrow().snapshot)
    }

    /// Latest published status
    pub fn status(&self) -> AggregatorStatus {
        self.status.borrow().clone()
    }

    /// Receiver that observes every published status
    pub fn subscribe(&self) -> watch::Receiver<AggregatorStatus> {
        self.status.clone()
    }

    /// Whether the aggregator task has stopped
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Wait until the aggregator task has stopped
    pub async fn closed(&self) {
        self.commands.closed().await;
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| Error::AggregatorClosed)
    }
}
