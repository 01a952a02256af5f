// Match reporter - runs match-lifecycle calls on a background tokio thread
// Bridges the async API with the sync frame loop via channels

use std::io;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc as async_mpsc;
use tokio::task::JoinSet;

use super::client::MatchApi;
use super::types::{CreateMatch, MatchId, MatchRecord, UpdateMatch, UpdateMatchResponse};

/// Commands the frame loop sends to the reporter thread
#[derive(Debug)]
pub enum ReportCommand {
    Create { ticket: u64, request: CreateMatch },
    Finish { id: MatchId, request: UpdateMatch },
    /// Finish in-flight calls, then stop
    Shutdown,
}

/// Results the reporter thread sends back to the frame loop
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Created { ticket: u64, record: MatchRecord },
    CreateFailed { ticket: u64, error: String },
    Finished(UpdateMatchResponse),
    FinishFailed { id: MatchId, error: String },
}

/// Handle the frame loop uses to talk to the reporter thread.
///
/// Every call is one attempt, never retried. Dropping the handle drains
/// in-flight calls and joins the thread.
pub struct MatchReporter {
    tx: async_mpsc::UnboundedSender<ReportCommand>,
    rx: mpsc::Receiver<ReportEvent>,
    handle: Option<JoinHandle<()>>,
    next_ticket: u64,
}

impl MatchReporter {
    pub fn spawn(api: Arc<dyn MatchApi>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let handle = thread::Builder::new()
            .name("match-reporter".to_string())
            .spawn(move || runtime.block_on(run_reporter(api, cmd_rx, event_tx)))?;

        Ok(Self {
            tx: cmd_tx,
            rx: event_rx,
            handle: Some(handle),
            next_ticket: 0,
        })
    }

    /// Ask for a match record; the returned ticket tags the reply
    pub fn create(&mut self, request: CreateMatch) -> io::Result<u64> {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.send(ReportCommand::Create { ticket, request })?;
        Ok(ticket)
    }

    pub fn finish(&self, id: MatchId, request: UpdateMatch) -> io::Result<()> {
        self.send(ReportCommand::Finish { id, request })
    }

    /// Try to receive a reporter event (non-blocking)
    pub fn try_recv_event(&self) -> Option<ReportEvent> {
        self.rx.try_recv().ok()
    }

    /// Block until the next event; used by tests and shutdown paths
    pub fn recv_event(&self) -> Option<ReportEvent> {
        self.rx.recv().ok()
    }

    fn send(&self, command: ReportCommand) -> io::Result<()> {
        self.tx
            .send(command)
            .map_err(|e| io::Error::new(io::ErrorKind::BrokenPipe, e.to_string()))
    }

    /// Stop accepting work, wait for in-flight calls, join the thread
    pub fn shutdown(&mut self) {
        let _ = self.tx.send(ReportCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("match reporter thread panicked");
            }
        }
    }
}

impl Drop for MatchReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_reporter(
    api: Arc<dyn MatchApi>,
    mut cmd_rx: async_mpsc::UnboundedReceiver<ReportCommand>,
    event_tx: mpsc::Sender<ReportEvent>,
) {
    let mut tasks = JoinSet::new();

    while let Some(command) = cmd_rx.recv().await {
        let api = Arc::clone(&api);
        let event_tx = event_tx.clone();

        match command {
            ReportCommand::Create { ticket, request } => {
                tasks.spawn(async move {
                    let event = match api.create_match(request).await {
                        Ok(record) => {
                            tracing::info!(ticket, match_id = %record.id, "match created");
                            ReportEvent::Created { ticket, record }
                        }
                        Err(e) => {
                            tracing::warn!(ticket, error = %e, "match creation failed");
                            ReportEvent::CreateFailed {
                                ticket,
                                error: e.to_string(),
                            }
                        }
                    };
                    let _ = event_tx.send(event);
                });
            }
            ReportCommand::Finish { id, request } => {
                tasks.spawn(async move {
                    let event = match api.update_match(id, request).await {
                        Ok(response) => {
                            tracing::info!(match_id = %id, "match result recorded");
                            ReportEvent::Finished(response)
                        }
                        Err(e) => {
                            tracing::warn!(match_id = %id, error = %e, "match result not recorded");
                            ReportEvent::FinishFailed {
                                id,
                                error: e.to_string(),
                            }
                        }
                    };
                    let _ = event_tx.send(event);
                });
            }
            ReportCommand::Shutdown => break,
        }

        while let Some(result) = tasks.try_join_next() {
            if let Err(e) = result {
                tracing::warn!(error = %e, "reporter task failed");
            }
        }
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            tracing::warn!(error = %e, "reporter task failed");
        }
    }
    tracing::debug!("match reporter stopped");
}
