//! Background delivery of log entries to the search index.
//!
//! Producers never wait on the backend: entries go into a bounded queue and a
//! single worker writes them one by one. Delivery is best-effort; a full queue
//! or a failed write drops the entry and bumps `search_log_entries_dropped_total`.

use metrics::counter;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::client::IndexClient;
use crate::entry::LogEntry;
use crate::error::{SinkError, SinkResult};

/// The log index, provisioned at most once.
pub struct SearchIndex<C> {
    client: Arc<C>,
    name: String,
    ready: OnceCell<()>,
}

impl<C: IndexClient> SearchIndex<C> {
    pub fn new(client: Arc<C>, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
            ready: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// Creates the index if it is missing. Concurrent callers share one attempt;
    /// a failed attempt leaves the index uninitialized.
    pub async fn ensure_ready(&self) -> SinkResult<()> {
        self.ready
            .get_or_try_init(|| async {
                let exists = self
                    .client
                    .index_exists(&self.name)
                    .await
                    .map_err(|e| self.init_error(e.to_string()))?;

                if exists {
                    debug!(index = %self.name, "Search index already exists");
                    return Ok(());
                }

                let acknowledged = self
                    .client
                    .create_index(&self.name)
                    .await
                    .map_err(|e| self.init_error(e.to_string()))?;

                if !acknowledged {
                    return Err(self.init_error("index creation was not acknowledged".into()));
                }

                info!(index = %self.name, "Created search index");
                Ok(())
            })
            .await
            .map(|_| ())
    }

    fn init_error(&self, reason: String) -> SinkError {
        SinkError::IndexInit {
            index: self.name.clone(),
            reason,
        }
    }
}

/// Cheap, cloneable producer handle.
#[derive(Clone)]
pub struct LogShipper {
    sender: Sender<LogEntry>,
}

impl LogShipper {
    /// A shipper and the receiving end of its queue, with no worker attached.
    pub fn channel(capacity: usize) -> (Self, Receiver<LogEntry>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Provisions the index, then spawns the worker.
    ///
    /// Fails with [`SinkError::IndexInit`] when the index cannot be provisioned.
    /// The worker exits once every `LogShipper` clone is dropped and the queue is drained.
    pub async fn start<C>(
        client: Arc<C>,
        index: impl Into<String>,
        capacity: usize,
    ) -> SinkResult<(Self, JoinHandle<()>)>
    where
        C: IndexClient + 'static,
    {
        let index = SearchIndex::new(client, index);
        index.ensure_ready().await?;

        let (shipper, receiver) = Self::channel(capacity);
        let worker = tokio::spawn(run_worker(index, receiver));

        Ok((shipper, worker))
    }

    /// Enqueues without waiting. Returns `false` when the entry was dropped.
    pub fn try_ship(&self, entry: LogEntry) -> bool {
        match self.sender.try_send(entry) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                counter!("search_log_entries_dropped_total", "reason" => "queue_full")
                    .increment(1);
                false
            }
            Err(TrySendError::Closed(_)) => {
                counter!("search_log_entries_dropped_total", "reason" => "closed").increment(1);
                false
            }
        }
    }
}

async fn run_worker<C: IndexClient>(index: SearchIndex<C>, mut receiver: Receiver<LogEntry>) {
    while let Some(entry) = receiver.recv().await {
        let written = match index.ensure_ready().await {
            Ok(()) => index.client.index_document(index.name(), &entry).await,
            Err(e) => Err(e),
        };

        match written {
            Ok(()) => counter!("search_log_entries_shipped_total").increment(1),
            Err(e) => {
                counter!("search_log_entries_dropped_total", "reason" => "write_failed")
                    .increment(1);
                debug!(error = %e, "Dropping log entry");
            }
        }
    }

    debug!(index = %index.name(), "Log shipper stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockIndexClient;
    use crate::severity::Severity;
    use serde_json::Map;
    use std::sync::Mutex;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            host: "localhost".to_string(),
            timestamp: "2025-01-01T00:00:00.000000000Z".to_string(),
            file: String::new(),
            function: String::new(),
            message: message.to_string(),
            data: Map::new(),
            level: Severity::Info,
        }
    }

    #[tokio::test]
    async fn test_existing_index_is_not_recreated() {
        let mut client = MockIndexClient::new();
        client
            .expect_index_exists()
            .times(1)
            .returning(|_| Ok(true));
        client.expect_create_index().never();

        let index = SearchIndex::new(Arc::new(client), "product_api_log");
        index.ensure_ready().await.unwrap();
        index.ensure_ready().await.unwrap();
        assert!(index.is_ready());
    }

    #[tokio::test]
    async fn test_missing_index_is_created_once() {
        let mut client = MockIndexClient::new();
        client
            .expect_index_exists()
            .times(1)
            .returning(|_| Ok(false));
        client
            .expect_create_index()
            .times(1)
            .returning(|index| {
                assert_eq!(index, "product_api_log");
                Ok(true)
            });

        let index = SearchIndex::new(Arc::new(client), "product_api_log");
        index.ensure_ready().await.unwrap();
        index.ensure_ready().await.unwrap();
    }

    #[tokio::test]
    async fn test_unacknowledged_creation_fails_startup() {
        let mut client = MockIndexClient::new();
        client.expect_index_exists().returning(|_| Ok(false));
        client.expect_create_index().returning(|_| Ok(false));

        let result = LogShipper::start(Arc::new(client), "product_api_log", 8).await;
        assert!(matches!(result, Err(SinkError::IndexInit { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails_startup() {
        let mut client = MockIndexClient::new();
        client
            .expect_index_exists()
            .returning(|_| Err(SinkError::Transport("connection refused".into())));

        let err = LogShipper::start(Arc::new(client), "product_api_log", 8)
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_worker_writes_entries_in_order() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = written.clone();

        let mut client = MockIndexClient::new();
        client.expect_index_exists().returning(|_| Ok(true));
        client
            .expect_index_document()
            .times(3)
            .returning(move |_, entry| {
                sink.lock().unwrap().push(entry.message.clone());
                Ok(())
            });

        let (shipper, worker) = LogShipper::start(Arc::new(client), "product_api_log", 8)
            .await
            .unwrap();

        for message in ["one", "two", "three"] {
            assert!(shipper.try_ship(entry(message)));
        }
        drop(shipper);
        worker.await.unwrap();

        assert_eq!(*written.lock().unwrap(), vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_write_failures_are_swallowed() {
        let mut client = MockIndexClient::new();
        client.expect_index_exists().returning(|_| Ok(true));
        client
            .expect_index_document()
            .times(2)
            .returning(|_, _| {
                Err(SinkError::Backend {
                    status: 503,
                    body: "unavailable".into(),
                })
            });

        let (shipper, worker) = LogShipper::start(Arc::new(client), "product_api_log", 8)
            .await
            .unwrap();

        assert!(shipper.try_ship(entry("first")));
        assert!(shipper.try_ship(entry("second")));
        drop(shipper);

        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_full_queue_drops_instead_of_blocking() {
        let (shipper, mut receiver) = LogShipper::channel(1);

        assert!(shipper.try_ship(entry("kept")));
        assert!(!shipper.try_ship(entry("dropped")));

        assert_eq!(receiver.recv().await.unwrap().message, "kept");
    }

    #[tokio::test]
    async fn test_closed_queue_drops() {
        let (shipper, receiver) = LogShipper::channel(4);
        drop(receiver);

        assert!(!shipper.try_ship(entry("late")));
    }
}
