//! Snapshot watcher
//!
//! Watches the data directory with `notify`, buffers change events per
//! key over a debounce window, and applies them to the in-memory store.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, timeout};
use tracing::{debug, error, info, warn};

use insightflow_config::SyncConfig;
use insightflow_core::{AnalysisRecord, FormResponse, FormTemplate};
use insightflow_storage::{AppStore, DurableStore, StoreKey};

use crate::error::{SyncError, SyncResult};

/// One observed change to a snapshot key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Snapshot written or rewritten
    KeyChanged(StoreKey),
    /// Snapshot deleted
    KeyRemoved(StoreKey),
}

/// Watches the data directory and reconciles external snapshot changes
/// into the store
pub struct StoreWatcher {
    watcher: Option<RecommendedWatcher>,
    store: Arc<AppStore>,
    durable: DurableStore,
    event_tx: mpsc::UnboundedSender<SyncEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<SyncEvent>>,
    config: SyncConfig,
    shutdown_tx: Option<oneshot::Sender<()>>,
    processor_handle: Option<tokio::task::JoinHandle<()>>,
}

impl StoreWatcher {
    /// Create a watcher over the store's data directory. The durable
    /// handle must share the store's own-write ledger (use
    /// `store.durable().clone()`).
    pub fn new(store: Arc<AppStore>, config: SyncConfig) -> Self {
        let durable = store.durable().clone();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            watcher: None,
            store,
            durable,
            event_tx,
            event_rx: Some(event_rx),
            config,
            shutdown_tx: None,
            processor_handle: None,
        }
    }

    /// Start watching. A disabled config makes this a no-op.
    pub fn start(&mut self) -> SyncResult<()> {
        if !self.config.enabled {
            info!("Snapshot watching is disabled");
            return Ok(());
        }

        info!("Starting snapshot watcher on {:?}", self.durable.data_dir());

        let event_tx = self.event_tx.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Err(e) = Self::handle_notify_event(event, &event_tx) {
                        error!("Failed to handle notify event: {}", e);
                    }
                }
                Err(e) => error!("Notify error: {}", e),
            },
            Config::default(),
        )?;

        watcher.watch(self.durable.data_dir(), RecursiveMode::NonRecursive)?;
        self.watcher = Some(watcher);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        if let Some(event_rx) = self.event_rx.take() {
            let processor = EventProcessor {
                store: self.store.clone(),
                durable: self.durable.clone(),
                debounce_ms: self.config.debounce_ms,
            };
            let handle = tokio::spawn(async move {
                processor.run(event_rx, shutdown_rx).await;
            });
            self.processor_handle = Some(handle);
        }

        info!("Snapshot watcher started");
        Ok(())
    }

    /// Stop watching and drain the processor
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.processor_handle.take() {
            let _ = timeout(Duration::from_secs(5), handle).await;
        }
        self.watcher = None;
        info!("Snapshot watcher stopped");
    }

    fn handle_notify_event(
        event: Event,
        event_tx: &mpsc::UnboundedSender<SyncEvent>,
    ) -> SyncResult<()> {
        match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) => {
                for path in event.paths {
                    if let Some(key) = StoreKey::from_path(&path) {
                        debug!("Snapshot changed: {}", key);
                        event_tx
                            .send(SyncEvent::KeyChanged(key))
                            .map_err(|e| SyncError::channel(e.to_string()))?;
                    }
                }
            }
            EventKind::Remove(_) => {
                for path in event.paths {
                    if let Some(key) = StoreKey::from_path(&path) {
                        debug!("Snapshot removed: {}", key);
                        event_tx
                            .send(SyncEvent::KeyRemoved(key))
                            .map_err(|e| SyncError::channel(e.to_string()))?;
                    }
                }
            }
            _ => {
                // Ignore access/other events
            }
        }
        Ok(())
    }
}

struct EventProcessor {
    store: Arc<AppStore>,
    durable: DurableStore,
    debounce_ms: u64,
}

impl EventProcessor {
    async fn run(
        self,
        mut event_rx: mpsc::UnboundedReceiver<SyncEvent>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        let mut pending: HashMap<StoreKey, SyncEvent> = HashMap::new();
        let mut debounce = interval(Duration::from_millis(self.debounce_ms));

        loop {
            tokio::select! {
                Some(event) = event_rx.recv() => {
                    Self::buffer_event(&mut pending, event);
                }

                _ = debounce.tick() => {
                    if !pending.is_empty() {
                        self.process_pending(&mut pending).await;
                    }
                }

                _ = &mut shutdown_rx => {
                    debug!("Sync processor shutting down");
                    break;
                }
            }
        }

        if !pending.is_empty() {
            self.process_pending(&mut pending).await;
        }
    }

    fn buffer_event(pending: &mut HashMap<StoreKey, SyncEvent>, event: SyncEvent) {
        let key = match &event {
            SyncEvent::KeyChanged(key) | SyncEvent::KeyRemoved(key) => *key,
        };
        // Later events for the same key win within the window
        pending.insert(key, event);
    }

    async fn process_pending(&self, pending: &mut HashMap<StoreKey, SyncEvent>) {
        let events: Vec<_> = pending.drain().map(|(_, event)| event).collect();
        debug!("Processing {} snapshot events", events.len());

        for event in events {
            match event {
                SyncEvent::KeyChanged(key) => {
                    if let Err(e) = self.apply_changed(key).await {
                        error!("Failed to apply snapshot change for '{}': {}", key, e);
                    }
                }
                SyncEvent::KeyRemoved(key) => {
                    if key == StoreKey::Session {
                        self.store.force_logout().await;
                    }
                    // Removal of a collection snapshot is not reconciled;
                    // in-memory state stays until the next change
                }
            }
        }
    }

    async fn apply_changed(&self, key: StoreKey) -> SyncResult<()> {
        // Only these keys participate in cross-context reconciliation
        if !matches!(
            key,
            StoreKey::Forms | StoreKey::Responses | StoreKey::Analyses | StoreKey::Session
        ) {
            return Ok(());
        }

        let bytes = match self.durable.read_raw(key)? {
            Some(bytes) if !bytes.is_empty() => bytes,
            // A rewritten-empty or vanished session snapshot means logout
            _ if key == StoreKey::Session => {
                self.store.force_logout().await;
                return Ok(());
            }
            _ => return Ok(()),
        };

        if self.durable.was_own_write(key, &bytes) {
            debug!("Skipping own write for '{}'", key);
            return Ok(());
        }

        match key {
            StoreKey::Forms => {
                let forms: Vec<FormTemplate> = Self::parse(key, &bytes)?;
                self.store.replace_forms(forms).await;
            }
            StoreKey::Responses => {
                let responses: Vec<FormResponse> = Self::parse(key, &bytes)?;
                self.store.replace_responses(responses).await;
            }
            StoreKey::Analyses => {
                let analyses: Vec<AnalysisRecord> = Self::parse(key, &bytes)?;
                self.store.replace_analyses(analyses).await;
            }
            StoreKey::Session => {
                // A foreign session write is another context logging in;
                // the local session is left alone
            }
            _ => unreachable!("filtered above"),
        }
        info!("Reconciled external change to '{}'", key);
        Ok(())
    }

    fn parse<T: serde::de::DeserializeOwned>(key: StoreKey, bytes: &[u8]) -> SyncResult<T> {
        serde_json::from_slice(bytes).map_err(|e| {
            warn!("Ignoring unparseable external snapshot for '{}'", key);
            SyncError::Storage(insightflow_storage::StorageError::corrupt(
                key.to_string(),
                e.to_string(),
            ))
        })
    }
}
