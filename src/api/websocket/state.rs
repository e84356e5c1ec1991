//! WebSocket application state

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{broadcast, RwLock};

use crate::types::Snapshot;

/// Shared application state: the latest snapshot and its fan-out channel
pub struct AppState {
    /// Snapshot handed to every new client and to page renders
    snapshot: RwLock<Snapshot>,

    /// Broadcast channel for sending snapshots to all connected clients
    snapshot_tx: broadcast::Sender<Snapshot>,

    /// Number of snapshots published so far
    sequence_counter: AtomicU64,
}

impl AppState {
    pub fn new(initial: Snapshot) -> Self {
        // Slow clients that fall this far behind skip the oldest snapshots
        let (snapshot_tx, _) = broadcast::channel(64);

        Self {
            snapshot: RwLock::new(initial),
            snapshot_tx,
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Store a new snapshot and push it to every connected client
    pub async fn publish(&self, snapshot: Snapshot) {
        {
            let mut current = self.snapshot.write().await;
            *current = snapshot.clone();
        }
        self.sequence_counter.fetch_add(1, Ordering::SeqCst);

        // Ignore send errors - they just mean no receivers are listening
        let _ = self.snapshot_tx.send(snapshot);
    }

    pub async fn current(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }
}
