//! Broadcast hub for connected WebSocket clients.
//!
//! One hub instance per process, owned by the router state; the client map is
//! the only place connection membership is tracked.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use issuecast_core::event::DomainEvent;

/// Opaque handle identifying one attached client.
pub type ClientId = u64;

/// Fan-out point for domain events.
///
/// Publishing is fire-and-forget: at most once per currently attached client,
/// no buffering for clients that attach later, no retry. Each client gets its
/// own unbounded queue, so a slow or broken peer never delays delivery to the
/// rest; a failed send detaches that peer and nothing else.
#[derive(Default)]
pub struct BroadcastHub {
    next_id: AtomicU64,
    clients: Mutex<HashMap<ClientId, mpsc::UnboundedSender<String>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new client; returns its id and the receiving end of its
    /// queue.
    pub fn attach(&self) -> (ClientId, mpsc::UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.clients
            .lock()
            .expect("hub lock poisoned")
            .insert(id, tx);
        debug!(client_id = id, "Client attached to broadcast hub");
        (id, rx)
    }

    /// Remove a client. Safe to call repeatedly or for an unknown id.
    pub fn detach(&self, id: ClientId) {
        let removed = self
            .clients
            .lock()
            .expect("hub lock poisoned")
            .remove(&id)
            .is_some();
        if removed {
            debug!(client_id = id, "Client detached from broadcast hub");
        }
    }

    /// Serialize the event once and deliver it to every attached client.
    ///
    /// Iterates a snapshot of the client map taken at call time; sends happen
    /// outside the lock. Clients whose queue has closed are detached.
    pub fn publish(&self, event: &DomainEvent) {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize broadcast event");
                return;
            }
        };

        let snapshot: Vec<(ClientId, mpsc::UnboundedSender<String>)> = self
            .clients
            .lock()
            .expect("hub lock poisoned")
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        debug!(
            kind = ?event.kind,
            issue_id = event.issue.id,
            clients = snapshot.len(),
            "Broadcasting event"
        );

        let mut dead = Vec::new();
        for (id, tx) in snapshot {
            if tx.send(json.clone()).is_err() {
                dead.push(id);
            }
        }
        for id in dead {
            debug!(client_id = id, "Send failed, detaching client");
            self.detach(id);
        }
    }

    /// Number of currently attached clients.
    pub fn client_count(&self) -> usize {
        self.clients.lock().expect("hub lock poisoned").len()
    }
}
