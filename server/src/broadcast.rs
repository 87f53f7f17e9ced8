//! Change broadcasting infrastructure for the Listkeeper server.
//!
//! This module provides the live-update fan-out, mirroring every store
//! mutation to all connected WebSocket subscribers. It uses tokio's
//! broadcast channel for multi-producer, multi-consumer distribution.
//!
//! # Architecture
//!
//! - [`ChangeEvent`] - One mutation, serialized as `{type, payload}` for
//!   the wire.
//! - [`ChangeBroadcaster`] - The hub that distributes events to all
//!   subscribers.
//!
//! Delivery is best-effort: a send is attempted once, a subscriber that
//! falls behind the channel capacity misses events, and nothing is
//! replayed on reconnect.
//!
//! # Example
//!
//! ```rust
//! use listkeeper_server::broadcast::{ChangeBroadcaster, ChangeEvent};
//! use listkeeper_store::Todo;
//!
//! let broadcaster = ChangeBroadcaster::new();
//! let mut rx = broadcaster.subscribe();
//!
//! broadcaster.broadcast(ChangeEvent::Added(Todo::new(1, "Buy milk")));
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::{debug, trace};

use listkeeper_store::Todo;

/// Default channel capacity.
///
/// A subscriber that lags more than this many events behind starts
/// receiving `RecvError::Lagged` and simply misses the gap; the client is
/// expected to re-fetch the list if it cares.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// A single mutation of the todo collection, as seen by subscribers.
///
/// Serializes as `{"type": "...", "payload": ...}` with the type tags the
/// browser client switches on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ChangeEvent {
    /// A todo was created; payload is the new item.
    #[serde(rename = "TODO_ADDED")]
    Added(Todo),

    /// A todo was marked done; payload is the updated item.
    #[serde(rename = "TODO_UPDATED")]
    Updated(Todo),

    /// A todo was deleted; payload carries just the id.
    #[serde(rename = "TODO_DELETED")]
    Deleted {
        /// Id of the removed todo.
        id: u64,
    },

    /// The collection was reordered; payload is the entire resulting list.
    #[serde(rename = "TODOS_REORDERED")]
    Reordered(Vec<Todo>),
}

/// Central fan-out hub for distributing change events to subscribers.
///
/// Wraps a tokio broadcast channel. The broadcaster is `Clone`, `Send`,
/// and `Sync`; clones share the same channel, so any clone can broadcast
/// and any subscriber hears every clone.
///
/// The subscriber registry lives inside the channel itself: a subscriber
/// is registered by [`subscribe`](Self::subscribe) and unregistered when
/// its receiver is dropped, which happens naturally when a WebSocket
/// connection closes.
#[derive(Debug, Clone)]
pub struct ChangeBroadcaster {
    sender: Sender<ChangeEvent>,
}

impl ChangeBroadcaster {
    /// Creates a broadcaster with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a broadcaster with the specified channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        debug!(capacity, "Created change broadcaster");
        Self { sender }
    }

    /// Subscribes to receive all change events broadcast from now on.
    ///
    /// Events broadcast before the subscription are not replayed.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        let rx = self.sender.subscribe();
        debug!(
            subscriber_count = self.subscriber_count(),
            "New live-update subscriber"
        );
        rx
    }

    /// Broadcasts an event to all current subscribers.
    ///
    /// Returns the number of subscribers that received the event. Having no
    /// subscribers is not an error; the event is simply dropped. This never
    /// blocks and is never retried.
    pub fn broadcast(&self, event: ChangeEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => {
                trace!(receivers, "Change event broadcast");
                receivers
            }
            Err(_) => {
                trace!("No live-update subscribers connected");
                0
            }
        }
    }

    /// Returns the current number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // ChangeBroadcaster tests
    // ========================================================================

    #[test]
    fn broadcast_with_no_subscribers_returns_zero() {
        let broadcaster = ChangeBroadcaster::new();
        let sent = broadcaster.broadcast(ChangeEvent::Deleted { id: 1 });
        assert_eq!(sent, 0);
    }

    #[test]
    fn subscriber_count_tracks_subscribe_and_drop() {
        let broadcaster = ChangeBroadcaster::new();
        assert_eq!(broadcaster.subscriber_count(), 0);

        let rx1 = broadcaster.subscribe();
        let rx2 = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 2);

        drop(rx1);
        assert_eq!(broadcaster.subscriber_count(), 1);
        drop(rx2);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn every_subscriber_receives_every_event() {
        let broadcaster = ChangeBroadcaster::new();
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();

        let event = ChangeEvent::Added(Todo::new(1, "shared"));
        let sent = broadcaster.broadcast(event.clone());
        assert_eq!(sent, 2);

        assert_eq!(rx1.recv().await.unwrap(), event);
        assert_eq!(rx2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn events_arrive_in_broadcast_order() {
        let broadcaster = ChangeBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.broadcast(ChangeEvent::Added(Todo::new(1, "first")));
        broadcaster.broadcast(ChangeEvent::Deleted { id: 1 });

        assert!(matches!(rx.recv().await.unwrap(), ChangeEvent::Added(_)));
        assert!(matches!(
            rx.recv().await.unwrap(),
            ChangeEvent::Deleted { id: 1 }
        ));
    }

    #[tokio::test]
    async fn clones_share_the_channel() {
        let broadcaster = ChangeBroadcaster::new();
        let clone = broadcaster.clone();
        let mut rx = broadcaster.subscribe();

        clone.broadcast(ChangeEvent::Deleted { id: 7 });
        assert_eq!(rx.recv().await.unwrap(), ChangeEvent::Deleted { id: 7 });
    }

    // ========================================================================
    // ChangeEvent wire format tests
    // ========================================================================

    #[test]
    fn added_event_serializes_with_type_and_payload() {
        let todo = Todo::new(1, "Buy milk");
        let json = serde_json::to_value(ChangeEvent::Added(todo.clone())).unwrap();

        assert_eq!(json["type"], "TODO_ADDED");
        assert_eq!(json["payload"]["id"], 1);
        assert_eq!(json["payload"]["title"], "Buy milk");
        assert_eq!(json["payload"]["completed"], false);
    }

    #[test]
    fn updated_event_carries_the_item() {
        let mut todo = Todo::new(2, "done");
        todo.complete();
        let json = serde_json::to_value(ChangeEvent::Updated(todo)).unwrap();

        assert_eq!(json["type"], "TODO_UPDATED");
        assert_eq!(json["payload"]["completed"], true);
    }

    #[test]
    fn deleted_event_carries_just_the_id() {
        let json = serde_json::to_value(ChangeEvent::Deleted { id: 3 }).unwrap();

        assert_eq!(json["type"], "TODO_DELETED");
        assert_eq!(json["payload"], serde_json::json!({ "id": 3 }));
    }

    #[test]
    fn reordered_event_carries_the_full_list() {
        let todos = vec![Todo::new(2, "b"), Todo::new(1, "a")];
        let json = serde_json::to_value(ChangeEvent::Reordered(todos)).unwrap();

        assert_eq!(json["type"], "TODOS_REORDERED");
        assert_eq!(json["payload"].as_array().unwrap().len(), 2);
        assert_eq!(json["payload"][0]["id"], 2);
    }
}
