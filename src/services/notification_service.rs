use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::models::teacher::Teacher;
use crate::models::vacancy::{ApplicationStatus, Vacancy};

pub type ObserverId = u64;

/// State-change events pushed to connected dashboard observers. Serialized as
/// `{"type": "...", "data": {...}}`, which is the envelope the dashboard's
/// live channel consumes to reconcile its local caches between polls.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum DashboardEvent {
    #[serde(rename = "NEW_APPLICATION")]
    NewApplication {
        vacancy: Vacancy,
        teacher: Teacher,
        status: ApplicationStatus,
        applied_at: DateTime<Utc>,
    },
    #[serde(rename = "STATUS_UPDATE")]
    StatusUpdate {
        teacher_id: Uuid,
        vacancy_id: Option<Uuid>,
        status: String,
    },
}

/// Session manager for the dashboard's live channel. Owns the set of open
/// observer connections; entries are added on connect and removed on
/// disconnect or on the first failed send. Delivery is fire-and-forget: no
/// acknowledgement, no retry, no replay for late joiners.
#[derive(Clone, Default)]
pub struct NotificationService {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    observers: Mutex<HashMap<ObserverId, UnboundedSender<String>>>,
    next_id: AtomicU64,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new observer session and hands back its message stream.
    pub fn subscribe(&self) -> (ObserverId, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .observers
            .lock()
            .expect("observer registry mutex poisoned")
            .insert(id, tx);
        tracing::debug!(observer = id, "dashboard observer connected");
        (id, rx)
    }

    pub fn unsubscribe(&self, id: ObserverId) {
        let removed = self
            .inner
            .observers
            .lock()
            .expect("observer registry mutex poisoned")
            .remove(&id)
            .is_some();
        if removed {
            tracing::debug!(observer = id, "dashboard observer disconnected");
        }
    }

    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .lock()
            .expect("observer registry mutex poisoned")
            .len()
    }

    /// Serializes the event once and attempts delivery to every registered
    /// observer. Observers whose channel is gone are dropped from the
    /// registry; nothing is ever reported back to the caller.
    pub fn broadcast(&self, event: &DashboardEvent) {
        let message = match serde_json::to_string(event) {
            Ok(message) => message,
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize dashboard event");
                return;
            }
        };

        let mut registry = self
            .inner
            .observers
            .lock()
            .expect("observer registry mutex poisoned");
        let mut dead = Vec::new();
        for (id, tx) in registry.iter() {
            if tx.send(message.clone()).is_err() {
                dead.push(*id);
            }
        }
        for id in dead {
            registry.remove(&id);
            tracing::debug!(observer = id, "dropped unreachable dashboard observer");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_update(status: &str) -> DashboardEvent {
        DashboardEvent::StatusUpdate {
            teacher_id: Uuid::new_v4(),
            vacancy_id: Some(Uuid::new_v4()),
            status: status.to_string(),
        }
    }

    #[tokio::test]
    async fn broadcast_reaches_every_observer() {
        let hub = NotificationService::new();
        let (_a, mut rx_a) = hub.subscribe();
        let (_b, mut rx_b) = hub.subscribe();

        hub.broadcast(&status_update("approved"));

        let got_a = rx_a.recv().await.unwrap();
        let got_b = rx_b.recv().await.unwrap();
        assert_eq!(got_a, got_b);

        let parsed: serde_json::Value = serde_json::from_str(&got_a).unwrap();
        assert_eq!(parsed["type"], "STATUS_UPDATE");
        assert_eq!(parsed["data"]["status"], "approved");
    }

    #[tokio::test]
    async fn broadcast_with_no_observers_is_a_noop() {
        let hub = NotificationService::new();
        hub.broadcast(&status_update("rejected"));
        assert_eq!(hub.observer_count(), 0);
    }

    #[tokio::test]
    async fn dead_observers_are_dropped_on_send_failure() {
        let hub = NotificationService::new();
        let (_kept, mut rx) = hub.subscribe();
        let (_gone, rx_gone) = hub.subscribe();
        drop(rx_gone);
        assert_eq!(hub.observer_count(), 2);

        hub.broadcast(&status_update("approved"));

        assert_eq!(hub.observer_count(), 1);
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn unsubscribe_removes_the_session() {
        let hub = NotificationService::new();
        let (id, mut rx) = hub.subscribe();
        hub.unsubscribe(id);
        assert_eq!(hub.observer_count(), 0);

        hub.broadcast(&status_update("approved"));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn late_joiners_never_see_old_events() {
        let hub = NotificationService::new();
        hub.broadcast(&status_update("approved"));

        let (_id, mut rx) = hub.subscribe();
        hub.broadcast(&status_update("rejected"));

        let only: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(only["data"]["status"], "rejected");
        assert!(rx.try_recv().is_err());
    }
}
