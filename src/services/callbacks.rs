use crate::models::PluginResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallbackId(String);

impl CallbackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("ApplePay{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait ResultSink: Send + Sync {
    fn send(&self, callback_id: &CallbackId, result: PluginResult);
}

#[derive(Default)]
pub struct CallbackRegistry {
    pending: Mutex<HashMap<CallbackId, oneshot::Sender<PluginResult>>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> (CallbackId, oneshot::Receiver<PluginResult>) {
        let (tx, rx) = oneshot::channel();
        let id = CallbackId::generate();
        self.lock().insert(id.clone(), tx);
        (id, rx)
    }

    pub fn forget(&self, callback_id: &CallbackId) {
        self.lock().remove(callback_id);
    }

    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CallbackId, oneshot::Sender<PluginResult>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultSink for CallbackRegistry {
    fn send(&self, callback_id: &CallbackId, result: PluginResult) {
        let Some(tx) = self.lock().remove(callback_id) else {
            tracing::warn!("No pending callback {}, dropping result", callback_id);
            return;
        };

        if tx.send(result).is_err() {
            tracing::debug!("Caller for {} went away before the result arrived", callback_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_ok, assert_pending, assert_ready};

    #[tokio::test]
    async fn delivers_to_registered_caller() {
        let registry = CallbackRegistry::new();
        let (id, rx) = registry.register();
        assert_eq!(registry.pending(), 1);

        registry.send(&id, PluginResult::ok("done"));

        let result = assert_ok!(rx.await);
        assert_eq!(result, PluginResult::ok("done"));
        assert_eq!(registry.pending(), 0);
    }

    #[test]
    fn second_delivery_is_dropped() {
        let registry = CallbackRegistry::new();
        let (id, rx) = registry.register();
        let mut rx = tokio_test::task::spawn(rx);
        assert_pending!(rx.poll());

        registry.send(&id, PluginResult::error("Payment cancelled"));
        registry.send(&id, PluginResult::ok("late"));

        let result = assert_ready!(rx.poll());
        assert_eq!(assert_ok!(result), PluginResult::error("Payment cancelled"));
    }

    #[tokio::test]
    async fn forgotten_callback_closes_receiver() {
        let registry = CallbackRegistry::new();
        let (id, rx) = registry.register();

        registry.forget(&id);

        assert!(rx.await.is_err());
        assert_eq!(registry.pending(), 0);
    }

    #[test]
    fn unknown_callback_is_ignored() {
        let registry = CallbackRegistry::new();
        registry.send(&CallbackId::new("missing"), PluginResult::ok("x"));
        assert_eq!(registry.pending(), 0);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(CallbackId::generate(), CallbackId::generate());
    }
}
