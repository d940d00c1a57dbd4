//! Debounced draft auto-save.
//!
//! Every edit reschedules a single pending save; only the last draft
//! within the debounce window reaches the slot. The pending task is
//! aborted on drop, so no write can land after the owning form
//! controller is gone.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::db::DraftStore;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1500);

pub struct Autosave {
    store: Arc<DraftStore>,
    slot_key: String,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Autosave {
    pub fn new(store: Arc<DraftStore>, slot_key: String) -> Self {
        Self::with_delay(store, slot_key, DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(store: Arc<DraftStore>, slot_key: String, delay: Duration) -> Self {
        Self { store, slot_key, delay, pending: None }
    }

    /// Reset the debounce timer with the current draft. The previous
    /// pending save, if any, never fires.
    pub fn schedule(&mut self, draft: &Value) {
        self.cancel();

        let payload = draft.to_string();
        let store = Arc::clone(&self.store);
        let slot_key = self.slot_key.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match store.save(&slot_key, &payload) {
                Ok(()) => tracing::debug!(slot = %slot_key, "draft auto-saved"),
                Err(e) => tracing::warn!(slot = %slot_key, error = %e, "draft auto-save failed"),
            }
        }));
    }

    /// Abort the pending save, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> Arc<DraftStore> {
        Arc::new(DraftStore::in_memory().unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_writes_final_draft_once() {
        let store = store();
        let mut autosave = Autosave::new(Arc::clone(&store), "patient:new".into());

        for i in 0..5 {
            autosave.schedule(&json!({ "firstName": format!("draft-{i}") }));
            tokio::time::advance(Duration::from_millis(200)).await;
        }
        // Let the last (and only surviving) timer fire.
        tokio::time::sleep(DEFAULT_DEBOUNCE * 2).await;
        tokio::task::yield_now().await;

        let slots = store.list().unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].payload, json!({ "firstName": "draft-4" }).to_string());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_written_before_the_debounce_elapses() {
        let store = store();
        let mut autosave = Autosave::new(Arc::clone(&store), "patient:new".into());

        autosave.schedule(&json!({ "firstName": "Maria" }));
        tokio::time::advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;

        assert!(store.load("patient:new").unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_the_pending_save() {
        let store = store();
        {
            let mut autosave = Autosave::new(Arc::clone(&store), "initial_visit:p1".into());
            autosave.schedule(&json!({ "chiefComplaint": "Neck pain" }));
        }
        tokio::time::sleep(DEFAULT_DEBOUNCE * 2).await;
        tokio::task::yield_now().await;

        assert!(store.load("initial_visit:p1").unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_cancel_discards_pending_save() {
        let store = store();
        let mut autosave = Autosave::new(Arc::clone(&store), "patient:p2".into());

        autosave.schedule(&json!({ "firstName": "Maria" }));
        autosave.cancel();
        tokio::time::sleep(DEFAULT_DEBOUNCE * 2).await;

        assert!(store.load("patient:p2").unwrap().is_none());
    }
}
