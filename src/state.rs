use crate::models::Tracker;
use crate::storage::ExportConfig;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

pub type SharedTracker = Arc<Mutex<Tracker>>;

#[derive(Clone)]
pub struct AppState {
    pub exports: ExportConfig,
    sessions: Arc<Mutex<HashMap<Uuid, SharedTracker>>>,
}

impl AppState {
    pub fn new(exports: ExportConfig) -> Self {
        Self {
            exports,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Existing session only; reads never create one.
    pub async fn find(&self, id: Option<Uuid>) -> Option<SharedTracker> {
        let id = id?;
        self.sessions.lock().await.get(&id).cloned()
    }

    /// Session for a state-changing request, minting an id when needed.
    /// The map lock is released before the caller locks the tracker.
    pub async fn find_or_create(&self, id: Option<Uuid>) -> (Uuid, SharedTracker) {
        let id = id.unwrap_or_else(Uuid::new_v4);
        let tracker = Arc::clone(self.sessions.lock().await.entry(id).or_default());
        (id, tracker)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
