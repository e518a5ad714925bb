//! Explicitly owned set of active sharing sessions.

use super::{ColaSynchronizer, SyncConfig};
use crate::core::SiteRole;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

pub type SessionId = Uuid;

/// Synchronizers keyed by session. Each entry is independent; callers hold
/// the registry and pass it wherever sessions are looked up.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, ColaSynchronizer>,
    config: SyncConfig,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose sessions are all created with `config`.
    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
        }
    }

    /// Start a session under a fresh id.
    pub fn create(&mut self, role: SiteRole, document_len: usize) -> SessionId {
        let id = Uuid::new_v4();
        self.open(id, role, document_len);
        id
    }

    /// Start (or restart) the session `id`, e.g. with the id agreed on by the
    /// channel layer. Returns the synchronizer it replaced, if any.
    pub fn open(
        &mut self,
        id: SessionId,
        role: SiteRole,
        document_len: usize,
    ) -> Option<ColaSynchronizer> {
        debug!(session = %id, %role, document_len, "open session");
        let sync = ColaSynchronizer::with_config(role, document_len, self.config.clone());
        self.sessions.insert(id, sync)
    }

    pub fn get(&self, id: &SessionId) -> Option<&ColaSynchronizer> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut ColaSynchronizer> {
        self.sessions.get_mut(id)
    }

    pub fn close(&mut self, id: &SessionId) -> Option<ColaSynchronizer> {
        let removed = self.sessions.remove(id);
        if removed.is_some() {
            debug!(session = %id, "close session");
        }
        removed
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SessionId> {
        self.sessions.keys()
    }
}
