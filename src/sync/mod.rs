//! Session-facing synchronization strategy.
//!
//! A [`ColaSynchronizer`] sits between one site's editor and the channel to
//! the other site. Local edits go through
//! [`register_outgoing_message`](SynchronizationStrategy::register_outgoing_message)
//! before they are sent; remote edits go through
//! [`transform_incoming_message`](SynchronizationStrategy::transform_incoming_message)
//! before they are applied.
//!
//! Local operations stay queued until the other site acknowledges them via
//! the `remote` counter of one of its own messages. An incoming operation is
//! transformed against every queued operation it had not seen, and each
//! queued operation is transformed against the incoming one in turn.

use crate::core::{CausalCounters, Operation, SiteRole, UpdateMessage};
use crate::transform::{self, Direction, TransformError};
use std::collections::VecDeque;
use tracing::{debug, warn};

pub mod registry;

pub use registry::{SessionId, SessionRegistry};

pub trait SynchronizationStrategy {
    /// Register a locally authored and already applied edit before it is sent.
    fn register_outgoing_message(&mut self, local: Operation) -> Result<UpdateMessage, SyncError>;

    /// Transform an edit received from the other site for local application.
    fn transform_incoming_message(
        &mut self,
        remote: UpdateMessage,
    ) -> Result<UpdateMessage, SyncError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    RangeViolation(#[from] TransformError),
    /// The incoming message cannot be reconciled in one step; the session
    /// layer must install a fresh snapshot and call [`ColaSynchronizer::resync`].
    #[error(
        "resync required: received {received}, expected local={expected_local}, acknowledged={acknowledged}, sent={sent}"
    )]
    ResyncRequired {
        received: CausalCounters,
        expected_local: u64,
        acknowledged: u64,
        sent: u64,
    },
    #[error("unacknowledged operation backlog is full (capacity {capacity})")]
    BacklogFull { capacity: usize },
}

/// Configuration for a synchronizer
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Local operations that may await acknowledgement before registration fails.
    pub max_unacknowledged: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_unacknowledged: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColaSynchronizer {
    role: SiteRole,
    config: SyncConfig,
    document_len: usize,
    /// Operations sent so far
    local_count: u64,
    /// Operations received so far
    remote_count: u64,
    /// Highest acknowledgement seen from the other site
    acknowledged: u64,
    unacknowledged: VecDeque<UpdateMessage>,
}

impl ColaSynchronizer {
    pub fn new(role: SiteRole, document_len: usize) -> Self {
        Self::with_config(role, document_len, SyncConfig::default())
    }

    pub fn with_config(role: SiteRole, document_len: usize, config: SyncConfig) -> Self {
        Self {
            role,
            config,
            document_len,
            local_count: 0,
            remote_count: 0,
            acknowledged: 0,
            unacknowledged: VecDeque::new(),
        }
    }

    pub fn role(&self) -> SiteRole {
        self.role
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Length of the local document as tracked through registered and
    /// transformed operations.
    pub fn document_len(&self) -> usize {
        self.document_len
    }

    pub fn local_count(&self) -> u64 {
        self.local_count
    }

    pub fn remote_count(&self) -> u64 {
        self.remote_count
    }

    /// Local operations the other site has not acknowledged yet, oldest first.
    pub fn unacknowledged(&self) -> impl Iterator<Item = &UpdateMessage> {
        self.unacknowledged.iter()
    }

    /// Forget all history after the session layer installed a fresh
    /// snapshot of `document_len` chars on both sites.
    pub fn resync(&mut self, document_len: usize) {
        debug!(
            role = %self.role,
            document_len,
            dropped = self.unacknowledged.len(),
            "resync"
        );
        self.document_len = document_len;
        self.local_count = 0;
        self.remote_count = 0;
        self.acknowledged = 0;
        self.unacknowledged.clear();
    }

    /// Direction used for operations arriving from the other site.
    fn incoming_direction(&self) -> Direction {
        match self.role {
            SiteRole::Owner => Direction::ForOwner,
            SiteRole::Participant => Direction::ForParticipant,
        }
    }

    fn check_causality(&self, received: CausalCounters) -> Result<(), SyncError> {
        if received.local != self.remote_count
            || received.remote > self.local_count
            || received.remote < self.acknowledged
        {
            warn!(
                role = %self.role,
                %received,
                remote_count = self.remote_count,
                local_count = self.local_count,
                acknowledged = self.acknowledged,
                "stale or out-of-order operation"
            );
            return Err(SyncError::ResyncRequired {
                received,
                expected_local: self.remote_count,
                acknowledged: self.acknowledged,
                sent: self.local_count,
            });
        }
        Ok(())
    }
}

impl SynchronizationStrategy for ColaSynchronizer {
    fn register_outgoing_message(&mut self, local: Operation) -> Result<UpdateMessage, SyncError> {
        if self.unacknowledged.len() >= self.config.max_unacknowledged {
            warn!(
                role = %self.role,
                capacity = self.config.max_unacknowledged,
                "unacknowledged backlog full"
            );
            return Err(SyncError::BacklogFull {
                capacity: self.config.max_unacknowledged,
            });
        }

        // The edit is already applied locally, so it was authored against
        // the document before it.
        if let Err(err) = transform::check_bounds(&local, self.document_len) {
            warn!(role = %self.role, %local, document_len = self.document_len, "local edit out of range");
            return Err(err.into());
        }

        let counters = CausalCounters::new(self.local_count, self.remote_count);
        let msg = UpdateMessage::new(local, counters);
        debug!(role = %self.role, %msg, "register outgoing");

        self.document_len = msg.operation().resulting_len(self.document_len);
        self.local_count += 1;
        self.unacknowledged.push_back(msg.clone());
        Ok(msg)
    }

    fn transform_incoming_message(
        &mut self,
        remote: UpdateMessage,
    ) -> Result<UpdateMessage, SyncError> {
        let received = remote.counters();
        self.check_causality(received)?;

        let incoming = self.incoming_direction();
        let outgoing = incoming.opposite();

        // Operations the other site had already applied when it authored
        // `remote` are acknowledged and leave the queue.
        let pending = self
            .unacknowledged
            .iter()
            .skip_while(|local| local.local_operations_count() < received.remote);

        let mut transformed = remote;
        let mut rebased = VecDeque::with_capacity(self.unacknowledged.len());
        for local in pending {
            let next = transformed.transform_against(local, incoming);
            rebased.push_back(local.transform_against(&transformed, outgoing));
            transformed = next;
        }

        if let Err(err) = transform::check_bounds(transformed.operation(), self.document_len) {
            warn!(
                role = %self.role,
                %transformed,
                document_len = self.document_len,
                "transformed operation out of range"
            );
            return Err(err.into());
        }

        debug!(
            role = %self.role,
            %transformed,
            acknowledged = received.remote,
            pending = rebased.len(),
            "transform incoming"
        );

        self.document_len = transformed.operation().resulting_len(self.document_len);
        self.remote_count += 1;
        self.acknowledged = received.remote;
        self.unacknowledged = rebased;
        Ok(transformed)
    }
}
