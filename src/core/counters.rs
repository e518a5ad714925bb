//! Causal counters and the message wrapper exchanged between sites.

use super::{Operation, OperationKind};
use crate::transform::{self, Direction};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Send-time sequence numbers attached to every outgoing operation.
///
/// `local` is how many operations the author had sent before this one,
/// `remote` how many it had received from the other site.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CausalCounters {
    pub local: u64,
    pub remote: u64,
}

impl CausalCounters {
    pub fn new(local: u64, remote: u64) -> Self {
        Self { local, remote }
    }
}

impl fmt::Display for CausalCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "local={};remote={}", self.local, self.remote)
    }
}

/// An operation bound to its kind and causal counters.
///
/// The kind is derived once in [`UpdateMessage::new`] and is never
/// transmitted; deserialization derives it again from the operation shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireMessage", into = "WireMessage")]
pub struct UpdateMessage {
    op: Operation,
    kind: OperationKind,
    counters: CausalCounters,
}

impl UpdateMessage {
    pub fn new(op: Operation, counters: CausalCounters) -> Self {
        let kind = OperationKind::classify(&op);
        Self { op, kind, counters }
    }

    pub fn operation(&self) -> &Operation {
        &self.op
    }

    pub fn into_operation(self) -> Operation {
        self.op
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn counters(&self) -> CausalCounters {
        self.counters
    }

    pub fn local_operations_count(&self) -> u64 {
        self.counters.local
    }

    pub fn remote_operations_count(&self) -> u64 {
        self.counters.remote
    }

    /// Transform this message for application at the owner site.
    ///
    /// This message has the lower priority: on a position tie with
    /// `already_applied` it is placed after it.
    pub fn transform_for_application_at_owner_against(
        &self,
        already_applied: &UpdateMessage,
    ) -> UpdateMessage {
        self.transform_against(already_applied, Direction::ForOwner)
    }

    /// Transform this message for application at the participant site.
    ///
    /// This message keeps priority: on a position tie it is placed first.
    pub fn transform_for_application_at_participant_against(
        &self,
        already_applied: &UpdateMessage,
    ) -> UpdateMessage {
        self.transform_against(already_applied, Direction::ForParticipant)
    }

    pub fn transform_against(
        &self,
        already_applied: &UpdateMessage,
        direction: Direction,
    ) -> UpdateMessage {
        let rule = transform::rule(self.kind, already_applied.kind, direction);
        UpdateMessage::new(rule(&self.op, &already_applied.op), self.counters)
    }
}

impl fmt::Display for UpdateMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{:?};{}", self.op, self.kind, self.counters)
    }
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    offset: usize,
    length: usize,
    text: String,
    local_operations_count: u64,
    remote_operations_count: u64,
}

impl From<WireMessage> for UpdateMessage {
    fn from(wire: WireMessage) -> Self {
        UpdateMessage::new(
            Operation::new(wire.offset, wire.length, wire.text),
            CausalCounters::new(wire.local_operations_count, wire.remote_operations_count),
        )
    }
}

impl From<UpdateMessage> for WireMessage {
    fn from(msg: UpdateMessage) -> Self {
        let CausalCounters { local, remote } = msg.counters;
        WireMessage {
            offset: msg.op.offset,
            length: msg.op.length,
            text: msg.op.text,
            local_operations_count: local,
            remote_operations_count: remote,
        }
    }
}
