//! docshare-ot: Operational transformation for two-site shared text documents.
//!
//! One site owns the document, the other participates. Each site applies its
//! own edits immediately and sends them to the other site; incoming edits are
//! transformed against whatever the receiving site applied concurrently, so
//! both end up with the same text without locking. It includes:
//!
//! - **Core types** - Operations, their kinds, causal counters and site roles
//! - **Transform rules** - Pure functions per operation-kind pair and direction
//! - **Sync strategy** - Per-site synchronizer and an explicit session registry
//!
//! # Quick Start
//!
//! ```rust
//! use docshare_ot::{ColaSynchronizer, Operation, SiteRole, SynchronizationStrategy};
//!
//! let mut owner = ColaSynchronizer::new(SiteRole::Owner, 11);
//! let mut participant = ColaSynchronizer::new(SiteRole::Participant, 11);
//!
//! // Both sites insert at offset 5 of "hello world" at the same time
//! let from_owner = owner.register_outgoing_message(Operation::insert(5, "A")).unwrap();
//! let from_participant = participant
//!     .register_outgoing_message(Operation::insert(5, "B"))
//!     .unwrap();
//!
//! let at_owner = owner.transform_incoming_message(from_participant).unwrap();
//! let at_participant = participant.transform_incoming_message(from_owner).unwrap();
//!
//! let owner_doc = at_owner.operation().apply_to("helloA world").unwrap();
//! let participant_doc = at_participant.operation().apply_to("helloB world").unwrap();
//! assert_eq!(owner_doc, "helloAB world");
//! assert_eq!(participant_doc, "helloAB world");
//! ```

// Operations, kinds and counters
pub mod core;

// Transform rule set
pub mod transform;

// Synchronization strategy and session registry
pub mod sync;

pub use crate::core::{
    CausalCounters, Operation, OperationError, OperationKind, SiteRole, UpdateMessage,
};

pub use transform::{Direction, TransformError, TransformFn, transform, transform_within};

pub use sync::{
    ColaSynchronizer, SessionId, SessionRegistry, SyncConfig, SyncError,
    SynchronizationStrategy,
};
