//! Scenario files and their replay through two in-process sites.

use docshare_ot::{
    ColaSynchronizer, Operation, OperationError, SiteRole, SyncError, SynchronizationStrategy,
    UpdateMessage,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Text both sites start from
    pub document: String,
    /// Owner edits, each against the owner's document at the time it is made
    #[serde(default)]
    pub owner: Vec<Operation>,
    #[serde(default)]
    pub participant: Vec<Operation>,
    /// Order of events. Empty means every owner edit, then every
    /// participant edit. In-flight messages are delivered afterwards.
    #[serde(default)]
    pub schedule: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    OwnerEdit,
    ParticipantEdit,
    DeliverToOwner,
    DeliverToParticipant,
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid scenario: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{site} edit #{index} does not fit its document: {source}")]
    Edit {
        site: SiteRole,
        index: usize,
        source: OperationError,
    },
    #[error("{site} could not apply a transformed remote edit: {source}")]
    Apply {
        site: SiteRole,
        source: OperationError,
    },
    #[error("{site} synchronization fault: {source}")]
    Sync { site: SiteRole, source: SyncError },
    #[error("schedule asks for {site} edit #{index} but only {available} are listed")]
    NoEditLeft {
        site: SiteRole,
        index: usize,
        available: usize,
    },
    #[error("schedule delivers to {site} but nothing is in flight")]
    NothingInFlight { site: SiteRole },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub owner: String,
    pub participant: String,
    pub converged: bool,
}

struct Site<'a> {
    text: String,
    sync: ColaSynchronizer,
    edits: &'a [Operation],
    next_edit: usize,
    outbox: VecDeque<UpdateMessage>,
}

impl<'a> Site<'a> {
    fn new(role: SiteRole, document: &str, edits: &'a [Operation]) -> Self {
        Self {
            text: document.to_string(),
            sync: ColaSynchronizer::new(role, document.chars().count()),
            edits,
            next_edit: 0,
            outbox: VecDeque::new(),
        }
    }

    fn role(&self) -> SiteRole {
        self.sync.role()
    }

    fn edit(&mut self) -> Result<(), ReplayError> {
        let site = self.role();
        let index = self.next_edit;
        let edits = self.edits;
        let op = edits.get(index).ok_or(ReplayError::NoEditLeft {
            site,
            index,
            available: self.edits.len(),
        })?;

        let text = op
            .apply_to(&self.text)
            .map_err(|source| ReplayError::Edit {
                site,
                index,
                source,
            })?;
        let msg = self
            .sync
            .register_outgoing_message(op.clone())
            .map_err(|source| ReplayError::Sync { site, source })?;

        debug!(%site, %msg, "local edit");
        self.text = text;
        self.next_edit += 1;
        self.outbox.push_back(msg);
        Ok(())
    }

    fn receive(&mut self, msg: UpdateMessage) -> Result<(), ReplayError> {
        let site = self.role();
        let transformed = self
            .sync
            .transform_incoming_message(msg)
            .map_err(|source| ReplayError::Sync { site, source })?;
        self.text = transformed
            .operation()
            .apply_to(&self.text)
            .map_err(|source| ReplayError::Apply { site, source })?;
        debug!(%site, %transformed, "remote edit");
        Ok(())
    }
}

pub fn load(path: &Path) -> Result<Scenario, ReplayError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn replay(scenario: &Scenario) -> Result<Outcome, ReplayError> {
    let mut owner = Site::new(SiteRole::Owner, &scenario.document, &scenario.owner);
    let mut participant = Site::new(
        SiteRole::Participant,
        &scenario.document,
        &scenario.participant,
    );

    let default_schedule;
    let schedule = if scenario.schedule.is_empty() {
        default_schedule = std::iter::repeat_n(Step::OwnerEdit, scenario.owner.len())
            .chain(std::iter::repeat_n(
                Step::ParticipantEdit,
                scenario.participant.len(),
            ))
            .collect::<Vec<_>>();
        &default_schedule
    } else {
        &scenario.schedule
    };

    for step in schedule {
        match step {
            Step::OwnerEdit => owner.edit()?,
            Step::ParticipantEdit => participant.edit()?,
            Step::DeliverToOwner => deliver(&mut participant, &mut owner)?,
            Step::DeliverToParticipant => deliver(&mut owner, &mut participant)?,
        }
    }

    while !owner.outbox.is_empty() || !participant.outbox.is_empty() {
        if !owner.outbox.is_empty() {
            deliver(&mut owner, &mut participant)?;
        }
        if !participant.outbox.is_empty() {
            deliver(&mut participant, &mut owner)?;
        }
    }

    let converged = owner.text == participant.text;
    info!(converged, "replay finished");
    Ok(Outcome {
        owner: owner.text,
        participant: participant.text,
        converged,
    })
}

fn deliver(from: &mut Site<'_>, to: &mut Site<'_>) -> Result<(), ReplayError> {
    let msg = from
        .outbox
        .pop_front()
        .ok_or(ReplayError::NothingInFlight { site: to.role() })?;
    to.receive(msg)
}
