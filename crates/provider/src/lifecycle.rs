//! Remote resource lifecycle
//!
//! Tracks one resource through an apply. The in-flight states (`Creating`,
//! `Updating`, `Deleting`) exist only while a call is running and are never
//! written to state.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tccloud_common::{Error, Result};

use crate::state::DynamicValue;

/// Resource lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Absent,
    Creating,
    Present,
    Updating,
    Deleting,
    CreateFailed,
    UpdateFailed,
    DeleteFailed,
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::Absent
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Absent => write!(f, "absent"),
            LifecycleState::Creating => write!(f, "creating"),
            LifecycleState::Present => write!(f, "present"),
            LifecycleState::Updating => write!(f, "updating"),
            LifecycleState::Deleting => write!(f, "deleting"),
            LifecycleState::CreateFailed => write!(f, "create_failed"),
            LifecycleState::UpdateFailed => write!(f, "update_failed"),
            LifecycleState::DeleteFailed => write!(f, "delete_failed"),
        }
    }
}

impl LifecycleState {
    /// Whether a call is in flight.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LifecycleState::Creating | LifecycleState::Updating | LifecycleState::Deleting
        )
    }

    pub fn can_transition_to(&self, to: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, to),
            (Absent, Creating)
                | (Creating, Present)
                | (Creating, CreateFailed)
                | (Present, Updating)
                | (Present, Deleting)
                // a read found the object gone
                | (Present, Absent)
                | (Updating, Present)
                | (Updating, UpdateFailed)
                | (Deleting, Absent)
                | (Deleting, DeleteFailed)
                | (CreateFailed, Creating)
                | (CreateFailed, Deleting)
                | (UpdateFailed, Updating)
                | (UpdateFailed, Deleting)
                | (DeleteFailed, Deleting)
        )
    }
}

/// What an apply has to do, derived from prior and planned state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    Create,
    Update,
    Delete,
    NoOp,
}

impl Change {
    pub fn between(prior: Option<&DynamicValue>, planned: Option<&DynamicValue>) -> Self {
        let prior = prior.filter(|v| !v.is_null());
        let planned = planned.filter(|v| !v.is_null());
        match (prior, planned) {
            (None, Some(_)) => Change::Create,
            (Some(_), Some(_)) => Change::Update,
            (Some(_), None) => Change::Delete,
            (None, None) => Change::NoOp,
        }
    }

    /// State the resource starts from for this change.
    pub fn initial_state(&self) -> LifecycleState {
        match self {
            Change::Create | Change::NoOp => LifecycleState::Absent,
            Change::Update | Change::Delete => LifecycleState::Present,
        }
    }
}

/// Lifecycle of one resource during one operation.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    resource: String,
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new(resource: impl Into<String>, state: LifecycleState) -> Self {
        Self {
            resource: resource.into(),
            state,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn advance(&mut self, to: LifecycleState) -> Result<()> {
        if !self.state.can_transition_to(to) {
            return Err(Error::InvalidStateTransition {
                from: self.state.to_string(),
                to: to.to_string(),
            });
        }
        debug!("{}: {} -> {}", self.resource, self.state, to);
        self.state = to;
        Ok(())
    }

    /// Enter the in-flight state for `change`.
    pub fn begin(&mut self, change: Change) -> Result<()> {
        match change {
            Change::Create => self.advance(LifecycleState::Creating),
            Change::Update => self.advance(LifecycleState::Updating),
            Change::Delete => self.advance(LifecycleState::Deleting),
            Change::NoOp => Ok(()),
        }
    }

    /// Leave the in-flight state, recording whether the call succeeded.
    pub fn finish(&mut self, succeeded: bool) -> Result<()> {
        let to = match (self.state, succeeded) {
            (LifecycleState::Creating, true) | (LifecycleState::Updating, true) => LifecycleState::Present,
            (LifecycleState::Deleting, true) => LifecycleState::Absent,
            (LifecycleState::Creating, false) => LifecycleState::CreateFailed,
            (LifecycleState::Updating, false) => LifecycleState::UpdateFailed,
            (LifecycleState::Deleting, false) => LifecycleState::DeleteFailed,
            (state, _) => {
                debug!("{}: nothing in flight ({})", self.resource, state);
                return Ok(());
            }
        };
        self.advance(to)
    }
}
