// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::reconciler::artifact::{ArtifactRef, ResolvedArtifact};
use crate::reconciler::error::ReconcileError;
use crate::reconciler::hash_tracker::Hash;
use crate::resources::upsert::UpsertOutcome;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Get,
    Create,
    Update,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Get => write!(f, "get"),
            ActionKind::Create => write!(f, "create"),
            ActionKind::Update => write!(f, "update"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileStep {
    Init,
    /// Waiting for the artifact at this index of ReconcileState::artifacts.
    AfterGetArtifact(usize),
    AfterPersistStatus,
    AfterWorkloadRequest(ActionKind),
    Done(UpsertOutcome),
    Error(ReconcileError),
}

/// ReconcileState is everything a reconcile pass carries between two steps.
/// It starts from scratch in every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileState {
    pub reconcile_step: ReconcileStep,
    pub artifacts: Vec<ArtifactRef>,
    pub resolved: Vec<ResolvedArtifact>,
    pub hashes: Vec<Hash>,
}

impl ReconcileState {
    pub fn init() -> ReconcileState {
        ReconcileState {
            reconcile_step: ReconcileStep::Init,
            artifacts: Vec::new(),
            resolved: Vec::new(),
            hashes: Vec::new(),
        }
    }

    pub fn with_step(self, reconcile_step: ReconcileStep) -> ReconcileState {
        ReconcileState {
            reconcile_step,
            ..self
        }
    }
}
