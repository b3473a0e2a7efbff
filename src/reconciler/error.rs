// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::kubernetes_api_objects::APIError;
use crate::reconciler::artifact::ArtifactKind;
use crate::reconciler::step::ActionKind;
use crate::type_registry::RegistryError;
use std::time::Duration;
use thiserror::Error;

/// Failures before the upsert phase are retried after this fixed delay.
pub const FIXED_RETRY_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("descriptor misses {0}")]
    MissingObjectKey(&'static str),
    #[error("failed to get descriptor {key}: {source}")]
    FetchFailed {
        key: String,
        #[source]
        source: APIError,
    },
    #[error("artifact name {0} is required both as a ConfigMap and as a Secret")]
    ConflictingArtifactName(String),
    #[error("required {kind} {name} is not found")]
    MissingInput { kind: ArtifactKind, name: String },
    #[error("failed to get {kind} {name}: {source}")]
    GetInputFailed {
        kind: ArtifactKind,
        name: String,
        #[source]
        source: APIError,
    },
    #[error("failed to persist status hashes: {0}")]
    PersistStatusFailed(#[source] APIError),
    #[error("failed to {action} StatefulSet {name}: {source}")]
    UpsertFailed {
        action: ActionKind,
        name: String,
        #[source]
        source: APIError,
    },
    #[error("failed to set owner reference: {0}")]
    OwnerReference(#[source] RegistryError),
    #[error("unexpected response at step {0}")]
    UnexpectedResponse(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    FixedDelay(Duration),
    /// Let the scheduling layer apply its per-key exponential backoff.
    Backoff,
}

impl ReconcileError {
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            ReconcileError::UpsertFailed { .. } | ReconcileError::OwnerReference(_) => {
                RetryPolicy::Backoff
            }
            _ => RetryPolicy::FixedDelay(FIXED_RETRY_DELAY),
        }
    }

    pub fn is_missing_input(&self) -> bool {
        matches!(self, ReconcileError::MissingInput { .. })
    }
}
