// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::kubernetes_api_objects::ObjectKey;
use crate::reconciler::artifact::{ArtifactKind, ArtifactRef, ResolvedArtifact};
use crate::reconciler::error::ReconcileError;
use crate::reconciler::hash_tracker::compute_hashes;
use crate::reconciler::io::{StoreRequest, StoreResponse};
use crate::reconciler::reconciler::Reconciler;
use crate::reconciler::step::{ActionKind, ReconcileState, ReconcileStep};
use crate::reconciler::strategy::{Descriptor, WorkloadStrategy};
use crate::resources::stateful_set::{make_stateful_set, update_stateful_set};
use crate::resources::upsert::{plan_upsert, set_owner_reference, UpsertOutcome, UpsertPlan};
use crate::type_registry::TypeRegistry;
use k8s_openapi::api::apps::v1::StatefulSet;

/// WorkloadReconciler is the one control loop shared by every descriptor kind
/// that is reconciled into a StatefulSet. The kind specifics come from `S`.
///
/// A pass reads the required artifacts one by one, persists their hashes into
/// the descriptor's status, and then creates or updates the StatefulSet.
pub struct WorkloadReconciler<S> {
    strategy: S,
}

impl<S: WorkloadStrategy> WorkloadReconciler<S> {
    pub fn new(strategy: S) -> WorkloadReconciler<S> {
        WorkloadReconciler { strategy }
    }
}

impl<S: WorkloadStrategy> Reconciler for WorkloadReconciler<S> {
    type K = S::K;

    fn reconcile_init_state(&self) -> ReconcileState {
        ReconcileState::init()
    }

    fn reconcile_core(
        &self,
        cr: &S::K,
        registry: &TypeRegistry,
        resp_o: Option<StoreResponse<S::K>>,
        state: ReconcileState,
    ) -> (ReconcileState, Option<StoreRequest<S::K>>) {
        let key = match ObjectKey::from_meta(cr) {
            Some(key) => key,
            None => {
                return error_state(
                    state,
                    ReconcileError::MissingObjectKey(".metadata.name or .metadata.namespace"),
                )
            }
        };
        let step = state.reconcile_step.clone();
        match step {
            ReconcileStep::Init => {
                let artifacts = dedup_artifacts(self.strategy.required_artifacts(cr));
                if let Some(name) = conflicting_name(&artifacts) {
                    return error_state(state, ReconcileError::ConflictingArtifactName(name));
                }
                let state = ReconcileState { artifacts, ..state };
                get_artifact_or_persist_status(cr, &key, state, 0)
            }
            ReconcileStep::AfterGetArtifact(index) => {
                let artifact = match state.artifacts.get(index) {
                    Some(artifact) => artifact.clone(),
                    None => {
                        return error_state(state, ReconcileError::UnexpectedResponse("AfterGetArtifact"))
                    }
                };
                let resolved = match (artifact.kind, resp_o) {
                    (ArtifactKind::ConfigMap, Some(StoreResponse::GetConfigMap(res))) => {
                        res.map(|config_map| ResolvedArtifact::from_config_map(&artifact.name, &config_map))
                    }
                    (ArtifactKind::Secret, Some(StoreResponse::GetSecret(res))) => {
                        res.map(|secret| ResolvedArtifact::from_secret(&artifact.name, &secret))
                    }
                    _ => {
                        return error_state(state, ReconcileError::UnexpectedResponse("AfterGetArtifact"))
                    }
                };
                match resolved {
                    Ok(resolved) => {
                        let mut state = state;
                        state.resolved.push(resolved);
                        get_artifact_or_persist_status(cr, &key, state, index + 1)
                    }
                    Err(err) if err.is_object_not_found() => error_state(
                        state,
                        ReconcileError::MissingInput {
                            kind: artifact.kind,
                            name: artifact.name,
                        },
                    ),
                    Err(err) => error_state(
                        state,
                        ReconcileError::GetInputFailed {
                            kind: artifact.kind,
                            name: artifact.name,
                            source: err,
                        },
                    ),
                }
            }
            ReconcileStep::AfterPersistStatus => match resp_o {
                Some(StoreResponse::UpdateStatus(Ok(_))) => {
                    let state_prime = state
                        .with_step(ReconcileStep::AfterWorkloadRequest(ActionKind::Get));
                    (state_prime, Some(StoreRequest::GetStatefulSet(key)))
                }
                Some(StoreResponse::UpdateStatus(Err(err))) => {
                    error_state(state, ReconcileError::PersistStatusFailed(err))
                }
                _ => error_state(state, ReconcileError::UnexpectedResponse("AfterPersistStatus")),
            },
            ReconcileStep::AfterWorkloadRequest(ActionKind::Get) => match resp_o {
                Some(StoreResponse::GetStatefulSet(Ok(found))) => {
                    let desired = update_stateful_set(&self.strategy, cr, &state.hashes, found.clone());
                    upsert(cr, registry, Some(found), desired, state)
                }
                Some(StoreResponse::GetStatefulSet(Err(err))) if err.is_object_not_found() => {
                    let desired = make_stateful_set(&self.strategy, cr, &state.hashes);
                    upsert(cr, registry, None, desired, state)
                }
                Some(StoreResponse::GetStatefulSet(Err(err))) => error_state(
                    state,
                    ReconcileError::UpsertFailed {
                        action: ActionKind::Get,
                        name: key.name,
                        source: err,
                    },
                ),
                _ => error_state(state, ReconcileError::UnexpectedResponse("AfterWorkloadRequest(Get)")),
            },
            ReconcileStep::AfterWorkloadRequest(ActionKind::Create) => match resp_o {
                Some(StoreResponse::CreateStatefulSet(Ok(_))) => {
                    (state.with_step(ReconcileStep::Done(UpsertOutcome::Created)), None)
                }
                Some(StoreResponse::CreateStatefulSet(Err(err))) => error_state(
                    state,
                    ReconcileError::UpsertFailed {
                        action: ActionKind::Create,
                        name: key.name,
                        source: err,
                    },
                ),
                _ => error_state(state, ReconcileError::UnexpectedResponse("AfterWorkloadRequest(Create)")),
            },
            ReconcileStep::AfterWorkloadRequest(ActionKind::Update) => match resp_o {
                Some(StoreResponse::UpdateStatefulSet(Ok(_))) => {
                    (state.with_step(ReconcileStep::Done(UpsertOutcome::Updated)), None)
                }
                Some(StoreResponse::UpdateStatefulSet(Err(err))) => error_state(
                    state,
                    ReconcileError::UpsertFailed {
                        action: ActionKind::Update,
                        name: key.name,
                        source: err,
                    },
                ),
                _ => error_state(state, ReconcileError::UnexpectedResponse("AfterWorkloadRequest(Update)")),
            },
            ReconcileStep::Done(_) | ReconcileStep::Error(_) => (state, None),
        }
    }
}

fn error_state<K>(state: ReconcileState, err: ReconcileError) -> (ReconcileState, Option<StoreRequest<K>>) {
    (state.with_step(ReconcileStep::Error(err)), None)
}

/// Keeps the first occurrence of every artifact, so an artifact referenced twice is read once.
fn dedup_artifacts(artifacts: Vec<ArtifactRef>) -> Vec<ArtifactRef> {
    let mut deduped: Vec<ArtifactRef> = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        if !deduped.contains(&artifact) {
            deduped.push(artifact);
        }
    }
    deduped
}

/// Hashes are keyed by artifact name alone, so two kinds may not share a name.
fn conflicting_name(artifacts: &[ArtifactRef]) -> Option<String> {
    artifacts.iter().enumerate().find_map(|(index, artifact)| {
        artifacts[..index]
            .iter()
            .any(|earlier| earlier.name == artifact.name)
            .then(|| artifact.name.clone())
    })
}

fn get_artifact_or_persist_status<K: Descriptor>(
    cr: &K,
    key: &ObjectKey,
    state: ReconcileState,
    index: usize,
) -> (ReconcileState, Option<StoreRequest<K>>) {
    match state.artifacts.get(index) {
        Some(artifact) => {
            let artifact_key = ObjectKey::new(key.namespace.clone(), artifact.name.clone());
            let req = match artifact.kind {
                ArtifactKind::ConfigMap => StoreRequest::GetConfigMap(artifact_key),
                ArtifactKind::Secret => StoreRequest::GetSecret(artifact_key),
            };
            (state.with_step(ReconcileStep::AfterGetArtifact(index)), Some(req))
        }
        None => {
            let hashes = compute_hashes(&state.resolved);
            let mut cr_with_status = cr.clone();
            cr_with_status.set_status_hashes(hashes.clone());
            let state_prime = ReconcileState {
                reconcile_step: ReconcileStep::AfterPersistStatus,
                hashes,
                ..state
            };
            (state_prime, Some(StoreRequest::UpdateStatus(cr_with_status)))
        }
    }
}

fn upsert<K: Descriptor>(
    cr: &K,
    registry: &TypeRegistry,
    found: Option<StatefulSet>,
    mut desired: StatefulSet,
    state: ReconcileState,
) -> (ReconcileState, Option<StoreRequest<K>>) {
    match registry.controller_owner_ref(cr) {
        Ok(owner_ref) => set_owner_reference(&mut desired, owner_ref),
        Err(err) => return error_state(state, ReconcileError::OwnerReference(err)),
    }
    match plan_upsert(found, desired) {
        UpsertPlan::Create(obj) => (
            state.with_step(ReconcileStep::AfterWorkloadRequest(ActionKind::Create)),
            Some(StoreRequest::CreateStatefulSet(obj)),
        ),
        UpsertPlan::Update(obj) => (
            state.with_step(ReconcileStep::AfterWorkloadRequest(ActionKind::Update)),
            Some(StoreRequest::UpdateStatefulSet(obj)),
        ),
        UpsertPlan::Unchanged => (state.with_step(ReconcileStep::Done(UpsertOutcome::Unchanged)), None),
    }
}
