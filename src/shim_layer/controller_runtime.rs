// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::config::WatchScope;
use crate::kubernetes_api_objects::{ObjectKey, ReconcileRequest};
use crate::reconciler::error::{ReconcileError, RetryPolicy};
use crate::reconciler::io::{StoreRequest, StoreResponse};
use crate::reconciler::reconciler::Reconciler;
use crate::reconciler::step::ReconcileStep;
use crate::reconciler::strategy::{Descriptor, WorkloadStrategy};
use crate::reconciler::workload_reconciler::WorkloadReconciler;
use crate::resources::upsert::UpsertOutcome;
use crate::shim_layer::backoff::ItemBackoff;
use crate::shim_layer::correlation::requests_for_artifact;
use crate::shim_layer::Capabilities;
use crate::store::{KubeStore, ObjectStore};
use crate::type_registry::TypeRegistry;
use futures::{future, StreamExt};
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::runtime::controller::{Action, Controller, Error as ControllerError};
use kube::runtime::reflector::{ObjectRef, Store};
use kube::runtime::watcher;
use kube::{Client, Resource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument, Span};

// The shim layer connects the pure reconciler to kube-rs.
// kube-rs decides when a pass runs for a key; reconcile_with decides what the
// pass does by feeding store responses into reconcile_core until it is done.

/// What a pass ended with when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// The descriptor is gone; the owned workload is left to garbage collection.
    DescriptorNotFound,
    Reconciled(UpsertOutcome),
}

/// Data is the context shared by all passes of one controller.
pub struct Data<S: WorkloadStrategy, St> {
    pub reconciler: WorkloadReconciler<S>,
    pub store: St,
    pub logger: Span,
    pub registry: Arc<TypeRegistry>,
    pub backoff: ItemBackoff,
}

impl<S: WorkloadStrategy, St: ObjectStore<S::K>> Data<S, St> {
    pub fn new(reconciler: WorkloadReconciler<S>, store: St, logger: Span, registry: Arc<TypeRegistry>) -> Data<S, St> {
        Data {
            reconciler,
            store,
            logger,
            registry,
            backoff: ItemBackoff::default(),
        }
    }

    /// How long to wait before the failed pass for `key` runs again.
    pub fn retry_delay(&self, key: Option<&ObjectKey>, error: &ReconcileError) -> Duration {
        match (error.retry_policy(), key) {
            (RetryPolicy::FixedDelay(delay), _) => delay,
            (RetryPolicy::Backoff, Some(key)) => self.backoff.next_delay(key),
            (RetryPolicy::Backoff, None) => crate::reconciler::error::FIXED_RETRY_DELAY,
        }
    }

    /// Drops the retry state of a descriptor that kube-rs no longer has in its cache.
    /// Such a key is never reconciled again, so a successful pass cannot reset it.
    pub fn forget_descriptor<A: Resource>(&self, obj_ref: &ObjectRef<A>) {
        if let Some(key) = ObjectKey::from_object_ref(obj_ref) {
            debug!(parent: &self.logger, "{} is gone, dropping its retry state", key);
            self.backoff.forget(&key);
        }
    }
}

impl<S: WorkloadStrategy, St: ObjectStore<S::K>> Capabilities<S::K> for Data<S, St> {
    type Store = St;

    fn store(&self) -> &St {
        &self.store
    }

    fn logger(&self) -> &Span {
        &self.logger
    }

    fn registry(&self) -> &TypeRegistry {
        &self.registry
    }
}

/// run_controller watches descriptors in `scope` and keeps their workloads in shape
/// until the process receives SIGINT or SIGTERM.
///
/// Besides the descriptors themselves, passes are triggered by changes to the
/// owned StatefulSets and to ConfigMaps and Secrets that carry the correlation label.
pub async fn run_controller<S>(strategy: S, scope: WatchScope, registry: Arc<TypeRegistry>) -> anyhow::Result<()>
where
    S: WorkloadStrategy,
{
    let client = Client::try_default().await?;
    let crs = scope.api::<S::K>(client.clone());
    let logger = info_span!("controller", kind = %S::K::kind(&()));
    let ctx = Arc::new(Data::new(
        WorkloadReconciler::new(strategy),
        KubeStore::new(client.clone()),
        logger,
        registry,
    ));
    let events_ctx = ctx.clone();

    let controller = Controller::new(crs, watcher::Config::default());
    let descriptors = controller.store();
    let descriptors_of_secrets = descriptors.clone();

    info!("starting controller");
    controller
        .owns(scope.api::<StatefulSet>(client.clone()), watcher::Config::default())
        .watches(
            scope.api::<ConfigMap>(client.clone()),
            watcher::Config::default(),
            move |config_map: ConfigMap| map_artifact(&config_map, &descriptors),
        )
        .watches(
            scope.api::<Secret>(client),
            watcher::Config::default(),
            move |secret: Secret| map_artifact(&secret, &descriptors_of_secrets),
        )
        .shutdown_on_signal()
        .run(reconcile::<S, KubeStore>, error_policy::<S, KubeStore>, ctx)
        .for_each(|res| {
            match res {
                Ok(o) => info!("reconciled {:?}", o),
                Err(ControllerError::ObjectNotFound(obj_ref)) => events_ctx.forget_descriptor(&obj_ref),
                Err(e) => warn!("reconcile failed: {}", e),
            }
            future::ready(())
        })
        .await;
    info!("controller terminated");
    Ok(())
}

fn map_artifact<A, K>(artifact: &A, descriptors: &Store<K>) -> Vec<ObjectRef<K>>
where
    A: Resource,
    K: Descriptor,
{
    let cached = descriptors.state();
    requests_for_artifact(artifact.meta(), cached.iter().map(|cr| cr.as_ref()))
        .into_iter()
        .map(ObjectKey::into_object_ref::<K>)
        .collect()
}

/// reconcile is the function registered to kube-rs.
/// A successful pass waits for the next change; the error path is decided by error_policy.
pub async fn reconcile<S, St>(cr: Arc<S::K>, ctx: Arc<Data<S, St>>) -> Result<Action, ReconcileError>
where
    S: WorkloadStrategy,
    St: ObjectStore<S::K>,
{
    let request = ObjectKey::from_meta(cr.as_ref())
        .ok_or(ReconcileError::MissingObjectKey(".metadata.name or .metadata.namespace"))?;
    reconcile_with(&ctx.reconciler, &request, ctx.as_ref()).await?;
    ctx.backoff.forget(&request);
    Ok(Action::await_change())
}

pub fn error_policy<S, St>(cr: Arc<S::K>, error: &ReconcileError, ctx: Arc<Data<S, St>>) -> Action
where
    S: WorkloadStrategy,
    St: ObjectStore<S::K>,
{
    let key = ObjectKey::from_meta(cr.as_ref());
    let delay = ctx.retry_delay(key.as_ref(), error);
    warn!(parent: &ctx.logger, "Reconcile failed due to error: {}, requeue after {:?}", error, delay);
    Action::requeue(delay)
}

/// reconcile_with runs one pass for `request`.
///
/// The descriptor is read fresh from the store rather than taken from the
/// watch cache. Starting from reconcile_init_state, the pass keeps calling
/// reconcile_core with the response to the previous request, sending each
/// new request to the store, until the reconciler reports done or error.
pub async fn reconcile_with<R, C>(
    reconciler: &R,
    request: &ReconcileRequest,
    ctx: &C,
) -> Result<PassOutcome, ReconcileError>
where
    R: Reconciler,
    C: Capabilities<R::K>,
{
    let span = info_span!(parent: ctx.logger(), "reconcile", key = %request);
    async move {
        let log_header = format!("Reconciling {}/{}:", R::K::kind(&()), request);

        let cr = match ctx.store().get_descriptor(request).await {
            Ok(cr) => cr,
            Err(err) if err.is_object_not_found() => {
                info!("{} {} not found, end reconcile", log_header, request);
                return Ok(PassOutcome::DescriptorNotFound);
            }
            Err(err) => {
                warn!("{} Get {} failed with error: {}", log_header, request, err);
                return Err(ReconcileError::FetchFailed {
                    key: request.to_string(),
                    source: err,
                });
            }
        };

        let mut state = reconciler.reconcile_init_state();
        let mut resp_option = None;
        loop {
            if reconciler.reconcile_done(&state) || reconciler.reconcile_error(&state) {
                break;
            }
            let (state_prime, request_option) =
                reconciler.reconcile_core(&cr, ctx.registry(), resp_option, state);
            resp_option = match request_option {
                Some(store_request) => Some(send_request(ctx.store(), store_request, &log_header).await),
                None => None,
            };
            state = state_prime;
        }

        match state.reconcile_step {
            ReconcileStep::Done(outcome) => {
                info!(
                    "StatefulSet {} successfully reconciled - operation: {}",
                    request.name, outcome
                );
                Ok(PassOutcome::Reconciled(outcome))
            }
            ReconcileStep::Error(err) => {
                info!("{} error: {}", log_header, err);
                Err(err)
            }
            _ => Err(ReconcileError::UnexpectedResponse("reconcile_with")),
        }
    }
    .instrument(span)
    .await
}

async fn send_request<K, St>(store: &St, request: StoreRequest<K>, log_header: &str) -> StoreResponse<K>
where
    K: Descriptor,
    St: ObjectStore<K>,
{
    let verb = request.verb();
    let key = request.key();
    let response = match request {
        StoreRequest::GetConfigMap(key) => StoreResponse::GetConfigMap(store.get_config_map(&key).await),
        StoreRequest::GetSecret(key) => StoreResponse::GetSecret(store.get_secret(&key).await),
        StoreRequest::UpdateStatus(cr) => StoreResponse::UpdateStatus(store.update_descriptor_status(&cr).await),
        StoreRequest::GetStatefulSet(key) => StoreResponse::GetStatefulSet(store.get_stateful_set(&key).await),
        StoreRequest::CreateStatefulSet(obj) => {
            StoreResponse::CreateStatefulSet(store.create_stateful_set(&obj).await)
        }
        StoreRequest::UpdateStatefulSet(obj) => {
            StoreResponse::UpdateStatefulSet(store.update_stateful_set(&obj).await)
        }
    };
    match response.error() {
        Some(err) => info!("{} {} {} failed with error: {}", log_header, verb, key, err),
        None => info!("{} {} {} done", log_header, verb, key),
    }
    response
}
