// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::reconciler::io::{StoreRequest, StoreResponse};
use crate::reconciler::step::{ReconcileState, ReconcileStep};
use crate::reconciler::strategy::Descriptor;
use crate::type_registry::TypeRegistry;

/// Reconciler is the pure part of a controller.
///
/// reconcile_core never talks to the backing store. It takes the descriptor,
/// the response to the request it issued last time and the current state,
/// and returns the next state together with at most one new request.
/// The shim layer keeps calling it until reconcile_done or reconcile_error
/// holds for the returned state.
pub trait Reconciler: Send + Sync {
    type K: Descriptor;

    fn reconcile_init_state(&self) -> ReconcileState;

    fn reconcile_core(
        &self,
        cr: &Self::K,
        registry: &TypeRegistry,
        resp_o: Option<StoreResponse<Self::K>>,
        state: ReconcileState,
    ) -> (ReconcileState, Option<StoreRequest<Self::K>>);

    fn reconcile_done(&self, state: &ReconcileState) -> bool {
        matches!(state.reconcile_step, ReconcileStep::Done(_))
    }

    fn reconcile_error(&self, state: &ReconcileState) -> bool {
        matches!(state.reconcile_step, ReconcileStep::Error(_))
    }
}
