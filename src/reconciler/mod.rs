// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod artifact;
pub mod error;
pub mod hash_tracker;
pub mod io;
#[allow(clippy::module_inception)]
pub mod reconciler;
pub mod step;
pub mod strategy;
pub mod workload_reconciler;

pub use error::ReconcileError;
pub use reconciler::Reconciler;
pub use step::{ReconcileState, ReconcileStep};
pub use strategy::{Descriptor, WorkloadStrategy};
pub use workload_reconciler::WorkloadReconciler;
