// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::reconciler::strategy::Descriptor;
use crate::store::ObjectStore;
use crate::type_registry::TypeRegistry;
use tracing::Span;

pub mod backoff;
pub mod controller_runtime;
pub mod correlation;

/// Capabilities is everything a reconcile pass may use besides the reconciler itself.
pub trait Capabilities<K: Descriptor>: Send + Sync {
    type Store: ObjectStore<K>;

    fn store(&self) -> &Self::Store;

    /// The controller-wide span every pass is logged under.
    fn logger(&self) -> &Span;

    fn registry(&self) -> &TypeRegistry;
}
