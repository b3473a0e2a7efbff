// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::kubernetes_api_objects::{APIError, ObjectKey};
use crate::reconciler::strategy::Descriptor;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};

pub mod kube_store;
pub mod memory;

pub use kube_store::KubeStore;
pub use memory::MemoryStore;

/// ObjectStore is the narrow view of the backing store that a reconcile pass needs.
///
/// Every call is a fresh read or a single write; optimistic concurrency is
/// enforced by the store through the resource version carried by the object.
#[async_trait]
pub trait ObjectStore<K: Descriptor>: Send + Sync {
    async fn get_descriptor(&self, key: &ObjectKey) -> Result<K, APIError>;

    /// Writes the status of `cr` through the status sub-resource.
    async fn update_descriptor_status(&self, cr: &K) -> Result<K, APIError>;

    async fn get_config_map(&self, key: &ObjectKey) -> Result<ConfigMap, APIError>;

    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, APIError>;

    async fn get_stateful_set(&self, key: &ObjectKey) -> Result<StatefulSet, APIError>;

    async fn create_stateful_set(&self, obj: &StatefulSet) -> Result<StatefulSet, APIError>;

    async fn update_stateful_set(&self, obj: &StatefulSet) -> Result<StatefulSet, APIError>;
}
