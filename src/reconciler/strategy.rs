// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::reconciler::artifact::ArtifactRef;
use crate::reconciler::hash_tracker::Hash;
use k8s_openapi::api::core::v1::{EnvVar, PodSpec};
use k8s_openapi::NamespaceResourceScope;
use kube::Resource;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Descriptor is the user-authored custom resource that a workload is derived from.
/// The controller only writes its status.
pub trait Descriptor:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// The correlation key shared with the config artifacts this descriptor consumes.
    fn managing_cr_name(&self) -> &str;

    fn replicas(&self) -> i32;

    fn status_hashes(&self) -> Vec<Hash>;

    fn set_status_hashes(&mut self, hashes: Vec<Hash>);
}

/// WorkloadStrategy supplies everything that differs between the kinds of
/// workloads reconciled by the same control loop.
///
/// The generic builder takes care of replicas, the selector, template labels
/// and the environment merge of the primary container; a strategy only decides
/// which artifacts to read and what the pod looks like.
pub trait WorkloadStrategy: Send + Sync + 'static {
    type K: Descriptor;

    /// Artifacts a pass must resolve before touching the workload, in the order
    /// they are read and hashed.
    fn required_artifacts(&self, cr: &Self::K) -> Vec<ArtifactRef>;

    /// Labels used for the selector (at creation) and the pod template.
    fn make_labels(&self, cr: &Self::K) -> BTreeMap<String, String>;

    /// Fixed variables of the primary container, before hash variables are added.
    fn bootstrap_env(&self, cr: &Self::K) -> BTreeMap<String, String>;

    /// Builds the pod spec whose first container is the primary container
    /// carrying `env`.
    fn make_pod_spec(&self, cr: &Self::K, env: Vec<EnvVar>) -> PodSpec;
}
