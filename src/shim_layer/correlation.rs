// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::kubernetes_api_objects::{ObjectKey, ReconcileRequest};
use crate::reconciler::strategy::Descriptor;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{Resource, ResourceExt};
use tracing::info;

/// Label on a config artifact naming the managingCrName of the descriptors that consume it.
pub const CORRELATION_LABEL: &str = "upper-cr";

/// Maps an event on a config artifact to the descriptors that consume it.
///
/// `descriptors` is the controller's cached view of all descriptors; only those
/// in the artifact's namespace whose managingCrName equals the artifact's
/// correlation label are returned. An artifact without the label maps to nothing.
pub fn requests_for_artifact<'a, K>(
    artifact: &ObjectMeta,
    descriptors: impl IntoIterator<Item = &'a K>,
) -> Vec<ReconcileRequest>
where
    K: Descriptor,
{
    let label = match artifact.labels.as_ref().and_then(|labels| labels.get(CORRELATION_LABEL)) {
        Some(label) => label,
        None => return Vec::new(),
    };
    let namespace = artifact.namespace.clone().unwrap_or_default();
    let artifact_name = artifact.name.clone().unwrap_or_default();

    let mut requests = Vec::new();
    for cr in descriptors {
        if cr.namespace().as_deref() != Some(namespace.as_str()) || cr.managing_cr_name() != label.as_str() {
            continue;
        }
        info!(
            "Artifact {} is consumed by {} {} ({}={})",
            artifact_name,
            K::kind(&()),
            cr.name_any(),
            CORRELATION_LABEL,
            label
        );
        requests.push(ObjectKey::new(namespace.clone(), cr.name_any()));
    }
    requests
}
