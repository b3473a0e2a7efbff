// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::reconciler::hash_tracker::{hash_env_vars, Hash};
use crate::reconciler::strategy::{Descriptor, WorkloadStrategy};
use crate::resources::env::{merge_envs, primary_container_env};
use crate::resources::pod_spec::apply_pod_spec;
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::ResourceExt;

/// Builds the StatefulSet for a descriptor that does not have one yet.
pub fn make_stateful_set<S: WorkloadStrategy>(strategy: &S, cr: &S::K, hashes: &[Hash]) -> StatefulSet {
    let stateful_set = StatefulSet {
        metadata: ObjectMeta {
            name: Some(cr.name_any()),
            namespace: cr.namespace(),
            ..ObjectMeta::default()
        },
        ..StatefulSet::default()
    };
    mutate_stateful_set(strategy, cr, hashes, stateful_set, true)
}

/// Derives the desired state from the fetched StatefulSet.
/// The selector is left as it is since it cannot change after creation, and
/// pod fields the controller does not own keep their fetched values.
pub fn update_stateful_set<S: WorkloadStrategy>(
    strategy: &S,
    cr: &S::K,
    hashes: &[Hash],
    found: StatefulSet,
) -> StatefulSet {
    mutate_stateful_set(strategy, cr, hashes, found, false)
}

fn mutate_stateful_set<S: WorkloadStrategy>(
    strategy: &S,
    cr: &S::K,
    hashes: &[Hash],
    mut stateful_set: StatefulSet,
    creating: bool,
) -> StatefulSet {
    let labels = strategy.make_labels(cr);
    let mut spec = stateful_set.spec.take().unwrap_or_default();

    if creating {
        spec.selector = LabelSelector {
            match_labels: Some(labels.clone()),
            ..LabelSelector::default()
        };
    }
    spec.replicas = Some(cr.replicas());

    let mut generated = strategy.bootstrap_env(cr);
    generated.extend(hash_env_vars(hashes));
    let env = merge_envs(&primary_container_env(&spec.template), &generated);

    let mut template_meta = spec.template.metadata.take().unwrap_or_default();
    let mut template_labels = template_meta.labels.take().unwrap_or_default();
    template_labels.extend(labels);
    template_meta.labels = Some(template_labels);
    spec.template.metadata = Some(template_meta);
    let desired_pod_spec = strategy.make_pod_spec(cr, env);
    spec.template.spec = Some(apply_pod_spec(spec.template.spec.take(), desired_pod_spec));

    stateful_set.spec = Some(spec);
    stateful_set
}
