// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use k8s_openapi::api::core::v1::{EnvVar, PodTemplateSpec};
use std::collections::BTreeMap;

/// Merges generated variables into the existing environment of a container.
///
/// Existing entries keep their position. An existing entry whose name is
/// generated takes the generated value; the others are left untouched.
/// Generated names that are not present yet are appended in name order.
pub fn merge_envs(existing: &[EnvVar], generated: &BTreeMap<String, String>) -> Vec<EnvVar> {
    let mut merged: Vec<EnvVar> = existing
        .iter()
        .map(|env| match generated.get(&env.name) {
            Some(value) => plain_env(&env.name, value),
            None => env.clone(),
        })
        .collect();
    for (name, value) in generated {
        if !existing.iter().any(|env| &env.name == name) {
            merged.push(plain_env(name, value));
        }
    }
    merged
}

/// Returns the environment of the only container of the template.
/// A template with zero or several containers has no primary container to
/// inherit from, and its environment is treated as empty.
pub fn primary_container_env(template: &PodTemplateSpec) -> Vec<EnvVar> {
    match template.spec.as_ref() {
        Some(pod_spec) if pod_spec.containers.len() == 1 => {
            pod_spec.containers[0].env.clone().unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

pub fn plain_env(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        value_from: None,
    }
}
