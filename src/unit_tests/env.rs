// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::resources::env::*;
use k8s_openapi::api::core::v1::{
    Container, EnvVar, EnvVarSource, ObjectFieldSelector, PodSpec, PodTemplateSpec,
};
use std::collections::BTreeMap;

fn names(envs: &[EnvVar]) -> Vec<&str> {
    envs.iter().map(|env| env.name.as_str()).collect()
}

fn generated(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
pub fn test_merge_envs_into_empty() {
    println!("Testing merge_envs()...");
    let merged = merge_envs(&[], &generated(&[("b", "2"), ("a", "1")]));
    assert_eq!(merged, vec![plain_env("a", "1"), plain_env("b", "2")]);
}

#[test]
pub fn test_merge_envs_keeps_existing_order_and_unrelated_entries() {
    let pod_name = EnvVar {
        name: "POD_NAME".to_string(),
        value: None,
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                field_path: "metadata.name".to_string(),
                api_version: None,
            }),
            ..EnvVarSource::default()
        }),
    };
    let existing = vec![
        plain_env("z-hash", "old"),
        pod_name.clone(),
        plain_env("KOLLA_CONFIG_STRATEGY", "COPY_ONCE"),
    ];
    let merged = merge_envs(
        &existing,
        &generated(&[("KOLLA_CONFIG_STRATEGY", "COPY_ALWAYS"), ("z-hash", "new"), ("a-hash", "h")]),
    );
    assert_eq!(
        names(&merged),
        vec!["z-hash", "POD_NAME", "KOLLA_CONFIG_STRATEGY", "a-hash"]
    );
    assert_eq!(merged[0], plain_env("z-hash", "new"));
    assert_eq!(merged[1], pod_name);
    assert_eq!(merged[2], plain_env("KOLLA_CONFIG_STRATEGY", "COPY_ALWAYS"));
}

#[test]
pub fn test_merge_envs_is_idempotent() {
    let gen = generated(&[("a", "1"), ("b", "2")]);
    let once = merge_envs(&[plain_env("x", "0")], &gen);
    let twice = merge_envs(&once, &gen);
    assert_eq!(once, twice);
}

#[test]
pub fn test_primary_container_env() {
    println!("Testing primary_container_env()...");
    let container = Container {
        name: "cinder-scheduler".to_string(),
        env: Some(vec![plain_env("a", "1")]),
        ..Container::default()
    };
    let mut template = PodTemplateSpec {
        metadata: None,
        spec: Some(PodSpec {
            containers: vec![container.clone()],
            ..PodSpec::default()
        }),
    };
    assert_eq!(primary_container_env(&template), vec![plain_env("a", "1")]);

    if let Some(spec) = template.spec.as_mut() {
        spec.containers.push(container);
    }
    assert!(primary_container_env(&template).is_empty());
    assert!(primary_container_env(&PodTemplateSpec::default()).is_empty());
}
