// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::controllers::cinder_scheduler_controller::strategy::*;
use crate::reconciler::hash_tracker::Hash;
use crate::resources::env::plain_env;
use crate::resources::stateful_set::*;
use crate::unit_tests::fixtures::*;
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::{Container, EnvVar, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use std::collections::BTreeMap;

fn hashes() -> Vec<Hash> {
    vec![
        Hash {
            name: CINDER_SECRET.to_string(),
            hash: "aaaa".to_string(),
        },
        Hash {
            name: "base-config-data".to_string(),
            hash: "bbbb".to_string(),
        },
    ]
}

fn primary_env(stateful_set: &StatefulSet) -> Vec<EnvVar> {
    stateful_set.spec.as_ref().unwrap().template.spec.as_ref().unwrap().containers[0]
        .env
        .clone()
        .unwrap()
}

#[test]
pub fn test_make_stateful_set() {
    println!("Testing make_stateful_set()...");
    let cr = make_cinder_scheduler(NAMESPACE, NAME);
    let stateful_set = make_stateful_set(&CinderSchedulerStrategy::default(), &cr, &hashes());

    assert_eq!(stateful_set.metadata.name.as_deref(), Some(NAME));
    assert_eq!(stateful_set.metadata.namespace.as_deref(), Some(NAMESPACE));
    let spec = stateful_set.spec.as_ref().unwrap();
    let labels = BTreeMap::from([
        ("app".to_string(), APP_LABEL.to_string()),
        ("cr".to_string(), NAME.to_string()),
    ]);
    assert_eq!(spec.selector.match_labels, Some(labels.clone()));
    assert_eq!(spec.replicas, Some(1));
    assert_eq!(spec.template.metadata.as_ref().unwrap().labels, Some(labels));

    let pod_spec = spec.template.spec.as_ref().unwrap();
    assert_eq!(pod_spec.service_account_name.as_deref(), Some(SERVICE_ACCOUNT));
    assert_eq!(pod_spec.containers.len(), 1);
    let container = &pod_spec.containers[0];
    assert_eq!(container.name, CONTAINER_NAME);
    assert_eq!(container.image, Some(cr.spec.container_image.clone()));
    assert_eq!(
        container.readiness_probe.as_ref().unwrap().exec.as_ref().unwrap().command,
        Some(vec!["/openstack/healthcheck".to_string(), "readiness".to_string()])
    );
    assert_eq!(
        container.liveness_probe.as_ref().unwrap().exec.as_ref().unwrap().command,
        Some(vec!["/openstack/healthcheck".to_string(), "liveness".to_string()])
    );
    assert_eq!(
        primary_env(&stateful_set),
        vec![
            plain_env("KOLLA_CONFIG_FILE", KOLLA_CONFIG),
            plain_env("KOLLA_CONFIG_STRATEGY", "COPY_ALWAYS"),
            plain_env("base-config-data", "bbbb"),
            plain_env(CINDER_SECRET, "aaaa"),
        ]
    );
}

#[test]
pub fn test_pod_volumes_and_init_container() {
    let cr = make_cinder_scheduler(NAMESPACE, NAME);
    let stateful_set = make_stateful_set(&CinderSchedulerStrategy::default(), &cr, &[]);
    let pod_spec = stateful_set.spec.unwrap().template.spec.unwrap();

    let volumes = pod_spec.volumes.unwrap();
    let volume_names: Vec<&str> = volumes.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(
        volume_names,
        vec!["etc-machine-id", "scripts", "config-data", "config-data-custom", "config-data-merged"]
    );
    let scripts = volumes[1].config_map.as_ref().unwrap();
    assert_eq!(scripts.name.as_deref(), Some("base-scripts"));
    assert_eq!(scripts.default_mode, Some(0o755));
    assert_eq!(volumes[3].config_map.as_ref().unwrap().default_mode, Some(0o644));
    assert_eq!(
        volumes[4].empty_dir.as_ref().unwrap().medium.as_deref(),
        Some("Memory")
    );

    let mounts: Vec<String> = pod_spec.containers[0]
        .volume_mounts
        .as_ref()
        .unwrap()
        .iter()
        .map(|m| m.name.clone())
        .collect();
    assert_eq!(mounts, vec!["etc-machine-id", "scripts", "config-data-merged"]);

    let init_containers = pod_spec.init_containers.unwrap();
    assert_eq!(init_containers.len(), 1);
    let init = &init_containers[0];
    assert_eq!(init.name, "init");
    let security_context = init.security_context.as_ref().unwrap();
    assert_eq!(security_context.privileged, Some(true));
    assert_eq!(security_context.run_as_user, Some(0));
    let init_mounts: Vec<&str> = init
        .volume_mounts
        .as_ref()
        .unwrap()
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert!(init_mounts.contains(&"config-data"));
    assert!(init_mounts.contains(&"config-data-custom"));

    let env = init.env.as_ref().unwrap();
    let database_host = env.iter().find(|e| e.name == "DatabaseHost").unwrap();
    assert_eq!(database_host.value.as_deref(), Some("openstack-db"));
    let transport_url = env.iter().find(|e| e.name == "TransportURL").unwrap();
    let secret_ref = transport_url
        .value_from
        .as_ref()
        .unwrap()
        .secret_key_ref
        .as_ref()
        .unwrap();
    assert_eq!(secret_ref.name.as_deref(), Some(NOVA_SECRET));
    let password = env.iter().find(|e| e.name == "DatabasePassword").unwrap();
    assert_eq!(
        password.value_from.as_ref().unwrap().secret_key_ref.as_ref().unwrap().name.as_deref(),
        Some(CINDER_SECRET)
    );
}

#[test]
pub fn test_update_stateful_set_keeps_selector() {
    println!("Testing update_stateful_set()...");
    let mut cr = make_cinder_scheduler(NAMESPACE, NAME);
    let strategy = CinderSchedulerStrategy::default();
    let mut found = make_stateful_set(&strategy, &cr, &hashes());
    let legacy_selector = LabelSelector {
        match_labels: Some(BTreeMap::from([("legacy".to_string(), "true".to_string())])),
        ..LabelSelector::default()
    };
    found.spec.as_mut().unwrap().selector = legacy_selector.clone();

    cr.spec.replicas = 3;
    let updated = update_stateful_set(&strategy, &cr, &hashes(), found);
    let spec = updated.spec.as_ref().unwrap();
    assert_eq!(spec.selector, legacy_selector);
    assert_eq!(spec.replicas, Some(3));
}

#[test]
pub fn test_update_stateful_set_merges_template_labels_and_env() {
    let cr = make_cinder_scheduler(NAMESPACE, NAME);
    let strategy = CinderSchedulerStrategy::default();
    let mut found = make_stateful_set(&strategy, &cr, &hashes());
    {
        let template = &mut found.spec.as_mut().unwrap().template;
        template
            .metadata
            .as_mut()
            .unwrap()
            .labels
            .as_mut()
            .unwrap()
            .insert("extra".to_string(), "kept".to_string());
        template.spec.as_mut().unwrap().containers[0]
            .env
            .as_mut()
            .unwrap()
            .insert(0, plain_env("DEBUG", "1"));
    }

    let mut new_hashes = hashes();
    new_hashes[1].hash = "cccc".to_string();
    let updated = update_stateful_set(&strategy, &cr, &new_hashes, found);

    let labels = updated.spec.as_ref().unwrap().template.metadata.as_ref().unwrap().labels.clone().unwrap();
    assert_eq!(labels.get("extra").map(String::as_str), Some("kept"));
    assert_eq!(labels.get("app").map(String::as_str), Some(APP_LABEL));

    let env = primary_env(&updated);
    assert_eq!(env[0], plain_env("DEBUG", "1"));
    assert!(env.contains(&plain_env("base-config-data", "cccc")));
    assert!(!env.contains(&plain_env("base-config-data", "bbbb")));
}

#[test]
pub fn test_update_stateful_set_ignores_env_of_multi_container_template() {
    let cr = make_cinder_scheduler(NAMESPACE, NAME);
    let strategy = CinderSchedulerStrategy::default();
    let mut found = make_stateful_set(&strategy, &cr, &[]);
    found.spec.as_mut().unwrap().template.spec = Some(PodSpec {
        containers: vec![
            Container {
                name: "a".to_string(),
                env: Some(vec![plain_env("STALE", "1")]),
                ..Container::default()
            },
            Container {
                name: "b".to_string(),
                ..Container::default()
            },
        ],
        ..PodSpec::default()
    });
    let updated = update_stateful_set(&strategy, &cr, &[], found);
    let env = primary_env(&updated);
    assert!(!env.iter().any(|e| e.name == "STALE"));
    assert_eq!(
        updated.spec.unwrap().template.spec.unwrap().containers.len(),
        1
    );
}

#[test]
pub fn test_update_stateful_set_applies_owned_pod_fields_only() {
    println!("Testing update_stateful_set() on a defaulted pod spec...");
    let mut cr = make_cinder_scheduler(NAMESPACE, NAME);
    let strategy = CinderSchedulerStrategy::default();
    let mut found = make_stateful_set(&strategy, &cr, &hashes());
    {
        let pod_spec = found.spec.as_mut().unwrap().template.spec.as_mut().unwrap();
        pod_spec.dns_policy = Some("ClusterFirst".to_string());
        let container = &mut pod_spec.containers[0];
        container.image_pull_policy = Some("IfNotPresent".to_string());
        let probe = container.liveness_probe.as_mut().unwrap();
        probe.failure_threshold = Some(3);
        probe.period_seconds = Some(99);
    }

    cr.spec.container_image = "quay.io/tripleo/cinder-scheduler:next".to_string();
    let updated = update_stateful_set(&strategy, &cr, &hashes(), found);
    let pod_spec = updated.spec.unwrap().template.spec.unwrap();
    assert_eq!(pod_spec.dns_policy, Some("ClusterFirst".to_string()));
    let container = &pod_spec.containers[0];
    assert_eq!(container.image, Some(cr.spec.container_image.clone()));
    assert_eq!(container.image_pull_policy, Some("IfNotPresent".to_string()));
    let probe = container.liveness_probe.as_ref().unwrap();
    assert_eq!(probe.failure_threshold, Some(3));
    assert_eq!(probe.period_seconds, Some(30));
    assert_eq!(
        pod_spec.init_containers.unwrap()[0].image,
        Some(cr.spec.container_image.clone())
    );
}
