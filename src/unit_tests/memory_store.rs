// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::controllers::cinder_scheduler_controller::CinderScheduler;
use crate::kubernetes_api_objects::{APIError, ObjectKey};
use crate::reconciler::hash_tracker::Hash;
use crate::reconciler::strategy::Descriptor;
use crate::store::{MemoryStore, ObjectStore};
use crate::unit_tests::fixtures::*;
use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use std::collections::BTreeMap;

fn stateful_set(app: &str) -> StatefulSet {
    StatefulSet {
        metadata: ObjectMeta {
            name: Some(NAME.to_string()),
            namespace: Some(NAMESPACE.to_string()),
            ..ObjectMeta::default()
        },
        spec: Some(StatefulSetSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(BTreeMap::from([("app".to_string(), app.to_string())])),
                ..LabelSelector::default()
            },
            ..StatefulSetSpec::default()
        }),
        status: None,
    }
}

#[tokio::test]
pub async fn test_create_stateful_set() {
    println!("Testing create_stateful_set()...");
    let store = MemoryStore::<CinderScheduler>::new();
    let created = store.create_stateful_set(&stateful_set("a")).await.unwrap();
    assert!(created.metadata.resource_version.is_some());
    assert!(created.metadata.uid.is_some());
    assert_eq!(store.get_stateful_set(&key()).await, Ok(created));
    assert_eq!(
        store.create_stateful_set(&stateful_set("a")).await,
        Err(APIError::ObjectAlreadyExists)
    );
    assert_eq!(store.stateful_set_writes(), 1);
}

#[tokio::test]
pub async fn test_update_stateful_set_with_stale_resource_version() {
    println!("Testing update_stateful_set()...");
    let store = MemoryStore::<CinderScheduler>::new();
    let created = store.create_stateful_set(&stateful_set("a")).await.unwrap();

    let mut first = created.clone();
    first.spec.as_mut().unwrap().replicas = Some(2);
    let updated = store.update_stateful_set(&first).await.unwrap();
    assert_ne!(updated.metadata.resource_version, created.metadata.resource_version);

    let mut stale = created;
    stale.spec.as_mut().unwrap().replicas = Some(3);
    assert_eq!(store.update_stateful_set(&stale).await, Err(APIError::Conflict));
    assert_eq!(store.stateful_set(&key()), Some(updated));
}

#[tokio::test]
pub async fn test_update_stateful_set_rejects_selector_change() {
    let store = MemoryStore::<CinderScheduler>::new();
    let created = store.create_stateful_set(&stateful_set("a")).await.unwrap();
    let mut changed = stateful_set("b");
    changed.metadata = created.metadata.clone();
    assert_eq!(store.update_stateful_set(&changed).await, Err(APIError::Invalid));
}

#[tokio::test]
pub async fn test_noop_update_keeps_resource_version() {
    let store = MemoryStore::<CinderScheduler>::new();
    let created = store.create_stateful_set(&stateful_set("a")).await.unwrap();
    let same = store.update_stateful_set(&created).await.unwrap();
    assert_eq!(same, created);
    assert_eq!(store.stateful_set_writes(), 1);
}

#[tokio::test]
pub async fn test_update_missing_stateful_set() {
    let store = MemoryStore::<CinderScheduler>::new();
    assert_eq!(
        store.update_stateful_set(&stateful_set("a")).await,
        Err(APIError::ObjectNotFound)
    );
    assert_eq!(
        store.get_stateful_set(&ObjectKey::new(NAMESPACE, "missing")).await,
        Err(APIError::ObjectNotFound)
    );
}

#[tokio::test]
pub async fn test_update_descriptor_status() {
    println!("Testing update_descriptor_status()...");
    let store = MemoryStore::<CinderScheduler>::new();
    let created = store
        .create_descriptor(&make_cinder_scheduler(NAMESPACE, NAME))
        .unwrap();

    let mut with_status = created.clone();
    let hashes = vec![Hash {
        name: "base-scripts".to_string(),
        hash: "abcd".to_string(),
    }];
    with_status.set_status_hashes(hashes.clone());
    // Only the status is written; a spec change in the request is ignored.
    with_status.spec.replicas = 5;
    let updated = store.update_descriptor_status(&with_status).await.unwrap();
    assert_eq!(updated.status_hashes(), hashes);
    assert_eq!(updated.spec.replicas, 1);

    // The same status again is accepted without a new resource version.
    let mut again = updated.clone();
    again.set_status_hashes(hashes);
    assert_eq!(store.update_descriptor_status(&again).await, Ok(updated));
    assert_eq!(store.status_writes(), 2);

    // The request still carries the resource version read before the first write.
    assert_eq!(
        store.update_descriptor_status(&with_status).await,
        Err(APIError::Conflict)
    );
}

#[tokio::test]
pub async fn test_update_descriptor_keeps_status() {
    let store = MemoryStore::<CinderScheduler>::new();
    let created = store
        .create_descriptor(&make_cinder_scheduler(NAMESPACE, NAME))
        .unwrap();
    let mut with_status = created.clone();
    with_status.set_status_hashes(vec![Hash {
        name: "a".to_string(),
        hash: "b".to_string(),
    }]);
    let with_status = store.update_descriptor_status(&with_status).await.unwrap();

    let mut scaled = with_status.clone();
    scaled.spec.replicas = 2;
    scaled.status = None;
    let updated = store.update_descriptor(&scaled).unwrap();
    assert_eq!(updated.spec.replicas, 2);
    assert_eq!(updated.status_hashes(), with_status.status_hashes());
    assert_eq!(store.get_descriptor(&key()).await, Ok(updated));
}
