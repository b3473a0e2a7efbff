// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::resources::upsert::*;
use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};

fn stateful_set(replicas: i32) -> StatefulSet {
    StatefulSet {
        metadata: ObjectMeta {
            name: Some("cinder-scheduler".to_string()),
            namespace: Some("openstack".to_string()),
            resource_version: Some("7".to_string()),
            ..ObjectMeta::default()
        },
        spec: Some(StatefulSetSpec {
            replicas: Some(replicas),
            ..StatefulSetSpec::default()
        }),
        status: None,
    }
}

fn owner_ref(name: &str, uid: &str) -> OwnerReference {
    OwnerReference {
        api_version: "cinder.openstack.org/v1beta1".to_string(),
        kind: "CinderScheduler".to_string(),
        name: name.to_string(),
        uid: uid.to_string(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    }
}

#[test]
pub fn test_plan_upsert() {
    println!("Testing plan_upsert()...");
    assert_eq!(plan_upsert(None, stateful_set(1)), UpsertPlan::Create(stateful_set(1)));
    assert_eq!(plan_upsert(Some(stateful_set(1)), stateful_set(1)), UpsertPlan::Unchanged);
    assert_eq!(
        plan_upsert(Some(stateful_set(1)), stateful_set(2)),
        UpsertPlan::Update(stateful_set(2))
    );
}

#[test]
pub fn test_set_owner_reference_replaces_existing_owners() {
    println!("Testing set_owner_reference()...");
    let mut obj = stateful_set(1);
    obj.metadata.owner_references = Some(vec![owner_ref("stale", "uid-0"), owner_ref("other", "uid-9")]);
    set_owner_reference(&mut obj, owner_ref("cinder-scheduler", "uid-1"));
    assert_eq!(obj.metadata.owner_references, Some(vec![owner_ref("cinder-scheduler", "uid-1")]));

    let once = obj.clone();
    set_owner_reference(&mut obj, owner_ref("cinder-scheduler", "uid-1"));
    assert_eq!(obj, once);
}

#[test]
pub fn test_upsert_outcome_display() {
    assert_eq!(UpsertOutcome::Created.to_string(), "created");
    assert_eq!(UpsertOutcome::Updated.to_string(), "updated");
    assert_eq!(UpsertOutcome::Unchanged.to_string(), "unchanged");
}
