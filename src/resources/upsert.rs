// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use std::fmt;

/// What a successful upsert did to the managed object. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Unchanged,
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertOutcome::Created => write!(f, "created"),
            UpsertOutcome::Updated => write!(f, "updated"),
            UpsertOutcome::Unchanged => write!(f, "unchanged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpsertPlan {
    Create(StatefulSet),
    Update(StatefulSet),
    Unchanged,
}

/// Decides which write, if any, brings the store to `desired`.
///
/// `desired` for an existing object is derived from the fetched object, so it
/// still carries the fetched resource version and the update is rejected if
/// someone else wrote in between.
pub fn plan_upsert(found: Option<StatefulSet>, desired: StatefulSet) -> UpsertPlan {
    match found {
        None => UpsertPlan::Create(desired),
        Some(found) if found == desired => UpsertPlan::Unchanged,
        Some(_) => UpsertPlan::Update(desired),
    }
}

/// Makes `owner_ref` the one and only owner of `obj`.
pub fn set_owner_reference(obj: &mut StatefulSet, owner_ref: OwnerReference) {
    obj.metadata.owner_references = Some(vec![owner_ref]);
}
