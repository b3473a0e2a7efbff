// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::kubernetes_api_objects::{APIError, ObjectKey};
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::{Resource, ResourceExt};

/// StoreRequest is what reconcile_core asks the shim layer to send to the backing store.
/// At most one request is in flight in a reconcile pass.
#[derive(Debug, Clone)]
pub enum StoreRequest<K> {
    GetConfigMap(ObjectKey),
    GetSecret(ObjectKey),
    UpdateStatus(K),
    GetStatefulSet(ObjectKey),
    CreateStatefulSet(StatefulSet),
    UpdateStatefulSet(StatefulSet),
}

/// StoreResponse carries the result of the previous StoreRequest back to reconcile_core.
#[derive(Debug, Clone)]
pub enum StoreResponse<K> {
    GetConfigMap(Result<ConfigMap, APIError>),
    GetSecret(Result<Secret, APIError>),
    UpdateStatus(Result<K, APIError>),
    GetStatefulSet(Result<StatefulSet, APIError>),
    CreateStatefulSet(Result<StatefulSet, APIError>),
    UpdateStatefulSet(Result<StatefulSet, APIError>),
}

impl<K: Resource<DynamicType = ()>> StoreRequest<K> {
    pub fn verb(&self) -> &'static str {
        match self {
            StoreRequest::GetConfigMap(_)
            | StoreRequest::GetSecret(_)
            | StoreRequest::GetStatefulSet(_) => "Get",
            StoreRequest::UpdateStatus(_) => "UpdateStatus",
            StoreRequest::CreateStatefulSet(_) => "Create",
            StoreRequest::UpdateStatefulSet(_) => "Update",
        }
    }

    /// A "Kind/namespace/name" string for logging.
    pub fn key(&self) -> String {
        match self {
            StoreRequest::GetConfigMap(key) => format!("ConfigMap/{}", key),
            StoreRequest::GetSecret(key) => format!("Secret/{}", key),
            StoreRequest::GetStatefulSet(key) => format!("StatefulSet/{}", key),
            StoreRequest::UpdateStatus(cr) => format!(
                "{}/{}/{}",
                K::kind(&()),
                cr.namespace().unwrap_or_default(),
                cr.name_any()
            ),
            StoreRequest::CreateStatefulSet(sts) | StoreRequest::UpdateStatefulSet(sts) => {
                format!(
                    "StatefulSet/{}/{}",
                    sts.namespace().unwrap_or_default(),
                    sts.name_any()
                )
            }
        }
    }
}

impl<K> StoreResponse<K> {
    pub fn error(&self) -> Option<APIError> {
        match self {
            StoreResponse::GetConfigMap(res) => res.as_ref().err().copied(),
            StoreResponse::GetSecret(res) => res.as_ref().err().copied(),
            StoreResponse::UpdateStatus(res) => res.as_ref().err().copied(),
            StoreResponse::GetStatefulSet(res) => res.as_ref().err().copied(),
            StoreResponse::CreateStatefulSet(res) => res.as_ref().err().copied(),
            StoreResponse::UpdateStatefulSet(res) => res.as_ref().err().copied(),
        }
    }
}
