// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::kubernetes_api_objects::{APIError, ObjectKey};
use crate::reconciler::strategy::Descriptor;
use crate::store::ObjectStore;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, PostParams};
use kube::{Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

/// KubeStore sends every request to the Kubernetes API server.
/// Reads are quorum reads, never served from a cache.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> KubeStore {
        KubeStore { client }
    }

    fn api<R>(&self, namespace: &str) -> Api<R>
    where
        R: Resource<DynamicType = (), Scope = NamespaceResourceScope>,
    {
        Api::namespaced(self.client.clone(), namespace)
    }

    async fn get<R>(&self, key: &ObjectKey) -> Result<R, APIError>
    where
        R: Resource<DynamicType = (), Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
    {
        self.api::<R>(&key.namespace)
            .get(&key.name)
            .await
            .map_err(|err| translate_error("Get", &format!("{}/{}", R::kind(&()), key), err))
    }
}

fn translate_error(verb: &str, key: &str, err: kube::Error) -> APIError {
    debug!("{} {} failed with raw error: {:?}", verb, key, err);
    APIError::from(&err)
}

fn key_of<R: Resource>(obj: &R) -> Result<ObjectKey, APIError> {
    ObjectKey::from_meta(obj).ok_or(APIError::BadRequest)
}

#[async_trait]
impl<K: Descriptor> ObjectStore<K> for KubeStore {
    async fn get_descriptor(&self, key: &ObjectKey) -> Result<K, APIError> {
        self.get::<K>(key).await
    }

    async fn update_descriptor_status(&self, cr: &K) -> Result<K, APIError> {
        let key = key_of(cr)?;
        let data = serde_json::to_vec(cr).map_err(|err| {
            debug!("failed to serialize {}/{}: {}", K::kind(&()), key, err);
            APIError::BadRequest
        })?;
        self.api::<K>(&key.namespace)
            .replace_status(&key.name, &PostParams::default(), data)
            .await
            .map_err(|err| translate_error("UpdateStatus", &format!("{}/{}", K::kind(&()), key), err))
    }

    async fn get_config_map(&self, key: &ObjectKey) -> Result<ConfigMap, APIError> {
        self.get::<ConfigMap>(key).await
    }

    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, APIError> {
        self.get::<Secret>(key).await
    }

    async fn get_stateful_set(&self, key: &ObjectKey) -> Result<StatefulSet, APIError> {
        self.get::<StatefulSet>(key).await
    }

    async fn create_stateful_set(&self, obj: &StatefulSet) -> Result<StatefulSet, APIError> {
        let key = key_of(obj)?;
        self.api::<StatefulSet>(&key.namespace)
            .create(&PostParams::default(), obj)
            .await
            .map_err(|err| translate_error("Create", &format!("StatefulSet/{}", key), err))
    }

    async fn update_stateful_set(&self, obj: &StatefulSet) -> Result<StatefulSet, APIError> {
        let key = key_of(obj)?;
        self.api::<StatefulSet>(&key.namespace)
            .replace(&key.name, &PostParams::default(), obj)
            .await
            .map_err(|err| translate_error("Update", &format!("StatefulSet/{}", key), err))
    }
}
