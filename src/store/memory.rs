// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::kubernetes_api_objects::{APIError, ObjectKey};
use crate::reconciler::strategy::Descriptor;
use crate::store::ObjectStore;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

// MemoryStore is an in-memory model of the API server, restricted to the kinds
// the controller touches. It assigns resource versions and uids, rejects
// stale writes with Conflict, keeps the selector of a StatefulSet immutable and
// does not bump the resource version of an update that changes nothing.
pub struct MemoryStore<K> {
    state: Mutex<MemoryState<K>>,
}

struct MemoryState<K> {
    descriptors: BTreeMap<ObjectKey, K>,
    config_maps: BTreeMap<ObjectKey, ConfigMap>,
    secrets: BTreeMap<ObjectKey, Secret>,
    stateful_sets: BTreeMap<ObjectKey, StatefulSet>,
    resource_version_counter: u64,
    uid_counter: u64,
    stateful_set_writes: u64,
    status_writes: u64,
}

impl<K> Default for MemoryStore<K> {
    fn default() -> MemoryStore<K> {
        MemoryStore {
            state: Mutex::new(MemoryState {
                descriptors: BTreeMap::new(),
                config_maps: BTreeMap::new(),
                secrets: BTreeMap::new(),
                stateful_sets: BTreeMap::new(),
                resource_version_counter: 1,
                uid_counter: 1,
                stateful_set_writes: 0,
                status_writes: 0,
            }),
        }
    }
}

impl<K> MemoryState<K> {
    fn next_resource_version(&mut self) -> String {
        let rv = self.resource_version_counter;
        self.resource_version_counter += 1;
        rv.to_string()
    }

    fn next_uid(&mut self) -> String {
        let uid = self.uid_counter;
        self.uid_counter += 1;
        format!("uid-{}", uid)
    }

    /// Stamps a new object the way the API server does on create.
    fn stamp_created(&mut self, meta: &mut ObjectMeta) {
        meta.resource_version = Some(self.next_resource_version());
        meta.uid = Some(self.next_uid());
    }
}

fn key_of(meta: &ObjectMeta) -> Result<ObjectKey, APIError> {
    match (&meta.namespace, &meta.name) {
        (Some(namespace), Some(name)) => Ok(ObjectKey::new(namespace.clone(), name.clone())),
        (_, None) => Err(APIError::Invalid),
        (None, _) => Err(APIError::BadRequest),
    }
}

/// An object can have at most one controller owner.
fn metadata_validity_check(meta: &ObjectMeta) -> Option<APIError> {
    let controller_refs = meta
        .owner_references
        .as_ref()
        .map(|refs| refs.iter().filter(|r| r.controller == Some(true)).count())
        .unwrap_or(0);
    if controller_refs > 1 {
        Some(APIError::Invalid)
    } else {
        None
    }
}

fn stateful_set_validity_check(obj: &StatefulSet) -> Option<APIError> {
    match obj.spec.as_ref().and_then(|spec| spec.replicas) {
        Some(replicas) if replicas < 0 => Some(APIError::Invalid),
        _ => None,
    }
}

fn stateful_set_transition_validity_check(obj: &StatefulSet, old_obj: &StatefulSet) -> Option<APIError> {
    let selector = obj.spec.as_ref().map(|spec| &spec.selector);
    let old_selector = old_obj.spec.as_ref().map(|spec| &spec.selector);
    if selector != old_selector {
        Some(APIError::Invalid)
    } else {
        None
    }
}

/// Resource version and uid must match the stored object when the request carries them.
fn update_admission_check(meta: &ObjectMeta, old_meta: &ObjectMeta) -> Option<APIError> {
    if meta.resource_version.is_some() && meta.resource_version != old_meta.resource_version {
        Some(APIError::Conflict)
    } else if meta.uid.is_some() && meta.uid != old_meta.uid {
        Some(APIError::InternalError)
    } else {
        None
    }
}

impl<K: Descriptor> MemoryStore<K> {
    pub fn new() -> MemoryStore<K> {
        MemoryStore::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState<K>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_descriptor(&self, cr: &K) -> Result<K, APIError> {
        let mut state = self.lock();
        let key = key_of(cr.meta())?;
        if state.descriptors.contains_key(&key) {
            return Err(APIError::ObjectAlreadyExists);
        }
        let mut created = cr.clone();
        state.stamp_created(created.meta_mut());
        state.descriptors.insert(key, created.clone());
        Ok(created)
    }

    /// Replaces the spec of a stored descriptor, keeping its status.
    pub fn update_descriptor(&self, cr: &K) -> Result<K, APIError> {
        let mut state = self.lock();
        let key = key_of(cr.meta())?;
        let old = state.descriptors.get(&key).cloned().ok_or(APIError::ObjectNotFound)?;
        if let Some(err) = update_admission_check(cr.meta(), old.meta()) {
            return Err(err);
        }
        let mut updated = cr.clone();
        updated.set_status_hashes(old.status_hashes());
        updated.meta_mut().uid = old.meta().uid.clone();
        updated.meta_mut().resource_version = Some(state.next_resource_version());
        state.descriptors.insert(key, updated.clone());
        Ok(updated)
    }

    pub fn delete_descriptor(&self, key: &ObjectKey) -> Option<K> {
        self.lock().descriptors.remove(key)
    }

    pub fn descriptor(&self, key: &ObjectKey) -> Option<K> {
        self.lock().descriptors.get(key).cloned()
    }

    /// Creates or overwrites a config map, as its owner would.
    pub fn put_config_map(&self, config_map: &ConfigMap) -> Result<ConfigMap, APIError> {
        let mut state = self.lock();
        let key = key_of(&config_map.metadata)?;
        let mut stored = config_map.clone();
        match state.config_maps.get(&key).map(|old| old.metadata.uid.clone()) {
            Some(uid) => {
                stored.metadata.uid = uid;
                stored.metadata.resource_version = Some(state.next_resource_version());
            }
            None => state.stamp_created(&mut stored.metadata),
        }
        state.config_maps.insert(key, stored.clone());
        Ok(stored)
    }

    pub fn delete_config_map(&self, key: &ObjectKey) -> Option<ConfigMap> {
        self.lock().config_maps.remove(key)
    }

    /// Creates or overwrites a secret, as its owner would.
    pub fn put_secret(&self, secret: &Secret) -> Result<Secret, APIError> {
        let mut state = self.lock();
        let key = key_of(&secret.metadata)?;
        let mut stored = secret.clone();
        match state.secrets.get(&key).map(|old| old.metadata.uid.clone()) {
            Some(uid) => {
                stored.metadata.uid = uid;
                stored.metadata.resource_version = Some(state.next_resource_version());
            }
            None => state.stamp_created(&mut stored.metadata),
        }
        state.secrets.insert(key, stored.clone());
        Ok(stored)
    }

    pub fn delete_secret(&self, key: &ObjectKey) -> Option<Secret> {
        self.lock().secrets.remove(key)
    }

    pub fn stateful_set(&self, key: &ObjectKey) -> Option<StatefulSet> {
        self.lock().stateful_sets.get(key).cloned()
    }

    /// Number of create and update requests that changed a StatefulSet.
    pub fn stateful_set_writes(&self) -> u64 {
        self.lock().stateful_set_writes
    }

    /// Number of accepted status update requests, including the ones that changed nothing.
    pub fn status_writes(&self) -> u64 {
        self.lock().status_writes
    }
}

#[async_trait]
impl<K: Descriptor> ObjectStore<K> for MemoryStore<K> {
    async fn get_descriptor(&self, key: &ObjectKey) -> Result<K, APIError> {
        self.lock().descriptors.get(key).cloned().ok_or(APIError::ObjectNotFound)
    }

    async fn update_descriptor_status(&self, cr: &K) -> Result<K, APIError> {
        let mut state = self.lock();
        let key = key_of(cr.meta())?;
        let old = state.descriptors.get(&key).cloned().ok_or(APIError::ObjectNotFound)?;
        if let Some(err) = update_admission_check(cr.meta(), old.meta()) {
            return Err(err);
        }
        state.status_writes += 1;
        if old.status_hashes() == cr.status_hashes() {
            return Ok(old);
        }
        let mut updated = old;
        updated.set_status_hashes(cr.status_hashes());
        updated.meta_mut().resource_version = Some(state.next_resource_version());
        state.descriptors.insert(key, updated.clone());
        Ok(updated)
    }

    async fn get_config_map(&self, key: &ObjectKey) -> Result<ConfigMap, APIError> {
        self.lock().config_maps.get(key).cloned().ok_or(APIError::ObjectNotFound)
    }

    async fn get_secret(&self, key: &ObjectKey) -> Result<Secret, APIError> {
        self.lock().secrets.get(key).cloned().ok_or(APIError::ObjectNotFound)
    }

    async fn get_stateful_set(&self, key: &ObjectKey) -> Result<StatefulSet, APIError> {
        self.lock().stateful_sets.get(key).cloned().ok_or(APIError::ObjectNotFound)
    }

    async fn create_stateful_set(&self, obj: &StatefulSet) -> Result<StatefulSet, APIError> {
        let mut state = self.lock();
        let key = key_of(&obj.metadata)?;
        if state.stateful_sets.contains_key(&key) {
            return Err(APIError::ObjectAlreadyExists);
        }
        if let Some(err) =
            metadata_validity_check(&obj.metadata).or_else(|| stateful_set_validity_check(obj))
        {
            return Err(err);
        }
        let mut created = obj.clone();
        created.status = None;
        state.stamp_created(&mut created.metadata);
        state.stateful_set_writes += 1;
        state.stateful_sets.insert(key, created.clone());
        Ok(created)
    }

    async fn update_stateful_set(&self, obj: &StatefulSet) -> Result<StatefulSet, APIError> {
        let mut state = self.lock();
        let key = key_of(&obj.metadata)?;
        let old = state.stateful_sets.get(&key).cloned().ok_or(APIError::ObjectNotFound)?;
        if let Some(err) = update_admission_check(&obj.metadata, &old.metadata) {
            return Err(err);
        }
        let mut updated = obj.clone();
        updated.metadata.resource_version = old.metadata.resource_version.clone();
        updated.metadata.uid = old.metadata.uid.clone();
        updated.status = old.status.clone();
        if updated == old {
            return Ok(old);
        }
        if let Some(err) = metadata_validity_check(&updated.metadata)
            .or_else(|| stateful_set_validity_check(&updated))
            .or_else(|| stateful_set_transition_validity_check(&updated, &old))
        {
            return Err(err);
        }
        updated.metadata.resource_version = Some(state.next_resource_version());
        state.stateful_set_writes += 1;
        state.stateful_sets.insert(key, updated.clone());
        Ok(updated)
    }
}
