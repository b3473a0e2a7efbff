// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::core::ApiResource;
use kube::Resource;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{0} is registered more than once")]
    DuplicateKind(String),
    #[error("{0} is not registered")]
    UnregisteredKind(String),
    #[error("owner object misses {0}")]
    MissingOwnerField(&'static str),
}

/// TypeRegistry records the API types the controller works with.
///
/// It is built once at startup and handed to every component that needs to
/// resolve a type, e.g., the upsert path that links a managed object to its
/// owner. Nothing in the crate keeps a process-wide registry.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: BTreeMap<(String, String), ApiResource>,
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry::default()
    }

    pub fn register<K>(&mut self) -> Result<(), RegistryError>
    where
        K: Resource<DynamicType = ()>,
    {
        let key = type_key::<K>();
        if self.types.contains_key(&key) {
            return Err(RegistryError::DuplicateKind(format!("{}/{}", key.0, key.1)));
        }
        self.types.insert(key, ApiResource::erase::<K>(&()));
        Ok(())
    }

    pub fn api_resource<K>(&self) -> Option<&ApiResource>
    where
        K: Resource<DynamicType = ()>,
    {
        self.types.get(&type_key::<K>())
    }

    pub fn is_registered<K>(&self) -> bool
    where
        K: Resource<DynamicType = ()>,
    {
        self.api_resource::<K>().is_some()
    }

    /// Returns the "apiVersion/kind" of every registered type, in order.
    pub fn registered_types(&self) -> Vec<String> {
        self.types
            .keys()
            .map(|(api_version, kind)| format!("{}/{}", api_version, kind))
            .collect()
    }

    /// Builds the controller owner reference pointing at `owner`.
    ///
    /// The owner's type must be registered and the owner must carry a name and
    /// a uid, which the store assigns on creation.
    pub fn controller_owner_ref<K>(&self, owner: &K) -> Result<OwnerReference, RegistryError>
    where
        K: Resource<DynamicType = ()>,
    {
        let api_resource = self.api_resource::<K>().ok_or_else(|| {
            let (api_version, kind) = type_key::<K>();
            RegistryError::UnregisteredKind(format!("{}/{}", api_version, kind))
        })?;
        let meta = owner.meta();
        let name = meta
            .name
            .clone()
            .ok_or(RegistryError::MissingOwnerField(".metadata.name"))?;
        let uid = meta
            .uid
            .clone()
            .ok_or(RegistryError::MissingOwnerField(".metadata.uid"))?;
        Ok(OwnerReference {
            api_version: api_resource.api_version.clone(),
            kind: api_resource.kind.clone(),
            name,
            uid,
            controller: Some(true),
            block_owner_deletion: Some(true),
        })
    }
}

fn type_key<K>() -> (String, String)
where
    K: Resource<DynamicType = ()>,
{
    (K::api_version(&()).to_string(), K::kind(&()).to_string())
}
