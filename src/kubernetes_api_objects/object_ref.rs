// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use kube::runtime::reflector::ObjectRef;
use kube::Resource;
use std::fmt;

/// ObjectKey identifies a namespaced object of a kind that is implied by the context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

/// ReconcileRequest asks the controller to run one reconcile pass for the
/// descriptor with the given namespace and name.
pub type ReconcileRequest = ObjectKey;

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> ObjectKey {
        ObjectKey {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Returns the key of a namespaced object, or None if the object misses
    /// its name or namespace.
    pub fn from_meta<K: Resource>(obj: &K) -> Option<ObjectKey> {
        let meta = obj.meta();
        Some(ObjectKey::new(meta.namespace.clone()?, meta.name.clone()?))
    }

    /// Returns the key an ObjectRef points to, or None for a cluster-scoped reference.
    pub fn from_object_ref<K: Resource>(obj_ref: &ObjectRef<K>) -> Option<ObjectKey> {
        Some(ObjectKey::new(obj_ref.namespace.clone()?, obj_ref.name.clone()))
    }

    pub fn into_object_ref<K>(self) -> ObjectRef<K>
    where
        K: Resource<DynamicType = ()>,
    {
        ObjectRef::new(&self.name).within(&self.namespace)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
