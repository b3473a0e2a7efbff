// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::reconciler::hash_tracker::Hash;
use crate::reconciler::strategy::Descriptor;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(group = "cinder.openstack.org", version = "v1beta1", kind = "CinderScheduler")]
#[kube(shortname = "cindersched", namespaced, status = "CinderSchedulerStatus")]
#[kube(derive = "PartialEq")]
pub struct CinderSchedulerSpec {
    /// Name of the top-level Cinder resource; the shared config maps are named after it.
    #[serde(rename = "managingCrName")]
    pub managing_cr_name: String,
    #[serde(rename = "databaseHostname")]
    pub database_hostname: String,
    #[serde(rename = "containerImage")]
    pub container_image: String,
    #[serde(default = "default_replicas")]
    pub replicas: i32,
    /// Secret holding the database and keystone passwords of the service.
    #[serde(rename = "cinderSecret")]
    pub cinder_secret: String,
    /// Secret holding the transport URL of the compute service.
    #[serde(rename = "novaSecret")]
    pub nova_secret: String,
}

fn default_replicas() -> i32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct CinderSchedulerStatus {
    #[serde(default)]
    pub hashes: Vec<Hash>,
}

impl Descriptor for CinderScheduler {
    fn managing_cr_name(&self) -> &str {
        &self.spec.managing_cr_name
    }

    fn replicas(&self) -> i32 {
        self.spec.replicas
    }

    fn status_hashes(&self) -> Vec<Hash> {
        self.status
            .as_ref()
            .map(|status| status.hashes.clone())
            .unwrap_or_default()
    }

    fn set_status_hashes(&mut self, hashes: Vec<Hash>) {
        self.status.get_or_insert_with(CinderSchedulerStatus::default).hashes = hashes;
    }
}
