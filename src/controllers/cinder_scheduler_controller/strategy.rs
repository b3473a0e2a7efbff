// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::controllers::cinder_common::{
    make_init_containers, make_init_volume_mounts, make_labels, make_probe, make_volume_mounts,
    make_volumes, InitContainer, ProbeType,
};
use crate::controllers::cinder_scheduler_controller::spec_types::CinderScheduler;
use crate::reconciler::artifact::ArtifactRef;
use crate::reconciler::strategy::WorkloadStrategy;
use k8s_openapi::api::core::v1::{Container, EnvVar, PodSpec};
use kube::ResourceExt;
use std::collections::BTreeMap;

pub const APP_LABEL: &str = "cinder-scheduler";
pub const CONTAINER_NAME: &str = "cinder-scheduler";
pub const SERVICE_ACCOUNT: &str = "cinder";
pub const KOLLA_CONFIG: &str = "/var/lib/config-data/merged/cinder-scheduler-config.json";

#[derive(Debug, Clone, Default)]
pub struct CinderSchedulerStrategy {}

impl WorkloadStrategy for CinderSchedulerStrategy {
    type K = CinderScheduler;

    fn required_artifacts(&self, cr: &CinderScheduler) -> Vec<ArtifactRef> {
        let managing_cr_name = &cr.spec.managing_cr_name;
        vec![
            ArtifactRef::secret(cr.spec.cinder_secret.clone()),
            ArtifactRef::secret(cr.spec.nova_secret.clone()),
            ArtifactRef::config_map(format!("{}-scripts", managing_cr_name)),
            ArtifactRef::config_map(format!("{}-config-data", managing_cr_name)),
            ArtifactRef::config_map(format!("{}-config-data-custom", managing_cr_name)),
        ]
    }

    fn make_labels(&self, cr: &CinderScheduler) -> BTreeMap<String, String> {
        make_labels(&cr.name_any(), APP_LABEL)
    }

    fn bootstrap_env(&self, _cr: &CinderScheduler) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("KOLLA_CONFIG_FILE".to_string(), KOLLA_CONFIG.to_string()),
            ("KOLLA_CONFIG_STRATEGY".to_string(), "COPY_ALWAYS".to_string()),
        ])
    }

    fn make_pod_spec(&self, cr: &CinderScheduler, env: Vec<EnvVar>) -> PodSpec {
        PodSpec {
            service_account_name: Some(SERVICE_ACCOUNT.to_string()),
            volumes: Some(make_volumes(&cr.spec.managing_cr_name)),
            containers: vec![Container {
                name: CONTAINER_NAME.to_string(),
                image: Some(cr.spec.container_image.clone()),
                readiness_probe: Some(make_probe(ProbeType::Readiness)),
                liveness_probe: Some(make_probe(ProbeType::Liveness)),
                env: Some(env),
                volume_mounts: Some(make_volume_mounts()),
                ..Container::default()
            }],
            init_containers: Some(make_init_containers(InitContainer {
                privileged: true,
                container_image: &cr.spec.container_image,
                database_host: &cr.spec.database_hostname,
                cinder_secret: &cr.spec.cinder_secret,
                nova_secret: &cr.spec.nova_secret,
                volume_mounts: make_init_volume_mounts(),
            })),
            ..PodSpec::default()
        }
    }
}
