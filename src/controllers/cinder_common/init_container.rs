// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::resources::env::plain_env;
use k8s_openapi::api::core::v1::{
    Container, EnvVar, EnvVarSource, SecretKeySelector, SecurityContext, VolumeMount,
};

pub const INIT_SCRIPT: &str = "/usr/local/bin/container-scripts/init.sh";
pub const DATABASE_USER: &str = "cinder";
pub const DATABASE_NAME: &str = "cinder";

/// Inputs of the init container that renders the service configuration.
#[derive(Debug, Clone)]
pub struct InitContainer<'a> {
    pub privileged: bool,
    pub container_image: &'a str,
    pub database_host: &'a str,
    pub cinder_secret: &'a str,
    pub nova_secret: &'a str,
    pub volume_mounts: Vec<VolumeMount>,
}

pub fn make_init_containers(init: InitContainer<'_>) -> Vec<Container> {
    let env = vec![
        plain_env("DatabaseHost", init.database_host),
        plain_env("DatabaseUser", DATABASE_USER),
        plain_env("DatabaseName", DATABASE_NAME),
        secret_env("DatabasePassword", init.cinder_secret, "CinderDatabasePassword"),
        secret_env("CinderKeystoneAuthPassword", init.cinder_secret, "CinderPassword"),
        secret_env("TransportURL", init.nova_secret, "TransportURL"),
    ];
    vec![Container {
        name: "init".to_string(),
        image: Some(init.container_image.to_string()),
        command: Some(vec!["/bin/bash".to_string(), "-c".to_string(), INIT_SCRIPT.to_string()]),
        security_context: Some(SecurityContext {
            privileged: Some(init.privileged),
            run_as_user: Some(0),
            ..SecurityContext::default()
        }),
        env: Some(env),
        volume_mounts: Some(init.volume_mounts),
        ..Container::default()
    }]
}

fn secret_env(name: &str, secret_name: &str, key: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: None,
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: Some(secret_name.to_string()),
                key: key.to_string(),
                optional: None,
            }),
            ..EnvVarSource::default()
        }),
    }
}
