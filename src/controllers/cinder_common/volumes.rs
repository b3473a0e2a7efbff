// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use k8s_openapi::api::core::v1::{
    ConfigMapVolumeSource, EmptyDirVolumeSource, HostPathVolumeSource, Volume, VolumeMount,
};

const SCRIPTS_MODE: i32 = 0o755;
const CONFIG_MODE: i32 = 0o644;

pub fn make_volumes(managing_cr_name: &str) -> Vec<Volume> {
    vec![
        Volume {
            name: "etc-machine-id".to_string(),
            host_path: Some(HostPathVolumeSource {
                path: "/etc/machine-id".to_string(),
                type_: None,
            }),
            ..Volume::default()
        },
        config_map_volume("scripts", &format!("{}-scripts", managing_cr_name), SCRIPTS_MODE),
        config_map_volume("config-data", &format!("{}-config-data", managing_cr_name), CONFIG_MODE),
        config_map_volume(
            "config-data-custom",
            &format!("{}-config-data-custom", managing_cr_name),
            CONFIG_MODE,
        ),
        Volume {
            name: "config-data-merged".to_string(),
            empty_dir: Some(EmptyDirVolumeSource {
                medium: Some("Memory".to_string()),
                size_limit: None,
            }),
            ..Volume::default()
        },
    ]
}

fn config_map_volume(name: &str, config_map_name: &str, default_mode: i32) -> Volume {
    Volume {
        name: name.to_string(),
        config_map: Some(ConfigMapVolumeSource {
            name: Some(config_map_name.to_string()),
            default_mode: Some(default_mode),
            ..ConfigMapVolumeSource::default()
        }),
        ..Volume::default()
    }
}

/// Mounts of the service container.
pub fn make_volume_mounts() -> Vec<VolumeMount> {
    vec![
        mount("etc-machine-id", "/etc/machine-id", true),
        mount("scripts", "/usr/local/bin/container-scripts", true),
        mount("config-data-merged", "/var/lib/config-data/merged", false),
    ]
}

/// Mounts of the init container, which renders the merged configuration.
pub fn make_init_volume_mounts() -> Vec<VolumeMount> {
    vec![
        mount("scripts", "/usr/local/bin/container-scripts", true),
        mount("config-data", "/var/lib/config-data/default", true),
        mount("config-data-custom", "/var/lib/config-data/custom", true),
        mount("config-data-merged", "/var/lib/config-data/merged", false),
    ]
}

fn mount(name: &str, mount_path: &str, read_only: bool) -> VolumeMount {
    VolumeMount {
        name: name.to_string(),
        mount_path: mount_path.to_string(),
        read_only: Some(read_only),
        ..VolumeMount::default()
    }
}
