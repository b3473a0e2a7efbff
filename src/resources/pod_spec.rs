// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use k8s_openapi::api::core::v1::{Container, PodSpec, Probe, Volume};

/// Writes the fields the controller owns from `desired` onto the pod spec
/// fetched from the store.
///
/// Everything else on the fetched spec is left alone. The API server fills in
/// defaults such as `restartPolicy`, `dnsPolicy` or a container's
/// `imagePullPolicy` on admission, and they must survive so that a pass with
/// nothing to change produces an object equal to the fetched one.
///
/// Containers, init containers and volumes are matched by name. The desired
/// lists decide which entries exist and in what order.
pub fn apply_pod_spec(found: Option<PodSpec>, desired: PodSpec) -> PodSpec {
    let mut pod_spec = match found {
        Some(pod_spec) => pod_spec,
        None => return desired,
    };
    pod_spec.service_account_name = desired.service_account_name;

    let found_containers = std::mem::take(&mut pod_spec.containers);
    pod_spec.containers = apply_by_name(found_containers, desired.containers, container_name, apply_container);

    let found_init_containers = pod_spec.init_containers.take().unwrap_or_default();
    pod_spec.init_containers = desired
        .init_containers
        .map(|init_containers| apply_by_name(found_init_containers, init_containers, container_name, apply_container));

    let found_volumes = pod_spec.volumes.take().unwrap_or_default();
    pod_spec.volumes = desired
        .volumes
        .map(|volumes| apply_by_name(found_volumes, volumes, volume_name, apply_volume));

    pod_spec
}

fn apply_by_name<T>(mut found: Vec<T>, desired: Vec<T>, name: fn(&T) -> &str, apply: fn(T, T) -> T) -> Vec<T> {
    desired
        .into_iter()
        .map(|item| match found.iter().position(|candidate| name(candidate) == name(&item)) {
            Some(index) => apply(found.remove(index), item),
            None => item,
        })
        .collect()
}

fn container_name(container: &Container) -> &str {
    &container.name
}

fn volume_name(volume: &Volume) -> &str {
    &volume.name
}

fn apply_container(found: Container, desired: Container) -> Container {
    Container {
        image: desired.image,
        command: desired.command,
        args: desired.args,
        env: desired.env,
        volume_mounts: desired.volume_mounts,
        security_context: desired.security_context,
        readiness_probe: apply_probe(found.readiness_probe, desired.readiness_probe),
        liveness_probe: apply_probe(found.liveness_probe, desired.liveness_probe),
        ..found
    }
}

// successThreshold and failureThreshold are defaulted by the server.
fn apply_probe(found: Option<Probe>, desired: Option<Probe>) -> Option<Probe> {
    match (found, desired) {
        (Some(found), Some(desired)) => Some(Probe {
            exec: desired.exec,
            http_get: desired.http_get,
            tcp_socket: desired.tcp_socket,
            grpc: desired.grpc,
            initial_delay_seconds: desired.initial_delay_seconds,
            period_seconds: desired.period_seconds,
            timeout_seconds: desired.timeout_seconds,
            ..found
        }),
        (_, desired) => desired,
    }
}

fn apply_volume(found: Volume, mut desired: Volume) -> Volume {
    if let (Some(host_path), Some(found_host_path)) = (desired.host_path.as_mut(), found.host_path) {
        if host_path.type_.is_none() {
            host_path.type_ = found_host_path.type_;
        }
    }
    desired
}
