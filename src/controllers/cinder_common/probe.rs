// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use k8s_openapi::api::core::v1::{ExecAction, Probe};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeType {
    Readiness,
    Liveness,
}

impl fmt::Display for ProbeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeType::Readiness => write!(f, "readiness"),
            ProbeType::Liveness => write!(f, "liveness"),
        }
    }
}

/// The service image answers probes through its healthcheck script.
pub fn make_probe(probe_type: ProbeType) -> Probe {
    let (initial_delay_seconds, period_seconds, timeout_seconds) = match probe_type {
        ProbeType::Readiness => (5, 15, 3),
        ProbeType::Liveness => (30, 30, 5),
    };
    Probe {
        exec: Some(ExecAction {
            command: Some(vec!["/openstack/healthcheck".to_string(), probe_type.to_string()]),
        }),
        initial_delay_seconds: Some(initial_delay_seconds),
        period_seconds: Some(period_seconds),
        timeout_seconds: Some(timeout_seconds),
        ..Probe::default()
    }
}
