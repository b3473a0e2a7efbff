// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod spec_types;
pub mod strategy;

use crate::type_registry::{RegistryError, TypeRegistry};
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};

pub use spec_types::{CinderScheduler, CinderSchedulerSpec, CinderSchedulerStatus};
pub use strategy::CinderSchedulerStrategy;

/// Registers every type the CinderScheduler controller reads or writes.
pub fn register_types(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
    registry.register::<CinderScheduler>()?;
    registry.register::<StatefulSet>()?;
    registry.register::<ConfigMap>()?;
    registry.register::<Secret>()?;
    Ok(())
}
