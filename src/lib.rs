// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod config;
pub mod controllers;
pub mod kubernetes_api_objects;
pub mod reconciler;
pub mod resources;
pub mod shim_layer;
pub mod store;
pub mod type_registry;
