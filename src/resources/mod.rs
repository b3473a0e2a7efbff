// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod env;
pub mod pod_spec;
pub mod stateful_set;
pub mod upsert;
