// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod cinder_common;
pub mod cinder_scheduler_controller;
