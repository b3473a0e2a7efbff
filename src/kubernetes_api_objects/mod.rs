// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod error;
pub mod object_ref;

pub use error::APIError;
pub use object_ref::{ObjectKey, ReconcileRequest};
