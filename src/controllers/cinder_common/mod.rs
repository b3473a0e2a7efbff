// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT

//! Pod building blocks shared by the Cinder service controllers.
pub mod init_container;
pub mod probe;
pub mod volumes;

use std::collections::BTreeMap;

pub use init_container::{make_init_containers, InitContainer};
pub use probe::{make_probe, ProbeType};
pub use volumes::{make_init_volume_mounts, make_volume_mounts, make_volumes};

/// Labels identifying the pods of one service of one descriptor.
pub fn make_labels(cr_name: &str, app_label: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("app".to_string(), app_label.to_string()),
        ("cr".to_string(), cr_name.to_string()),
    ])
}
