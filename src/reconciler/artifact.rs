// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use std::collections::BTreeMap;
use std::fmt;

/// The kinds of configuration artifacts a descriptor can depend on.
/// Artifacts are owned by someone else; the controller only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    ConfigMap,
    Secret,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::ConfigMap => write!(f, "ConfigMap"),
            ArtifactKind::Secret => write!(f, "Secret"),
        }
    }
}

/// ArtifactRef names an artifact in the descriptor's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRef {
    pub kind: ArtifactKind,
    pub name: String,
}

impl ArtifactRef {
    pub fn config_map(name: impl Into<String>) -> ArtifactRef {
        ArtifactRef {
            kind: ArtifactKind::ConfigMap,
            name: name.into(),
        }
    }

    pub fn secret(name: impl Into<String>) -> ArtifactRef {
        ArtifactRef {
            kind: ArtifactKind::Secret,
            name: name.into(),
        }
    }
}

/// ResolvedArtifact is the key/value content of an artifact that was found in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub kind: ArtifactKind,
    pub name: String,
    pub contents: BTreeMap<String, Vec<u8>>,
}

impl ResolvedArtifact {
    pub fn from_config_map(name: &str, config_map: &ConfigMap) -> ResolvedArtifact {
        let mut contents = BTreeMap::new();
        if let Some(data) = &config_map.data {
            for (key, value) in data {
                contents.insert(key.clone(), value.as_bytes().to_vec());
            }
        }
        if let Some(binary_data) = &config_map.binary_data {
            for (key, value) in binary_data {
                contents.insert(key.clone(), value.0.clone());
            }
        }
        ResolvedArtifact {
            kind: ArtifactKind::ConfigMap,
            name: name.to_string(),
            contents,
        }
    }

    pub fn from_secret(name: &str, secret: &Secret) -> ResolvedArtifact {
        let mut contents = BTreeMap::new();
        if let Some(data) = &secret.data {
            for (key, value) in data {
                contents.insert(key.clone(), value.0.clone());
            }
        }
        // stringData is merged into data by the API server, with stringData taking precedence
        if let Some(string_data) = &secret.string_data {
            for (key, value) in string_data {
                contents.insert(key.clone(), value.as_bytes().to_vec());
            }
        }
        ResolvedArtifact {
            kind: ArtifactKind::Secret,
            name: name.to_string(),
            contents,
        }
    }
}
