// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::reconciler::artifact::ResolvedArtifact;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Hash is a named content fingerprint of one input artifact.
/// The list of hashes is recorded in the descriptor's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Hash {
    pub name: String,
    pub hash: String,
}

/// Computes the fingerprint of an artifact's key/value contents.
///
/// Entries are visited in key order and every key and value is prefixed by its
/// length, so equal fingerprints imply equal contents regardless of how the
/// store ordered the keys.
pub fn fingerprint(contents: &BTreeMap<String, Vec<u8>>) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in contents {
        hasher.update((key.len() as u64).to_le_bytes());
        hasher.update(key.as_bytes());
        hasher.update((value.len() as u64).to_le_bytes());
        hasher.update(value);
    }
    hex::encode(hasher.finalize())
}

/// Returns one hash per artifact, in the order the artifacts were resolved.
pub fn compute_hashes(artifacts: &[ResolvedArtifact]) -> Vec<Hash> {
    artifacts
        .iter()
        .map(|artifact| Hash {
            name: artifact.name.clone(),
            hash: fingerprint(&artifact.contents),
        })
        .collect()
}

/// Turns hashes into environment variables of the primary container, so a content
/// change of any artifact becomes a change of the pod template.
pub fn hash_env_vars(hashes: &[Hash]) -> BTreeMap<String, String> {
    hashes
        .iter()
        .map(|hash| (hash.name.clone(), hash.hash.clone()))
        .collect()
}
