// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::kubernetes_api_objects::ObjectKey;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(5);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(1000);

/// ItemBackoff tracks consecutive failures per key and turns them into an
/// exponentially growing requeue delay.
#[derive(Debug)]
pub struct ItemBackoff {
    base_delay: Duration,
    max_delay: Duration,
    failures: Mutex<HashMap<ObjectKey, u32>>,
}

impl Default for ItemBackoff {
    fn default() -> ItemBackoff {
        ItemBackoff::new(DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY)
    }
}

impl ItemBackoff {
    pub fn new(base_delay: Duration, max_delay: Duration) -> ItemBackoff {
        ItemBackoff {
            base_delay,
            max_delay,
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Records one more failure of `key` and returns how long to wait before retrying.
    pub fn next_delay(&self, key: &ObjectKey) -> Duration {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        let count = failures.entry(key.clone()).or_insert(0);
        let exponent = *count;
        *count = count.saturating_add(1);
        self.base_delay
            .saturating_mul(2u32.saturating_pow(exponent))
            .min(self.max_delay)
    }

    pub fn forget(&self, key: &ObjectKey) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    pub fn failures(&self, key: &ObjectKey) -> u32 {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(0)
    }
}
