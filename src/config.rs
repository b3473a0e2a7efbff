// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use clap::{Args, Parser, Subcommand};
use k8s_openapi::NamespaceResourceScope;
use kube::{Api, Client, Resource};
use std::env;
use thiserror::Error;

/// WATCH_NAMESPACE selects the namespace to watch; an empty value means the
/// controller runs with cluster scope.
pub const WATCH_NAMESPACE_ENV: &str = "WATCH_NAMESPACE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingWatchNamespace(&'static str),
    #[error("{0} is not valid unicode")]
    InvalidWatchNamespace(&'static str),
}

#[derive(Debug, Parser)]
#[command(name = "cinder-scheduler-controller", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the CinderScheduler custom resource definition
    Export,
    /// Run the controller
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// The address the metric endpoint binds to.
    #[arg(long = "metrics-addr", default_value = ":8080")]
    pub metrics_addr: String,
    /// Enable leader election for controller manager.
    #[arg(long = "enable-leader-election", default_value_t = false)]
    pub enable_leader_election: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchScope {
    AllNamespaces,
    Namespace(String),
}

impl WatchScope {
    pub fn from_env() -> Result<WatchScope, ConfigError> {
        match env::var(WATCH_NAMESPACE_ENV) {
            Ok(value) => Ok(WatchScope::from_value(&value)),
            Err(env::VarError::NotPresent) => {
                Err(ConfigError::MissingWatchNamespace(WATCH_NAMESPACE_ENV))
            }
            Err(env::VarError::NotUnicode(_)) => {
                Err(ConfigError::InvalidWatchNamespace(WATCH_NAMESPACE_ENV))
            }
        }
    }

    pub fn from_value(value: &str) -> WatchScope {
        if value.is_empty() {
            WatchScope::AllNamespaces
        } else {
            WatchScope::Namespace(value.to_string())
        }
    }

    pub fn api<K>(&self, client: Client) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        match self {
            WatchScope::AllNamespaces => Api::all(client),
            WatchScope::Namespace(namespace) => Api::namespaced(client, namespace),
        }
    }
}
