// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use anyhow::Result;
use cinder_scheduler_controller::config::{Cli, Command, WatchScope};
use cinder_scheduler_controller::controllers::cinder_scheduler_controller::{
    register_types, CinderScheduler, CinderSchedulerStrategy,
};
use cinder_scheduler_controller::shim_layer::controller_runtime::run_controller;
use cinder_scheduler_controller::type_registry::TypeRegistry;
use clap::Parser;
use kube::CustomResourceExt;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Export => {
            info!("exporting custom resource definition");
            println!("{}", serde_yaml::to_string(&CinderScheduler::crd())?);
        }
        Command::Run(args) => {
            let scope = WatchScope::from_env().map_err(|err| {
                error!("unable to get WatchNamespace: {}", err);
                err
            })?;
            let mut registry = TypeRegistry::new();
            register_types(&mut registry).map_err(|err| {
                error!("unable to register types: {}", err);
                err
            })?;
            info!(
                metrics_addr = %args.metrics_addr,
                enable_leader_election = args.enable_leader_election,
                ?scope,
                types = ?registry.registered_types(),
                "running cinder-scheduler-controller"
            );
            if args.enable_leader_election {
                warn!("leader election is not performed by this process; run a single replica");
            }
            run_controller(CinderSchedulerStrategy::default(), scope, Arc::new(registry)).await?;
        }
    }
    Ok(())
}
