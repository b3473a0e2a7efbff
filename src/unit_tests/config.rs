// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::config::*;
use clap::Parser;
use std::env;

#[test]
pub fn test_watch_scope_from_value() {
    println!("Testing WatchScope::from_value()...");
    assert_eq!(WatchScope::from_value(""), WatchScope::AllNamespaces);
    assert_eq!(
        WatchScope::from_value("openstack"),
        WatchScope::Namespace("openstack".to_string())
    );
}

#[test]
pub fn test_watch_scope_from_env() {
    println!("Testing WatchScope::from_env()...");
    env::remove_var(WATCH_NAMESPACE_ENV);
    assert_eq!(
        WatchScope::from_env(),
        Err(ConfigError::MissingWatchNamespace(WATCH_NAMESPACE_ENV))
    );
    env::set_var(WATCH_NAMESPACE_ENV, "");
    assert_eq!(WatchScope::from_env(), Ok(WatchScope::AllNamespaces));
    env::set_var(WATCH_NAMESPACE_ENV, "openstack");
    assert_eq!(
        WatchScope::from_env(),
        Ok(WatchScope::Namespace("openstack".to_string()))
    );
    env::remove_var(WATCH_NAMESPACE_ENV);
}

#[test]
pub fn test_parse_run_args() {
    let cli = Cli::parse_from(["cinder-scheduler-controller", "run"]);
    match cli.command {
        Command::Run(args) => {
            assert_eq!(args.metrics_addr, ":8080");
            assert!(!args.enable_leader_election);
        }
        Command::Export => panic!("expected run"),
    }

    let cli = Cli::parse_from([
        "cinder-scheduler-controller",
        "run",
        "--metrics-addr",
        ":9090",
        "--enable-leader-election",
    ]);
    match cli.command {
        Command::Run(args) => {
            assert_eq!(args.metrics_addr, ":9090");
            assert!(args.enable_leader_election);
        }
        Command::Export => panic!("expected run"),
    }
    assert!(Cli::try_parse_from(["cinder-scheduler-controller", "crash"]).is_err());
}
