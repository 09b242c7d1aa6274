//! `netfacts` - assembles the network fact tree from captured command output.
//!
//! The out-of-scope collector captures each diagnostic command's output into
//! a spool directory, one file per command (`devices`, `default-route`,
//! `routes-inet`, `routes-inet6`, `arp`, plus `ifconfig.<name>` and
//! `hwaddr.<name>` per interface). This binary loads configuration, reads the
//! spool, runs the parsing engine, and prints the fact tree as JSON.
//!
//! # Usage
//!
//! ```sh
//! cargo run -- -c path/to/config.toml
//! ```

mod settings;

use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result};
use clap::Parser;
use netfacts::NetworkDumps;
use settings::{Args, Config};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes tracing/logging infrastructure.
///
/// With a configured log path, logs go through a non-blocking file appender;
/// otherwise they go to stderr so stdout stays clean for the fact JSON. The
/// log level can be controlled via the `RUST_LOG` environment variable,
/// defaulting to INFO.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or created.
fn init_tracing(log_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if let Some(path) = log_path {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open the log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        tracing_subscriber::Registry::default()
            .with(
                fmt::Layer::default()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(non_blocking)
                    .with_filter(env_filter),
            )
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::Registry::default()
            .with(
                fmt::Layer::default()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_filter(env_filter),
            )
            .init();
        Ok(None)
    }
}

/// Reads one capture file; a missing or unreadable file is an empty input,
/// not a failure.
fn read_capture(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::debug!("no capture at {}: {e}", path.display());
            String::new()
        }
    }
}

/// Reads the spool directory into one input batch. Per-interface captures are
/// ordered by interface name so repeated runs see the same batch.
///
/// # Errors
///
/// Returns an error if the spool directory itself cannot be listed.
fn read_dumps(dir: &Path) -> Result<NetworkDumps> {
    let mut dumps = NetworkDumps {
        default_route: read_capture(&dir.join("default-route")),
        devices: read_capture(&dir.join("devices")),
        routes_inet: read_capture(&dir.join("routes-inet")),
        routes_inet6: read_capture(&dir.join("routes-inet6")),
        arp: read_capture(&dir.join("arp")),
        ..NetworkDumps::default()
    };

    let mut ifconfig_paths: Vec<(String, PathBuf)> = Vec::new();
    let mut hardware_paths: Vec<(String, PathBuf)> = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read the spool directory: {}", dir.display()))?;
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(name) = file_name.strip_prefix("ifconfig.") {
            ifconfig_paths.push((name.to_string(), path));
        } else if let Some(name) = file_name.strip_prefix("hwaddr.") {
            hardware_paths.push((name.to_string(), path));
        }
    }
    ifconfig_paths.sort();
    hardware_paths.sort();

    for (name, path) in ifconfig_paths {
        dumps.ifconfig.push((name, read_capture(&path)));
    }
    for (name, path) in hardware_paths {
        dumps.hardware.push((name, read_capture(&path)));
    }

    Ok(dumps)
}

fn main() {
    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", args.config.display());
            process::exit(1);
        }
    };

    let _guard = match init_tracing(config.log_path.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize tracing: {e}");
            process::exit(1);
        }
    };

    tracing::info!("Loaded config from: {:?}", args.config);

    let dumps = match read_dumps(&config.dump_dir) {
        Ok(dumps) => dumps,
        Err(e) => {
            tracing::error!("{e:#}");
            process::exit(1);
        }
    };

    let facts = netfacts::collect(&dumps);
    tracing::info!(
        "collected facts for {} interfaces, {} arp entries",
        facts.interfaces.len(),
        facts.arp.len()
    );

    match serde_json::to_string_pretty(&facts) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("Failed to serialize facts: {e}");
            process::exit(1);
        }
    }
}
