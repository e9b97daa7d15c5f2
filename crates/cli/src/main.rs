//! Beacon binary.
//!
//! `beacon serve` runs the notification bus and publishes events typed on
//! stdin. `beacon listen` subscribes to it and shows each event as a toast.

mod cli;
mod config;
mod input;
mod listen;
mod serve;
mod surface;

use std::path::PathBuf;

use clap::Parser;
use cli::{Cli, Command};
use config::Config;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = Config::load(cli.config.as_deref())?;
	let port = config.port(cli.command.port());

	let shutdown = CancellationToken::new();
	tokio::spawn({
		let shutdown = shutdown.clone();
		async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				info!("interrupted");
				shutdown.cancel();
			}
		}
	});

	match cli.command {
		Command::Serve { .. } => serve::run(port, shutdown).await,
		Command::Listen { .. } => listen::run(port, config.toast_options(), shutdown).await,
	}
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_env("BEACON_LOG").unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("beacon=debug,beacon_bus=debug,beacon_toast=debug,info")
			} else {
				EnvFilter::new("info")
			}
		})
	};

	// BEACON_LOG_DIR keeps stdout clean for toasts when debugging.
	if let Some(log_dir) = std::env::var("BEACON_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("beacon.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry().with(filter()).with(file_layer).init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter())
		.with_writer(std::io::stderr)
		.init();
}
