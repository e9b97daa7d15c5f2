//! `beacon serve`: run the bus and publish events typed on stdin.

use std::io::BufRead;

use anyhow::Context;
use beacon_bus::{NotificationBus, Notifier};
use tokio_util::sync::CancellationToken;

use crate::input::parse_event;

/// Serves the bus on `port` until `shutdown` fires.
pub async fn run(port: u16, shutdown: CancellationToken) -> anyhow::Result<()> {
	let bus = NotificationBus::new();
	let (addr, server) = bus
		.start(port, shutdown.clone())
		.await
		.with_context(|| format!("failed to bind notification bus on port {port}"))?;
	tracing::info!(%addr, "bus ready; type `ok <message>` or `fail <message>`");

	// A blocking stdin read cannot be cancelled, so it lives on a detached thread.
	let notifier = bus.notifier();
	std::thread::Builder::new()
		.name("beacon-stdin".into())
		.spawn(move || publish_lines(std::io::stdin().lock(), &notifier))?;

	server.await??;
	Ok(())
}

fn publish_lines(input: impl BufRead, notifier: &Notifier) {
	for line in input.lines() {
		let line = match line {
			Ok(line) => line,
			Err(error) => {
				tracing::warn!(%error, "stdin read failed");
				break;
			}
		};
		match parse_event(&line) {
			Ok(Some(event)) => {
				let delivery = notifier.notify(event.success, event.message);
				tracing::info!(?delivery, "published");
			}
			Ok(None) => {}
			Err(error) => tracing::warn!(%error, "ignored input line"),
		}
	}
	tracing::debug!("stdin closed; bus keeps serving until interrupted");
}
