//! `beacon listen`: subscribe to the bus and show toasts in this terminal.

use std::io::BufRead;

use beacon_bus::{ClientExit, NotificationClient};
use beacon_proto::loopback;
use beacon_toast::{SystemClipboard, ToastController, ToastHandle, ToastOptions, ToastRuntime};
use tokio_util::sync::CancellationToken;

use crate::input::parse_pointer;
use crate::surface::TerminalSurface;

/// Connects to the bus on `port` and renders toasts until the bus goes away
/// or `shutdown` fires.
pub async fn run(port: u16, options: ToastOptions, shutdown: CancellationToken) -> anyhow::Result<()> {
	let client = NotificationClient::connect(loopback(port)).await?;
	let controller = ToastController::new(TerminalSurface::new(std::io::stdout()), SystemClipboard, options);
	let (toasts, runtime) = ToastRuntime::start(controller, shutdown.clone());
	tracing::info!(
		addr = %client.addr(),
		"listening; type `hover <n>`, `leave <n>`, or `copy <n>` to interact"
	);

	let pointer = toasts.clone();
	std::thread::Builder::new()
		.name("beacon-stdin".into())
		.spawn(move || forward_pointer(std::io::stdin().lock(), &pointer))?;

	let exit = client
		.run(shutdown.clone(), move |event| {
			if toasts.spawn(event).is_err() {
				tracing::warn!("toast runtime stopped; event dropped");
			}
		})
		.await;
	if exit == ClientExit::Disconnected {
		tracing::info!("bus closed the connection; not reconnecting");
	}

	shutdown.cancel();
	runtime.await?;
	Ok(())
}

fn forward_pointer(input: impl BufRead, toasts: &ToastHandle) {
	for line in input.lines() {
		let Ok(line) = line else {
			break;
		};
		match parse_pointer(&line) {
			Ok(Some((id, event))) => {
				if toasts.pointer(id, event).is_err() {
					break;
				}
			}
			Ok(None) => {}
			Err(error) => tracing::warn!(%error, "ignored input line"),
		}
	}
}
