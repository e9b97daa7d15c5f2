//! Single-task driver that owns a [`ToastController`].
//!
//! Producers (the bus client, a surface's input loop) talk to the runtime
//! through a cloneable [`ToastHandle`]. The runtime task interleaves their
//! commands with timer fires and finished clipboard writes, so every state
//! transition happens on one task in the order it was observed. Nothing the
//! loop does awaits anything but the next command or event.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use beacon_proto::NotificationEvent;

use crate::clipboard::ClipboardBridge;
use crate::controller::{ControllerEvent, PointerEvent, ToastController};
use crate::surface::{Surface, ToastId};

/// Work submitted to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastCommand {
	/// Show a toast for an event.
	Spawn(NotificationEvent),
	/// Route pointer input to a toast.
	Pointer(ToastId, PointerEvent),
}

/// The runtime task has exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("toast runtime has stopped")]
pub struct RuntimeStopped;

/// Cloneable sender side of a [`ToastRuntime`].
#[derive(Debug, Clone)]
pub struct ToastHandle {
	commands: mpsc::UnboundedSender<ToastCommand>,
}

impl ToastHandle {
	/// Queues a toast for `event`.
	///
	/// # Errors
	///
	/// Returns [`RuntimeStopped`] if the runtime has exited.
	pub fn spawn(&self, event: NotificationEvent) -> Result<(), RuntimeStopped> {
		self.send(ToastCommand::Spawn(event))
	}

	/// Queues pointer input for toast `id`.
	///
	/// # Errors
	///
	/// Returns [`RuntimeStopped`] if the runtime has exited.
	pub fn pointer(&self, id: ToastId, event: PointerEvent) -> Result<(), RuntimeStopped> {
		self.send(ToastCommand::Pointer(id, event))
	}

	fn send(&self, command: ToastCommand) -> Result<(), RuntimeStopped> {
		self.commands.send(command).map_err(|_| RuntimeStopped)
	}
}

enum Step {
	Shutdown,
	Command(ToastCommand),
	Closed,
	Event(ControllerEvent),
}

/// Owns a controller and its command queue.
pub struct ToastRuntime<S, C> {
	controller: ToastController<S, C>,
	commands: mpsc::UnboundedReceiver<ToastCommand>,
	shutdown: CancellationToken,
}

impl<S, C> ToastRuntime<S, C>
where
	S: Surface + Send + 'static,
	C: ClipboardBridge + 'static,
{
	/// Wraps `controller`; returns the runtime and the handle feeding it.
	pub fn new(controller: ToastController<S, C>, shutdown: CancellationToken) -> (Self, ToastHandle) {
		let (tx, rx) = mpsc::unbounded_channel();
		let runtime = Self {
			controller,
			commands: rx,
			shutdown,
		};
		(runtime, ToastHandle { commands: tx })
	}

	/// Spawns the runtime on the current tokio runtime.
	pub fn start(controller: ToastController<S, C>, shutdown: CancellationToken) -> (ToastHandle, JoinHandle<()>) {
		let (runtime, handle) = Self::new(controller, shutdown);
		(handle, tokio::spawn(runtime.run()))
	}

	/// Processes commands and timers.
	///
	/// Returns when `shutdown` fires, or once every handle is dropped and all
	/// pending toasts, tooltips, and copies have run their course.
	pub async fn run(mut self) {
		let mut open = true;
		loop {
			let pending = self.controller.has_pending_work();
			if !open && !pending {
				break;
			}

			let step = tokio::select! {
				biased;
				() = self.shutdown.cancelled() => Step::Shutdown,
				command = self.commands.recv(), if open => match command {
					Some(command) => Step::Command(command),
					None => Step::Closed,
				},
				Some(event) = self.controller.next_event(), if pending => Step::Event(event),
			};

			match step {
				Step::Shutdown => {
					tracing::debug!(live = self.controller.len(), "toast_runtime.shutdown");
					break;
				}
				Step::Closed => {
					tracing::debug!(live = self.controller.len(), "toast_runtime.handles_dropped");
					open = false;
				}
				Step::Command(ToastCommand::Spawn(event)) => {
					self.controller.spawn(event);
				}
				Step::Command(ToastCommand::Pointer(id, event)) => self.controller.handle_pointer(id, event),
				Step::Event(event) => self.controller.apply(event),
			}
		}
		tracing::debug!("toast_runtime.stopped");
	}
}
