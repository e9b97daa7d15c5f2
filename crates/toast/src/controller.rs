//! Per-notification toast lifecycle.
//!
//! Every toast walks `Entering -> Visible -> (HoverPaused <-> Visible) ->
//! Dismissing -> removed`. Each phase change is driven by either a pointer
//! event or one of three timers owned by the toast. Tooltips and clipboard
//! writes hang off pointer events but never feed back into the lifecycle.
//!
//! A click starts the clipboard write on its own task. Its result comes back
//! through [`ToastController::next_event`] like a timer fire, and only then
//! is the result tooltip shown.

use std::collections::HashMap;
use std::sync::Arc;

use beacon_proto::NotificationEvent;
use tokio::task::JoinSet;

use crate::clipboard::{ClipboardBridge, CopyOutcome, copy_and_report};
use crate::options::ToastOptions;
use crate::surface::{Element, ElementId, Point, Slide, Surface, ToastId, ToastView};
use crate::timer::{Fired, TimerHandle, Timers};
use crate::tooltip::{TooltipController, TooltipTimer};

/// Lifecycle phase of a live toast. Removed toasts have no phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
	/// Created off-screen, waiting for the enter delay.
	Entering,
	/// On-screen with the dismiss timer armed.
	Visible,
	/// On-screen under the pointer; no dismiss timer.
	HoverPaused,
	/// Sliding off-screen; removal is scheduled.
	Dismissing,
}

/// Pointer input routed to a single toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
	/// Pointer entered the toast.
	Enter {
		/// Pointer position.
		at: Point,
	},
	/// Pointer left the toast.
	Leave,
	/// Toast was clicked.
	Click {
		/// Pointer position.
		at: Point,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
	Enter,
	Dismiss,
	Remove,
}

/// Payload of a toast timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTimer {
	id: ToastId,
	stage: Stage,
}

/// A clipboard write started by a click has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyFinished {
	toast: ToastId,
	at: Point,
	outcome: CopyOutcome,
}

/// Something the controller was waiting on, ready to be passed to
/// [`ToastController::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
	/// A toast lifecycle timer.
	Toast(Fired<ToastTimer>),
	/// A tooltip stage timer.
	Tooltip(Fired<TooltipTimer>),
	/// A click-to-copy completed.
	Copy(CopyFinished),
}

#[derive(Debug)]
struct Toast {
	event: NotificationEvent,
	phase: ToastPhase,
	/// Pointer entered while still `Entering`.
	hover_pending: bool,
	enter_timer: Option<TimerHandle>,
	dismiss_timer: Option<TimerHandle>,
	remove_timer: Option<TimerHandle>,
}

impl Toast {
	fn slot(&mut self, stage: Stage) -> &mut Option<TimerHandle> {
		match stage {
			Stage::Enter => &mut self.enter_timer,
			Stage::Dismiss => &mut self.dismiss_timer,
			Stage::Remove => &mut self.remove_timer,
		}
	}
}

/// Owns every live toast, its timers, and the tooltips it spawns.
///
/// All mutation goes through `&mut self`; the controller is meant to be
/// driven by one task (see [`crate::ToastRuntime`]) that interleaves
/// [`next_event`](Self::next_event) with incoming commands.
pub struct ToastController<S, C> {
	surface: S,
	clipboard: Arc<C>,
	options: ToastOptions,
	toasts: HashMap<ToastId, Toast>,
	timers: Timers<ToastTimer>,
	tooltips: TooltipController,
	copies: JoinSet<CopyFinished>,
	next_id: u64,
}

impl<S: Surface, C: ClipboardBridge + 'static> ToastController<S, C> {
	/// Creates an empty controller rendering to `surface`.
	pub fn new(surface: S, clipboard: C, options: ToastOptions) -> Self {
		let tooltips = TooltipController::new(options.tooltip);
		Self {
			surface,
			clipboard: Arc::new(clipboard),
			options,
			toasts: HashMap::new(),
			timers: Timers::new(),
			tooltips,
			copies: JoinSet::new(),
			next_id: 0,
		}
	}

	/// Creates a toast for `event` off-screen and arms its enter timer.
	pub fn spawn(&mut self, event: NotificationEvent) -> ToastId {
		self.next_id += 1;
		let id = ToastId(self.next_id);
		let overflow = event.is_overflow();

		self.surface.create(
			ElementId::Toast(id),
			Element::Toast(ToastView {
				success: event.success,
				overflow,
				message: event.message.clone(),
			}),
		);
		let enter = self.timers.schedule(
			ToastTimer {
				id,
				stage: Stage::Enter,
			},
			self.options.timing.enter_delay,
		);

		tracing::debug!(toast = id.0, success = event.success, overflow, "toast.spawn");
		self.toasts.insert(
			id,
			Toast {
				event,
				phase: ToastPhase::Entering,
				hover_pending: false,
				enter_timer: Some(enter),
				dismiss_timer: None,
				remove_timer: None,
			},
		);
		id
	}

	/// Handles the pointer entering toast `id` at `at`.
	pub fn pointer_enter(&mut self, id: ToastId, at: Point) {
		let Some(toast) = self.toasts.get_mut(&id) else {
			tracing::trace!(toast = id.0, "toast.pointer_enter.ignored");
			return;
		};

		let show_hint = match toast.phase {
			ToastPhase::Entering if toast.hover_pending => false,
			ToastPhase::Entering => {
				toast.hover_pending = true;
				true
			}
			ToastPhase::Visible => {
				self.timers.cancel(&mut toast.dismiss_timer);
				toast.phase = ToastPhase::HoverPaused;
				tracing::trace!(toast = id.0, "toast.paused");
				true
			}
			ToastPhase::HoverPaused => false,
			ToastPhase::Dismissing => true,
		};

		if show_hint {
			let hint = self.options.labels.hint.clone();
			self.tooltips.show(&mut self.surface, at, hint);
		}
	}

	/// Handles the pointer leaving toast `id`.
	pub fn pointer_leave(&mut self, id: ToastId) {
		let Some(toast) = self.toasts.get_mut(&id) else {
			tracing::trace!(toast = id.0, "toast.pointer_leave.ignored");
			return;
		};

		match toast.phase {
			ToastPhase::Entering => toast.hover_pending = false,
			ToastPhase::HoverPaused => {
				toast.dismiss_timer = Some(self.timers.schedule(
					ToastTimer {
						id,
						stage: Stage::Dismiss,
					},
					self.options.timing.resume_dismiss,
				));
				toast.phase = ToastPhase::Visible;
				tracing::trace!(toast = id.0, "toast.resumed");
			}
			ToastPhase::Visible | ToastPhase::Dismissing => {}
		}
	}

	/// Starts copying the message of toast `id` on a separate task.
	///
	/// Returns false when the toast is already gone. The result tooltip is
	/// shown once the matching [`ControllerEvent::Copy`] is applied.
	/// Lifecycle timers are left untouched either way.
	pub fn click(&mut self, id: ToastId, at: Point) -> bool {
		let Some(toast) = self.toasts.get(&id) else {
			tracing::trace!(toast = id.0, "toast.click.ignored");
			return false;
		};
		let message = toast.event.message.clone();
		let clipboard = Arc::clone(&self.clipboard);

		self.copies.spawn(async move {
			let outcome = copy_and_report(&*clipboard, &message).await;
			CopyFinished { toast: id, at, outcome }
		});
		tracing::trace!(toast = id.0, in_flight = self.copies.len(), "toast.copy_started");
		true
	}

	/// Routes a pointer event to toast `id`.
	pub fn handle_pointer(&mut self, id: ToastId, event: PointerEvent) {
		match event {
			PointerEvent::Enter { at } => self.pointer_enter(id, at),
			PointerEvent::Leave => self.pointer_leave(id),
			PointerEvent::Click { at } => {
				self.click(id, at);
			}
		}
	}

	/// Waits for the next toast timer, tooltip timer, or finished copy.
	///
	/// Resolves to `None` immediately once nothing is pending.
	pub async fn next_event(&mut self) -> Option<ControllerEvent> {
		loop {
			let toasts_pending = !self.timers.is_empty();
			let tooltips_pending = self.tooltips.has_pending_timers();
			let copies_pending = !self.copies.is_empty();
			let joined = tokio::select! {
				Some(fired) = self.timers.expired(), if toasts_pending => return Some(ControllerEvent::Toast(fired)),
				Some(fired) = self.tooltips.expired(), if tooltips_pending => return Some(ControllerEvent::Tooltip(fired)),
				Some(joined) = self.copies.join_next(), if copies_pending => joined,
				else => return None,
			};
			match joined {
				Ok(finished) => return Some(ControllerEvent::Copy(finished)),
				Err(error) => tracing::warn!(%error, "toast.copy_task_failed"),
			}
		}
	}

	/// Applies an event from [`next_event`](Self::next_event). Stale or
	/// unknown timers are ignored.
	pub fn apply(&mut self, event: ControllerEvent) {
		match event {
			ControllerEvent::Toast(fired) => self.on_toast_timer(fired),
			ControllerEvent::Tooltip(fired) => self.tooltips.fire(&mut self.surface, fired),
			ControllerEvent::Copy(finished) => self.on_copy_finished(finished),
		}
	}

	/// Runs timers and copies until nothing is pending.
	pub async fn settle(&mut self) {
		while let Some(event) = self.next_event().await {
			self.apply(event);
		}
	}

	// The toast may be gone by now; the tooltip is anchored to the pointer, not the card.
	fn on_copy_finished(&mut self, CopyFinished { toast, at, outcome }: CopyFinished) {
		let labels = &self.options.labels;
		let text = match outcome {
			CopyOutcome::Copied => labels.copied.clone(),
			CopyOutcome::Failed => labels.copy_failed.clone(),
		};
		tracing::trace!(toast = toast.0, ?outcome, "toast.copy_finished");
		self.tooltips.show(&mut self.surface, at, text);
	}

	fn on_toast_timer(&mut self, fired: Fired<ToastTimer>) {
		let ToastTimer { id, stage } = fired.payload;
		let Some(toast) = self.toasts.get_mut(&id) else {
			tracing::trace!(toast = id.0, ?stage, "toast.timer.unknown");
			return;
		};
		let slot = toast.slot(stage);
		if !fired.is_current(slot) {
			tracing::trace!(toast = id.0, ?stage, generation = fired.generation(), "toast.timer.stale");
			return;
		}
		// Queue keys are recycled once a timer fires; the slot must not outlive it.
		*slot = None;

		let element = ElementId::Toast(id);
		let timing = self.options.timing;
		match (stage, toast.phase) {
			(Stage::Enter, ToastPhase::Entering) => {
				self.surface.set_slide(element, Slide::Onscreen);
				if std::mem::take(&mut toast.hover_pending) {
					toast.phase = ToastPhase::HoverPaused;
				} else {
					toast.dismiss_timer = Some(self.timers.schedule(
						ToastTimer {
							id,
							stage: Stage::Dismiss,
						},
						timing.auto_dismiss,
					));
					toast.phase = ToastPhase::Visible;
				}
				tracing::trace!(toast = id.0, phase = ?toast.phase, "toast.entered");
			}
			(Stage::Dismiss, ToastPhase::Visible) => {
				self.surface.set_slide(element, Slide::Offscreen);
				toast.remove_timer = Some(self.timers.schedule(
					ToastTimer {
						id,
						stage: Stage::Remove,
					},
					timing.exit_animation,
				));
				toast.phase = ToastPhase::Dismissing;
				tracing::trace!(toast = id.0, "toast.dismissing");
			}
			(Stage::Remove, ToastPhase::Dismissing) => self.remove(id),
			(stage, phase) => {
				tracing::warn!(toast = id.0, ?stage, ?phase, "toast.timer.phase_mismatch");
			}
		}
	}

	fn remove(&mut self, id: ToastId) {
		let Some(mut toast) = self.toasts.remove(&id) else {
			return;
		};
		for stage in [Stage::Enter, Stage::Dismiss, Stage::Remove] {
			self.timers.cancel(toast.slot(stage));
		}
		self.surface.destroy(ElementId::Toast(id));
		tracing::debug!(toast = id.0, "toast.removed");
	}
}

impl<S, C> ToastController<S, C> {
	/// Phase of toast `id`, or `None` once it has been removed.
	pub fn phase(&self, id: ToastId) -> Option<ToastPhase> {
		self.toasts.get(&id).map(|toast| toast.phase)
	}

	/// Number of live toasts.
	pub fn len(&self) -> usize {
		self.toasts.len()
	}

	/// Returns true when no toast is alive.
	pub fn is_empty(&self) -> bool {
		self.toasts.is_empty()
	}

	/// Returns true while any timer or clipboard write is pending.
	pub fn has_pending_work(&self) -> bool {
		!self.timers.is_empty() || self.tooltips.has_pending_timers() || !self.copies.is_empty()
	}
}
