//! Self-dismissing toasts with hover pause, click-to-copy, and tooltips.
//!
//! # Purpose
//!
//! - Turn each received [`NotificationEvent`] into one transient, interactive toast.
//! - Own the timed lifecycle of toasts and tooltips, including hover pause and resume.
//! - Exclude transport (see `beacon-bus`) and concrete rendering (see [`Surface`] implementors).
//!
//! # Mental model
//!
//! - A [`ToastController`] is a set of small state machines sharing one timer queue.
//! - Every transition is a reaction to a pointer event or a timer fire; nothing else moves a toast.
//! - Timers are individually cancellable. Cancelling clears the owner's slot, and a fire only counts
//!   when its generation matches the handle still in the slot.
//! - Rendering and clipboard access are injected capabilities, so the state machines run headless.
//! - A click hands the clipboard write to its own task; the outcome comes back as an event.
//! - [`ToastRuntime`] is the single consumer: it owns the controller and serializes commands, timer
//!   fires, and finished copies on one task.
//!
//! # Key types
//!
//! | Type | Meaning | Constraints | Constructed / mutated in |
//! |---|---|---|---|
//! | [`ToastController`] | Owner of all toasts, their timers, and tooltips | MUST be driven by exactly one task | `ToastController::spawn`, `ToastController::fire` |
//! | [`ToastPhase`] | Lifecycle phase of a live toast | `Dismissing` MUST always hold a remove timer | `ToastController::fire`, `ToastController::pointer_*` |
//! | [`Timers`] | Cancellable delay queue with generations | Fired slots MUST be cleared before rescheduling | `Timers::schedule`, `Timers::cancel` |
//! | [`TooltipController`] | Fixed-schedule hint bubbles | MUST NOT be cancelled or paused | `TooltipController::show` |
//! | [`ClipboardBridge`] | Text clipboard capability | Failures MUST be reported, never propagated | `SystemClipboard::copy` |
//! | [`ToastRuntime`] | Task owning a controller | MUST exit on shutdown or after handles drop and pending work drains | `ToastRuntime::run` |
//!
//! # Invariants
//!
//! 1. A cancelled timer MUST NOT produce a transition.
//!    - Enforced in: `Timers::cancel`, `ToastController::on_toast_timer`
//!    - Tested by: `controller::tests::hover_pauses_and_leave_resumes_with_shorter_delay`
//!    - Failure symptom: a hovered toast slides away under the pointer.
//!
//! 2. A toast element MUST be destroyed exactly once.
//!    - Enforced in: `ToastController::remove`
//!    - Tested by: `controller::tests::duplicate_fire_is_a_noop`
//!    - Failure symptom: surface double-free or a leaked card stuck on screen.
//!
//! 3. Clicking MUST NOT advance or reset lifecycle timers.
//!    - Enforced in: `ToastController::click`
//!    - Tested by: `controller::tests::click_copies_message_without_touching_timers`
//!    - Failure symptom: toasts linger or vanish early after a copy.
//!
//! 4. Pointer input for a removed toast MUST be ignored.
//!    - Enforced in: `ToastController::pointer_enter`, `ToastController::pointer_leave`, `ToastController::click`
//!    - Tested by: `controller::tests::events_for_removed_toasts_are_ignored`
//!    - Failure symptom: tooltips or clipboard writes for cards no longer visible.
//!
//! 5. No operation blocks the event loop: a slow clipboard MUST NOT delay any toast's timers.
//!    - Enforced in: `ToastController::click`, `ToastController::next_event`
//!    - Tested by: `runtime::tests::slow_copy_does_not_delay_other_toasts`
//!    - Failure symptom: clicking one toast holds every other toast on screen until the copy returns.
//!
//! # Concurrency and ordering
//!
//! - Timer callbacks and commands run on the runtime task only; no locks guard controller state.
//! - Clipboard writes run on a `JoinSet` owned by the controller and may overlap each other. Their outcome
//!   tooltips appear in completion order, even if the clicked toast was removed meanwhile.
//! - Dropping the controller aborts copies still in flight.
//! - Moving timers onto other threads would need each fire to re-check the slot under the same lock
//!   that cancellation takes; the generation check alone only holds for a single consumer.
//!
//! # Failure modes
//!
//! - Clipboard unavailable: logged at warn, "Copy failed" tooltip shown, lifecycle unaffected.
//! - Runtime stopped: [`ToastHandle`] sends return [`RuntimeStopped`]; callers drop the event.
//! - Copy task panicked: logged at warn; no tooltip is shown for that click.

#![warn(missing_docs)]

mod clipboard;
mod controller;
mod options;
mod runtime;
mod surface;
mod timer;
mod tooltip;

#[cfg(test)]
mod test_support;

pub use beacon_proto::NotificationEvent;
pub use clipboard::{ClipboardBridge, ClipboardError, CopyOutcome, SystemClipboard, copy_and_report};
pub use controller::{ControllerEvent, CopyFinished, PointerEvent, ToastController, ToastPhase, ToastTimer};
pub use options::{ToastOptions, ToastTiming, TooltipLabels, TooltipTiming};
pub use runtime::{RuntimeStopped, ToastCommand, ToastHandle, ToastRuntime};
pub use surface::{Element, ElementId, Fade, Point, Slide, Surface, ToastId, ToastView, TooltipId, TooltipView};
pub use timer::{Fired, TimerHandle, Timers};
pub use tooltip::{TooltipController, TooltipTimer};
