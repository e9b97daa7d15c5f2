//! Timing and text defaults for toasts and tooltips.

use std::time::Duration;

use crate::surface::Point;

/// Lifecycle durations of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
	/// Delay between creation (off-screen) and sliding on-screen.
	pub enter_delay: Duration,
	/// Time on-screen before auto-dismiss when never hovered.
	pub auto_dismiss: Duration,
	/// Grace period armed when the pointer leaves a paused toast.
	pub resume_dismiss: Duration,
	/// Slide-out duration before the element is destroyed.
	pub exit_animation: Duration,
}

impl ToastTiming {
	/// Default enter delay.
	pub const ENTER_DELAY: Duration = Duration::from_millis(10);
	/// Default auto-dismiss delay.
	pub const AUTO_DISMISS: Duration = Duration::from_millis(3000);
	/// Default resume delay after hover.
	pub const RESUME_DISMISS: Duration = Duration::from_millis(1500);
	/// Default exit animation length.
	pub const EXIT_ANIMATION: Duration = Duration::from_millis(500);
}

impl Default for ToastTiming {
	fn default() -> Self {
		Self {
			enter_delay: Self::ENTER_DELAY,
			auto_dismiss: Self::AUTO_DISMISS,
			resume_dismiss: Self::RESUME_DISMISS,
			exit_animation: Self::EXIT_ANIMATION,
		}
	}
}

/// Lifecycle durations and placement of a tooltip.
///
/// All delays are measured from creation: visible after `fade_in_delay`,
/// fading at `visible_until`, destroyed at `visible_until + fade_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipTiming {
	/// Delay before the bubble becomes visible.
	pub fade_in_delay: Duration,
	/// Point after creation where fade-out starts.
	pub visible_until: Duration,
	/// Fade-out duration before destruction.
	pub fade_out: Duration,
	/// Offset from the pointer to the bubble.
	pub offset: Point,
}

impl Default for TooltipTiming {
	fn default() -> Self {
		Self {
			fade_in_delay: Duration::from_millis(10),
			visible_until: Duration::from_millis(1000),
			fade_out: Duration::from_millis(300),
			offset: Point::new(10, 10),
		}
	}
}

/// Tooltip texts shown by toasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipLabels {
	/// Shown on hover.
	pub hint: String,
	/// Shown after a successful copy.
	pub copied: String,
	/// Shown after a failed copy.
	pub copy_failed: String,
}

impl Default for TooltipLabels {
	fn default() -> Self {
		Self {
			hint: "Click to copy".to_owned(),
			copied: "Copied!".to_owned(),
			copy_failed: "Copy failed".to_owned(),
		}
	}
}

/// Everything a [`crate::ToastController`] needs besides its collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastOptions {
	/// Toast lifecycle durations.
	pub timing: ToastTiming,
	/// Tooltip lifecycle durations.
	pub tooltip: TooltipTiming,
	/// Tooltip texts.
	pub labels: TooltipLabels,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn resume_is_shorter_than_auto_dismiss() {
		let timing = ToastTiming::default();
		assert!(timing.resume_dismiss < timing.auto_dismiss);
	}
}
