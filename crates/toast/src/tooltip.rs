//! Short-lived hint bubbles anchored near the pointer.
//!
//! A tooltip is created hidden, becomes visible shortly after, starts fading
//! at a fixed point after creation, and is destroyed once the fade finishes.
//! Tooltips are never paused or re-entered, so there is no cancellation API.

use std::collections::HashMap;

use crate::options::TooltipTiming;
use crate::surface::{Element, ElementId, Fade, Point, Surface, TooltipId, TooltipView};
use crate::timer::{Fired, Timers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
	FadeIn,
	FadeOut,
	Destroy,
}

/// Payload of a tooltip timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipTimer {
	id: TooltipId,
	stage: Stage,
}

/// Owns every live tooltip and its stage timers.
#[derive(Debug)]
pub struct TooltipController {
	timing: TooltipTiming,
	fades: HashMap<TooltipId, Fade>,
	timers: Timers<TooltipTimer>,
	next_id: u64,
}

impl TooltipController {
	/// Creates a controller with the given timing.
	pub fn new(timing: TooltipTiming) -> Self {
		Self {
			timing,
			fades: HashMap::new(),
			timers: Timers::new(),
			next_id: 0,
		}
	}

	/// Shows `text` near `anchor` and schedules its whole lifecycle.
	pub fn show(&mut self, surface: &mut impl Surface, anchor: Point, text: impl Into<String>) -> TooltipId {
		self.next_id += 1;
		let id = TooltipId(self.next_id);
		let text = text.into();
		let position = anchor + self.timing.offset;

		tracing::debug!(tooltip = id.0, text = %text, x = position.x, y = position.y, "tooltip.show");
		surface.create(ElementId::Tooltip(id), Element::Tooltip(TooltipView { text, position }));

		let TooltipTiming {
			fade_in_delay,
			visible_until,
			fade_out,
			..
		} = self.timing;
		self.timers.schedule(TooltipTimer { id, stage: Stage::FadeIn }, fade_in_delay);
		self.timers.schedule(TooltipTimer { id, stage: Stage::FadeOut }, visible_until);
		self.timers.schedule(
			TooltipTimer {
				id,
				stage: Stage::Destroy,
			},
			visible_until + fade_out,
		);

		self.fades.insert(id, Fade::Hidden);
		id
	}

	/// Applies a fired stage timer.
	pub fn fire(&mut self, surface: &mut impl Surface, fired: Fired<TooltipTimer>) {
		let TooltipTimer { id, stage } = fired.payload;
		let element = ElementId::Tooltip(id);
		let Some(fade) = self.fades.get_mut(&id) else {
			tracing::trace!(tooltip = id.0, ?stage, "tooltip.stale_timer");
			return;
		};

		match stage {
			// A fade-in arriving after fade-out started must not resurrect the bubble.
			Stage::FadeIn if *fade == Fade::Hidden => {
				*fade = Fade::Visible;
				surface.set_fade(element, Fade::Visible);
			}
			Stage::FadeIn => {}
			Stage::FadeOut => {
				*fade = Fade::FadingOut;
				surface.set_fade(element, Fade::FadingOut);
			}
			Stage::Destroy => {
				self.fades.remove(&id);
				surface.destroy(element);
				tracing::trace!(tooltip = id.0, "tooltip.destroyed");
			}
		}
	}

	/// Waits for the next stage timer.
	pub async fn expired(&mut self) -> Option<Fired<TooltipTimer>> {
		self.timers.expired().await
	}

	/// Returns true when stage timers are pending.
	pub fn has_pending_timers(&self) -> bool {
		!self.timers.is_empty()
	}
}

#[cfg(test)]
impl TooltipController {
	fn is_empty(&self) -> bool {
		self.fades.is_empty()
	}

	fn fade(&self, id: TooltipId) -> Option<Fade> {
		self.fades.get(&id).copied()
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::test_support::{Op, RecordingSurface, assert_near};

	async fn drain(tooltips: &mut TooltipController, surface: &mut RecordingSurface) {
		while let Some(fired) = tooltips.expired().await {
			tooltips.fire(surface, fired);
		}
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn lifecycle_follows_fixed_schedule() {
		let mut surface = RecordingSurface::new();
		let mut tooltips = TooltipController::new(TooltipTiming::default());

		let id = tooltips.show(&mut surface, Point::new(100, 40), "Click to copy");
		let element = ElementId::Tooltip(id);
		assert_eq!(tooltips.fade(id), Some(Fade::Hidden));

		drain(&mut tooltips, &mut surface).await;
		assert!(tooltips.is_empty());

		let ops = surface.ops();
		assert_eq!(ops.len(), 4);
		assert_eq!(
			ops[0].1,
			Op::Create(
				element,
				Element::Tooltip(TooltipView {
					text: "Click to copy".into(),
					position: Point::new(110, 50),
				})
			)
		);
		assert_eq!(ops[1].1, Op::Fade(element, Fade::Visible));
		assert_eq!(ops[2].1, Op::Fade(element, Fade::FadingOut));
		assert_eq!(ops[3].1, Op::Destroy(element));

		assert_near(ops[1].0, Duration::from_millis(10));
		assert_near(ops[2].0, Duration::from_millis(1000));
		assert_near(ops[3].0, Duration::from_millis(1300));
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn tooltips_coexist_without_dedup() {
		let mut surface = RecordingSurface::new();
		let mut tooltips = TooltipController::new(TooltipTiming::default());

		let first = tooltips.show(&mut surface, Point::default(), "Copied!");
		tokio::time::advance(Duration::from_millis(200)).await;
		let second = tooltips.show(&mut surface, Point::default(), "Copied!");

		assert_ne!(first, second);
		assert_eq!(surface.tooltip_texts(), vec!["Copied!".to_owned(), "Copied!".to_owned()]);
		assert_eq!(tooltips.fade(first), Some(Fade::Hidden));
		assert_eq!(tooltips.fade(second), Some(Fade::Hidden));

		drain(&mut tooltips, &mut surface).await;
		assert_eq!(surface.destroyed(), vec![ElementId::Tooltip(first), ElementId::Tooltip(second)]);
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn late_fade_in_does_not_resurrect() {
		let mut surface = RecordingSurface::new();
		let timing = TooltipTiming {
			fade_in_delay: Duration::from_millis(50),
			visible_until: Duration::from_millis(20),
			fade_out: Duration::from_millis(100),
			..TooltipTiming::default()
		};
		let mut tooltips = TooltipController::new(timing);
		let id = tooltips.show(&mut surface, Point::default(), "x");

		let fade_out = tooltips.expired().await.unwrap();
		tooltips.fire(&mut surface, fade_out);
		let fade_in = tooltips.expired().await.unwrap();
		tooltips.fire(&mut surface, fade_in);

		assert_eq!(tooltips.fade(id), Some(Fade::FadingOut));
	}
}
