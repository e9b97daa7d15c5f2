//! Headless collaborators for controller tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::clipboard::{ClipboardBridge, ClipboardError};
use crate::surface::{Element, ElementId, Fade, Slide, Surface};

/// Tolerance for timer assertions; the delay queue rounds to whole milliseconds.
pub const SLACK: Duration = Duration::from_millis(5);

#[track_caller]
pub fn assert_near(actual: Duration, expected: Duration) {
	assert!(
		actual >= expected && actual <= expected + SLACK,
		"expected ~{expected:?}, got {actual:?}"
	);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
	Create(ElementId, Element),
	Slide(ElementId, Slide),
	Fade(ElementId, Fade),
	Destroy(ElementId),
}

/// Surface that records every call with the (paused) time since creation.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
	start: Instant,
	log: Arc<Mutex<Vec<(Duration, Op)>>>,
}

impl RecordingSurface {
	pub fn new() -> Self {
		Self {
			start: Instant::now(),
			log: Arc::default(),
		}
	}

	/// Paused-clock time since this surface was created.
	pub fn elapsed(&self) -> Duration {
		self.start.elapsed()
	}

	pub fn ops(&self) -> Vec<(Duration, Op)> {
		self.log.lock().unwrap().clone()
	}

	/// Time of the first op matching `want`.
	pub fn when(&self, want: &Op) -> Option<Duration> {
		self.log.lock().unwrap().iter().find(|(_, op)| op == want).map(|(at, _)| *at)
	}

	pub fn destroyed(&self) -> Vec<ElementId> {
		self.ops()
			.into_iter()
			.filter_map(|(_, op)| match op {
				Op::Destroy(id) => Some(id),
				_ => None,
			})
			.collect()
	}

	/// Texts of every tooltip created, in order.
	pub fn tooltip_texts(&self) -> Vec<String> {
		self.ops()
			.into_iter()
			.filter_map(|(_, op)| match op {
				Op::Create(_, Element::Tooltip(view)) => Some(view.text),
				_ => None,
			})
			.collect()
	}

	fn push(&self, op: Op) {
		self.log.lock().unwrap().push((self.start.elapsed(), op));
	}
}

impl Surface for RecordingSurface {
	fn create(&mut self, id: ElementId, element: Element) {
		self.push(Op::Create(id, element));
	}

	fn set_slide(&mut self, id: ElementId, slide: Slide) {
		self.push(Op::Slide(id, slide));
	}

	fn set_fade(&mut self, id: ElementId, fade: Fade) {
		self.push(Op::Fade(id, fade));
	}

	fn destroy(&mut self, id: ElementId) {
		self.push(Op::Destroy(id));
	}
}

/// Clipboard whose outcome and latency are fixed at construction.
#[derive(Debug, Clone)]
pub struct ScriptedClipboard {
	fail: bool,
	latency: Duration,
	copied: Arc<Mutex<Vec<String>>>,
}

impl ScriptedClipboard {
	pub fn succeeding() -> Self {
		Self {
			fail: false,
			latency: Duration::ZERO,
			copied: Arc::default(),
		}
	}

	pub fn failing() -> Self {
		Self {
			fail: true,
			..Self::succeeding()
		}
	}

	/// Succeeds after `latency` of (paused) time.
	pub fn slow(latency: Duration) -> Self {
		Self {
			latency,
			..Self::succeeding()
		}
	}

	pub fn copied(&self) -> Vec<String> {
		self.copied.lock().unwrap().clone()
	}
}

#[async_trait]
impl ClipboardBridge for ScriptedClipboard {
	async fn copy(&self, text: &str) -> Result<(), ClipboardError> {
		if !self.latency.is_zero() {
			tokio::time::sleep(self.latency).await;
		}
		if self.fail {
			return Err(ClipboardError::Unavailable("scripted failure".into()));
		}
		self.copied.lock().unwrap().push(text.to_owned());
		Ok(())
	}
}
