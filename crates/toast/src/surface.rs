//! Rendering capability injected into the toast and tooltip controllers.
//!
//! Controllers never touch a display directly. They create elements, move
//! them between slide positions, change their fade state, and destroy them
//! through [`Surface`], so the state machines run headless in tests.

use std::fmt;
use std::ops::Add;

/// Identifier of a toast, unique per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(pub u64);

/// Identifier of a tooltip, unique per tooltip controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TooltipId(pub u64);

/// Identifier of any element placed on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
	/// A toast card.
	Toast(ToastId),
	/// A tooltip bubble.
	Tooltip(TooltipId),
}

impl fmt::Display for ElementId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Toast(ToastId(id)) => write!(f, "toast#{id}"),
			Self::Tooltip(TooltipId(id)) => write!(f, "tooltip#{id}"),
		}
	}
}

/// Pointer position in surface coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: i32,
	/// Vertical coordinate.
	pub y: i32,
}

impl Point {
	/// Creates a point.
	pub const fn new(x: i32, y: i32) -> Self {
		Self { x, y }
	}
}

impl Add for Point {
	type Output = Self;

	fn add(self, rhs: Self) -> Self {
		Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
	}
}

/// Content of a toast card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
	/// Selects the success or failure presentation variant.
	pub success: bool,
	/// Message longer than the overflow threshold; layout hint only.
	pub overflow: bool,
	/// Text shown on the card.
	pub message: String,
}

/// Content of a tooltip bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipView {
	/// Hint or result text.
	pub text: String,
	/// Final position, already offset from the pointer.
	pub position: Point,
}

/// Element to create on a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
	/// Toast card; starts at [`Slide::Offscreen`].
	Toast(ToastView),
	/// Tooltip bubble; starts at [`Fade::Hidden`].
	Tooltip(TooltipView),
}

/// Slide position of a toast card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
	/// Hidden outside the visible area.
	Offscreen,
	/// Resting on-screen position.
	Onscreen,
}

/// Fade state of a tooltip bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
	/// Created but not yet shown.
	Hidden,
	/// Fully visible.
	Visible,
	/// Fading out before destruction.
	FadingOut,
}

/// Display surface the controllers render through.
pub trait Surface {
	/// Creates and attaches a new element.
	fn create(&mut self, id: ElementId, element: Element);

	/// Moves a toast card to a slide position.
	fn set_slide(&mut self, id: ElementId, slide: Slide);

	/// Changes a tooltip's fade state.
	fn set_fade(&mut self, id: ElementId, fade: Fade);

	/// Detaches and drops an element. Called at most once per id.
	fn destroy(&mut self, id: ElementId);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
	fn create(&mut self, id: ElementId, element: Element) {
		(**self).create(id, element);
	}

	fn set_slide(&mut self, id: ElementId, slide: Slide) {
		(**self).set_slide(id, slide);
	}

	fn set_fade(&mut self, id: ElementId, fade: Fade) {
		(**self).set_fade(id, fade);
	}

	fn destroy(&mut self, id: ElementId) {
		(**self).destroy(id);
	}
}
