//! Line-based rendering of toasts and tooltips for a terminal.
//!
//! A terminal cannot slide or fade, so each lifecycle step is printed as one
//! line: the card when it slides on-screen, tooltips when they become
//! visible, and a short note when a card leaves.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use beacon_toast::{Element, ElementId, Fade, Slide, Surface, ToastView, TooltipView};

/// Prints elements as lines to a writer.
pub struct TerminalSurface<W> {
	out: W,
	toasts: HashMap<ElementId, ToastView>,
	tooltips: HashMap<ElementId, TooltipView>,
}

impl<W: Write> TerminalSurface<W> {
	/// Creates a surface printing to `out`.
	pub fn new(out: W) -> Self {
		Self {
			out,
			toasts: HashMap::new(),
			tooltips: HashMap::new(),
		}
	}

	/// Consumes the surface and returns the writer.
	#[cfg(test)]
	pub fn into_inner(self) -> W {
		self.out
	}

	fn line(&mut self, text: fmt::Arguments<'_>) {
		if let Err(error) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
			tracing::warn!(%error, "terminal write failed");
		}
	}
}

impl<W: Write> Surface for TerminalSurface<W> {
	fn create(&mut self, id: ElementId, element: Element) {
		match element {
			Element::Toast(view) => {
				self.toasts.insert(id, view);
			}
			Element::Tooltip(view) => {
				self.tooltips.insert(id, view);
			}
		}
	}

	fn set_slide(&mut self, id: ElementId, slide: Slide) {
		let Some(view) = self.toasts.get(&id) else {
			return;
		};
		match slide {
			Slide::Onscreen => {
				let tag = if view.success { "ok" } else { "fail" };
				let ElementId::Toast(toast) = id else {
					return;
				};
				let number = toast.0;
				if view.overflow {
					let message = view.message.replace('\n', "\n    ");
					self.line(format_args!("[{tag}] #{number}\n    {message}"));
				} else {
					let message = view.message.clone();
					self.line(format_args!("[{tag}] #{number} {message}"));
				}
			}
			Slide::Offscreen => self.line(format_args!("      {id} dismissed")),
		}
	}

	fn set_fade(&mut self, id: ElementId, fade: Fade) {
		if fade != Fade::Visible {
			return;
		}
		if let Some(text) = self.tooltips.get(&id).map(|view| view.text.clone()) {
			self.line(format_args!("      ({text})"));
		}
	}

	fn destroy(&mut self, id: ElementId) {
		self.toasts.remove(&id);
		self.tooltips.remove(&id);
	}
}

#[cfg(test)]
mod tests {
	use beacon_toast::{Point, ToastId, TooltipId};
	use pretty_assertions::assert_eq;

	use super::*;

	fn toast(success: bool, message: &str) -> Element {
		Element::Toast(ToastView {
			success,
			overflow: message.chars().count() > 50,
			message: message.to_owned(),
		})
	}

	#[test]
	fn prints_card_tooltip_and_dismissal() {
		let mut surface = TerminalSurface::new(Vec::new());
		let card = ElementId::Toast(ToastId(1));
		let tip = ElementId::Tooltip(TooltipId(1));

		surface.create(card, toast(true, "build finished"));
		surface.set_slide(card, Slide::Onscreen);
		surface.create(
			tip,
			Element::Tooltip(TooltipView {
				text: "Copied!".into(),
				position: Point::new(10, 10),
			}),
		);
		surface.set_fade(tip, Fade::Visible);
		surface.set_fade(tip, Fade::FadingOut);
		surface.destroy(tip);
		surface.set_slide(card, Slide::Offscreen);
		surface.destroy(card);

		let out = String::from_utf8(surface.into_inner()).unwrap();
		assert_eq!(out, "[ok] #1 build finished\n      (Copied!)\n      toast#1 dismissed\n");
	}

	#[test]
	fn overflow_messages_get_their_own_line() {
		let mut surface = TerminalSurface::new(Vec::new());
		let card = ElementId::Toast(ToastId(7));
		let message = "x".repeat(60);

		surface.create(card, toast(false, &message));
		surface.set_slide(card, Slide::Onscreen);

		let out = String::from_utf8(surface.into_inner()).unwrap();
		assert_eq!(out, format!("[fail] #7\n    {message}\n"));
	}

	#[test]
	fn unknown_elements_print_nothing() {
		let mut surface = TerminalSurface::new(Vec::new());
		surface.set_slide(ElementId::Toast(ToastId(9)), Slide::Onscreen);
		surface.set_fade(ElementId::Tooltip(TooltipId(9)), Fade::Visible);
		assert!(surface.into_inner().is_empty());
	}
}
