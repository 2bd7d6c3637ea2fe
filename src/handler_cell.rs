use crate::element::ClickHandler;
use std::{cell::RefCell, rc::Rc};
use tracing::trace;

/// Late-binding slot behind the single click listener registered on a rendered node.
///
/// The listener itself is a trampoline that dereferences this cell at dispatch time, so render
/// passes swap the current handler in place instead of touching the surface's listener
/// registration. Node identity stays stable across handler-only changes while at most one
/// listener is ever attached per node.
#[derive(Clone)]
pub(crate) struct HandlerCell(Rc<RefCell<Option<ClickHandler>>>);

impl HandlerCell {
	pub fn new() -> Self {
		Self(Rc::new(RefCell::new(None)))
	}

	pub fn set(&self, handler: ClickHandler) {
		*self.0.borrow_mut() = Some(handler);
	}

	pub fn clear(&self) {
		*self.0.borrow_mut() = None;
	}

	/// The closure to register with the surface, exactly once per node.
	pub fn trampoline(&self) -> ClickHandler {
		let cell = Rc::clone(&self.0);
		Rc::new(move || {
			// The borrow ends before the handler runs: handlers are free to trigger a render
			// pass that swaps this very cell.
			let handler = cell.borrow().clone();
			match handler {
				Some(handler) => handler(),
				None => trace!("Click on a node whose handler was cleared. Ignoring."),
			}
		})
	}
}
