use crate::{
	diff::{RefTable, StructuralMismatchError, TreeDiffer},
	element::Element,
	state::{Scope, StateStore, UpdateTrigger},
	surface::Surface,
};
use std::{
	any::Any,
	cell::RefCell,
	rc::{Rc, Weak},
};
use tracing::{error, info, warn};

/// The single persistent binding between a root surface node, a root component function, and
/// the cycle that keeps them in sync.
///
/// Constructing one via [`Root::mount`] is the only `UNMOUNTED → MOUNTED` transition; there is
/// no unmount. Dropping the `Root` retires the binding instead: rendered output stays on the
/// surface and later updater calls degrade to warning no-ops.
///
/// Each `Root` owns its own state slots and reference table, so any number of independent
/// roots can be mounted side by side.
pub struct Root<S: Surface + 'static> {
	inner: Rc<RefCell<RootInner<S>>>,
}

struct RootInner<S: Surface> {
	surface: S,
	target: S::Node,
	component: Box<dyn Fn(&mut Scope<'_>) -> Element>,
	store: StateStore,
	refs: RefTable<S::Node>,
	weak_self: Weak<RefCell<RootInner<S>>>,
	parked_error: Option<StructuralMismatchError>,
}

impl<S: Surface + 'static> Root<S> {
	/// Binds `component` to `target` and performs the first render pass.
	///
	/// # Errors
	///
	/// Fails if the first pass hits a [`StructuralMismatchError`] against `target`'s existing
	/// children; no binding is constructed in that case.
	pub fn mount(surface: S, target: S::Node, component: impl Fn(&mut Scope<'_>) -> Element + 'static) -> Result<Self, StructuralMismatchError> {
		let inner = Rc::new(RefCell::new(RootInner {
			surface,
			target,
			component: Box::new(component),
			store: StateStore::new(),
			refs: RefTable::new(),
			weak_self: Weak::new(),
			parked_error: None,
		}));
		inner.borrow_mut().weak_self = Rc::downgrade(&inner);
		inner.borrow_mut().render_pass()?;
		info!("Mounted root with {} rendered position(s).", inner.borrow().refs.len());
		Ok(Self { inner })
	}

	/// Re-runs the render cycle: cursor reset, component re-invocation, reconcile against the
	/// same reference table.
	///
	/// Updaters call this implicitly; an explicit call forces a re-render, which is a surface
	/// no-op whenever nothing changed.
	///
	/// # Errors
	///
	/// See [`TreeDiffer::run`]. The binding stays usable; re-triggering the cycle is the only
	/// documented remediation.
	pub fn cycle(&self) -> Result<(), StructuralMismatchError> {
		self.inner.borrow_mut().render_pass()
	}

	/// Takes the error parked by a failed updater-triggered cycle, if any.
	///
	/// Updaters run inside surface event dispatch and have no way to return a `Result`, so
	/// [`TreeDiffer::run`] failures on that path are logged and parked here instead.
	#[must_use]
	pub fn take_error(&self) -> Option<StructuralMismatchError> {
		self.inner.borrow_mut().parked_error.take()
	}
}

impl<S: Surface + 'static> RootInner<S> {
	fn update_trigger(weak: Weak<RefCell<Self>>) -> UpdateTrigger {
		Rc::new(move |position, value: Rc<dyn Any>| {
			let inner = match weak.upgrade() {
				Some(inner) => inner,
				None => return warn!("State update for slot {} after the root binding was dropped. Ignoring.", position),
			};
			// Updaters only run from event-handler context. A component function calling one
			// mid-pass lands on this borrow and panics.
			let mut inner = inner.borrow_mut();
			inner.store.write(position, value);
			if let Err(error) = inner.render_pass() {
				error!("Render cycle failed after a state update: {}", error);
				inner.parked_error = Some(error);
			}
		})
	}

	fn render_pass(&mut self) -> Result<(), StructuralMismatchError> {
		let tree = {
			let RootInner { store, component, weak_self, .. } = self;
			store.reset_cursor();
			let mut scope = Scope::new(store, Self::update_trigger(weak_self.clone()));
			component(&mut scope)
		};
		if self.store.cursor() < self.store.len() {
			warn!("Render pass read {} of {} state slots. State reads must not be conditional.", self.store.cursor(), self.store.len());
		}
		TreeDiffer::new(&self.surface, &mut self.refs).run(&self.target, &tree)
	}
}
