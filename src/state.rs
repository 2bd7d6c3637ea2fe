use std::{
	any::{type_name, Any, TypeId},
	marker::PhantomData,
	rc::Rc,
};

pub(crate) type UpdateTrigger = Rc<dyn Fn(usize, Rc<dyn Any>)>;

struct Slot {
	value: Rc<dyn Any>,
	type_id: TypeId,
	type_name: &'static str,
}

/// Ordered slot list plus cursor.
///
/// State is addressed by *position*: the Nth slot read of a render pass refers to the same
/// logical variable as the Nth read of the previous pass. Preserving that call order between
/// passes is the component author's responsibility — no conditional or loop-dependent reads.
#[derive(Default)]
pub(crate) struct StateStore {
	slots: Vec<Slot>,
	cursor: usize,
}

impl StateStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Must run exactly once at the start of every render pass, before any component function.
	pub fn reset_cursor(&mut self) {
		self.cursor = 0;
	}

	pub fn read_or_init(&mut self, type_id: TypeId, type_name: &'static str, init: impl FnOnce() -> Rc<dyn Any>) -> (usize, Rc<dyn Any>) {
		let position = self.cursor;
		// Positions are dense; the cursor can't skip past the end of the slot list.
		if position == self.slots.len() {
			self.slots.push(Slot {
				value: init(),
				type_id,
				type_name,
			});
		}
		let slot = &self.slots[position];
		assert!(
			slot.type_id == type_id,
			"state slot {} was initialised as `{}` but is now read as `{}`; state is positional, so every render pass must issue the same state reads in the same order",
			position,
			slot.type_name,
			type_name,
		);
		self.cursor += 1;
		(position, Rc::clone(&slot.value))
	}

	pub fn write(&mut self, position: usize, value: Rc<dyn Any>) {
		let slot = &mut self.slots[position];
		// The setter that brought us here was minted by `read_or_init`, so the slot exists and
		// the payload type matches unless call order already diverged.
		assert!(
			(*value).type_id() == slot.type_id,
			"state slot {} was initialised as `{}` but is now written with a different type; state is positional, so every render pass must issue the same state reads in the same order",
			position,
			slot.type_name,
		);
		slot.value = value;
	}

	pub fn cursor(&self) -> usize {
		self.cursor
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}
}

/// Per-pass view of the root binding, handed to component functions.
pub struct Scope<'a> {
	store: &'a mut StateStore,
	trigger: UpdateTrigger,
}

impl<'a> Scope<'a> {
	pub(crate) fn new(store: &'a mut StateStore, trigger: UpdateTrigger) -> Self {
		Self { store, trigger }
	}

	/// Reads the state slot at the current cursor position, creating it with `initial` if the
	/// cursor has advanced past the end of the known slot list, and advances the cursor by one.
	///
	/// Returns the slot's current value and the updater bound to the slot's position. Calling
	/// the updater writes the slot and synchronously runs a full render cycle before it
	/// returns.
	///
	/// # Panics
	///
	/// Panics if the slot at the current position was initialised with a different payload
	/// type — the detectable form of a call-order violation. Same-*type* misalignment is not
	/// detectable and silently attaches values to the wrong component.
	pub fn state<T: Clone + 'static>(&mut self, initial: T) -> (T, Setter<T>) {
		let (position, value) = self.store.read_or_init(TypeId::of::<T>(), type_name::<T>(), move || {
			let value: Rc<dyn Any> = Rc::new(initial);
			value
		});
		let value = value.downcast_ref::<T>().expect("suberin bug: slot payload type-checked by `read_or_init`").clone();
		(
			value,
			Setter {
				position,
				trigger: Rc::clone(&self.trigger),
				_value: PhantomData,
			},
		)
	}
}

/// Updater half of a state slot, as returned by [`Scope::state`].
///
/// `Setter`s are meant to be moved into click handlers. They stay valid across render passes
/// (the slot position *is* the identity); once the owning [`Root`](`crate::root::Root`) has
/// been dropped, [`Setter::set`] degrades to a warning no-op.
pub struct Setter<T> {
	position: usize,
	trigger: UpdateTrigger,
	_value: PhantomData<fn(T)>,
}

impl<T> Clone for Setter<T> {
	fn clone(&self) -> Self {
		Self {
			position: self.position,
			trigger: Rc::clone(&self.trigger),
			_value: PhantomData,
		}
	}
}

impl<T: 'static> Setter<T> {
	/// Writes the slot and synchronously runs a full render cycle, which completes before this
	/// call returns.
	///
	/// Only call this from event-handler context. Calling it while a render pass is already on
	/// the stack is a contract violation and panics on the root binding's interior borrow.
	pub fn set(&self, value: T) {
		(self.trigger)(self.position, Rc::new(value));
	}
}
