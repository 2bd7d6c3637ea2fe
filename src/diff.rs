use crate::{
	element::{Attribute, Child, ClickHandler, Element},
	handler_cell::HandlerCell,
	surface::Surface,
};
use std::rc::Rc;
use tracing::{instrument, trace, trace_span, warn};

/// Fatal reconciliation error: a fixed child index's node kind disagrees between renders (text
/// vs. element).
///
/// The walk is positional, so a shape change under stable indices is not something this design
/// can absorb: the current pass aborts and the surface is left partially patched. Re-running
/// the cycle is the only documented remediation, with no consistency guarantee.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("child {child_index} of the element at position {position} changed kind between renders: expected {expected}, found {found}")]
pub struct StructuralMismatchError {
	/// Flat position of the element whose child list was being walked.
	pub position: usize,
	/// Index into that element's surface child list.
	pub child_index: usize,
	pub expected: &'static str,
	pub found: &'static str,
}

/// The reconciler's record of which surface node currently occupies each tree position.
///
/// Keyed by a flat counter incremented once per element description visited, depth-first in
/// child order, and reset at the start of each top-level [`TreeDiffer::run`]. The table is
/// owned by the root binding and never discarded, so node creation only fires for genuinely
/// new positions.
pub struct RefTable<N> {
	entries: Vec<RenderedNode<N>>,
}

struct RenderedNode<N> {
	node: N,
	tag: String,
	handler: Option<HandlerCell>,
}

impl<N> RefTable<N> {
	#[must_use]
	pub fn new() -> Self {
		Self { entries: Vec::new() }
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<N> Default for RefTable<N> {
	fn default() -> Self {
		Self::new()
	}
}

/// Walks an [`Element`] description in lock-step with the previously materialised surface tree,
/// creating, reusing or rebuilding rendering-surface nodes and patching only what changed.
///
/// # Correct Use
///
/// One `TreeDiffer` per pass, over the same [`RefTable`] on every pass. Feeding the table trees
/// whose element visit order changes between passes silently rebinds positions, exactly like
/// reordered state reads.
pub struct TreeDiffer<'a, S: Surface> {
	surface: &'a S,
	refs: &'a mut RefTable<S::Node>,
	position: usize,
}

impl<'a, S: Surface> TreeDiffer<'a, S> {
	pub fn new(surface: &'a S, refs: &'a mut RefTable<S::Node>) -> Self {
		Self { surface, refs, position: 0 }
	}

	/// Materialises or updates the subtree under `parent` to match `description`.
	///
	/// Unchanged attributes and text receive no surface writes; nodes reused across passes keep
	/// whatever identity-attached state the surface maintains for them, including across
	/// handler-only changes.
	///
	/// # Errors
	///
	/// [`StructuralMismatchError`] if a child's node kind flips between renders. The surface is
	/// left partially patched in that case.
	#[instrument(skip(self, description))]
	pub fn run(&mut self, parent: &S::Node, description: &Element) -> Result<(), StructuralMismatchError> {
		self.position = 0;
		self.diff_element(parent, description)
	}

	fn diff_element(&mut self, parent: &S::Node, description: &Element) -> Result<(), StructuralMismatchError> {
		let position = self.position;
		self.position += 1;

		let span = trace_span!("Diffing element", position, tag = description.tag.as_str());
		let _enter = span.enter();

		let node = self.materialise(parent, position, description);

		// Every attribute except children and the click handler. The surface is read first so
		// that an unchanged value costs no write.
		let mut click: Option<&ClickHandler> = None;
		for attribute in &description.attributes {
			match attribute {
				Attribute::Text { name, value } => {
					if self.surface.attribute(&node, name).as_deref() == Some(value.as_str()) {
						trace!("Attribute {:?} unchanged. Skipping.", name);
					} else {
						#[cfg(feature = "dangerous-logging")]
						trace!("Setting attribute {:?} to {:?}.", name, value);
						#[cfg(not(feature = "dangerous-logging"))]
						trace!("Setting attribute {:?}.", name);
						self.surface.set_attribute(&node, name, value);
					}
				}
				// Last one wins, like repeated property assignments.
				Attribute::Click(handler) => click = Some(handler),
			}
		}
		//TODO: Remove attributes whose names disappeared since the previous pass.

		self.rebind_click(position, &node, click);

		self.diff_children(position, &node, &description.children)
	}

	/// Ensures a surface node of the right tag exists at `position` and is recorded there.
	fn materialise(&mut self, parent: &S::Node, position: usize, description: &Element) -> S::Node {
		if position == self.refs.entries.len() {
			trace!("New position {}. Creating <{}>.", position, description.tag);
			let node = self.surface.create_node(&description.tag);
			self.surface.append_child(parent, &node);
			self.refs.entries.push(RenderedNode {
				node: node.clone(),
				tag: description.tag.clone(),
				handler: None,
			});
			return node;
		}

		let entry = &mut self.refs.entries[position];
		if entry.tag != description.tag {
			// Same position, different tag: rebuild the node in place. Descendant table
			// entries keep pointing into the detached subtree; positional identity does not
			// survive shape changes.
			warn!("Expected to update <{}> but position {} holds <{}>. Recreating the node.", description.tag, position, entry.tag);
			let node = self.surface.create_node(&description.tag);
			self.surface.replace_node(&entry.node, &node);
			*entry = RenderedNode {
				node: node.clone(),
				tag: description.tag.clone(),
				handler: None,
			};
			return node;
		}
		entry.node.clone()
	}

	/// Swaps the node's current click handler behind its single registered listener.
	fn rebind_click(&mut self, position: usize, node: &S::Node, handler: Option<&ClickHandler>) {
		let entry = &mut self.refs.entries[position];
		match handler {
			Some(handler) => {
				if let Some(cell) = &entry.handler {
					cell.set(Rc::clone(handler));
				} else {
					trace!("First handler at position {}. Registering the listener.", position);
					let cell = HandlerCell::new();
					cell.set(Rc::clone(handler));
					self.surface.add_click_listener(node, cell.trampoline());
					entry.handler = Some(cell);
				}
			}
			None => {
				if let Some(cell) = &entry.handler {
					trace!("Handler removed at position {}. Clearing.", position);
					cell.clear();
				}
			}
		}
	}

	fn diff_children(&mut self, position: usize, node: &S::Node, children: &[Child]) -> Result<(), StructuralMismatchError> {
		// The index into the surface child list advances for entries that occupy a child slot;
		// `Child::None` does not.
		let mut child_index = 0;
		for child in children {
			match child {
				Child::Text(text) => {
					match self.surface.child(node, child_index) {
						None => {
							#[cfg(feature = "dangerous-logging")]
							trace!("Appending text node {:?} at child index {}.", text, child_index);
							#[cfg(not(feature = "dangerous-logging"))]
							trace!("Appending text node at child index {}.", child_index);
							let text_node = self.surface.create_text_node(text);
							self.surface.append_child(node, &text_node);
						}
						Some(existing) => {
							if !self.surface.is_text(&existing) {
								return Err(StructuralMismatchError {
									position,
									child_index,
									expected: "a text node",
									found: "an element",
								});
							}
							if self.surface.text(&existing).as_deref() == Some(text.as_str()) {
								trace!("Text at child index {} unchanged. Skipping.", child_index);
							} else {
								#[cfg(feature = "dangerous-logging")]
								trace!("Updating text at child index {} to {:?}.", child_index, text);
								#[cfg(not(feature = "dangerous-logging"))]
								trace!("Updating text at child index {}.", child_index);
								self.surface.set_text(&existing, text);
							}
						}
					}
					child_index += 1;
				}
				Child::Nested(nested) => {
					if let Some(existing) = self.surface.child(node, child_index) {
						if self.surface.is_text(&existing) {
							return Err(StructuralMismatchError {
								position,
								child_index,
								expected: "an element",
								found: "a text node",
							});
						}
					}
					self.diff_element(node, nested)?;
					child_index += 1;
				}
				Child::None => trace!("Skipping `Child::None` entry; no child slot consumed."),
			}
		}
		Ok(())
	}
}
