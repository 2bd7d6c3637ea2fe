use core::fmt::Debug;
use std::rc::Rc;

/// The capability boundary to whatever physically renders: a document tree, a terminal grid, or
/// the in-memory surface in [`crate::memory`].
///
/// Implementations are *handles*: cloning a `Surface` clones a reference to the same underlying
/// surface, and cloning a [`Surface::Node`] clones a reference to the same rendered node, so
/// node equality is node identity. All methods take `&self` — the surface mediates its own
/// interior mutability, which is what allows a click listener to re-enter the runtime while the
/// dispatching surface call is still on the stack.
///
/// The core never reads layout or style through this boundary.
pub trait Surface: Clone {
	/// Reference to one rendered node. Equality compares identity, not content.
	///
	/// `'static` because the runtime stores node references in the root binding, which outlives
	/// any single render pass.
	type Node: Clone + PartialEq + Debug + 'static;

	fn create_node(&self, tag: &str) -> Self::Node;
	fn create_text_node(&self, text: &str) -> Self::Node;
	fn append_child(&self, parent: &Self::Node, child: &Self::Node);
	/// Swaps `new` into `old`'s place under `old`'s parent, detaching `old` and its subtree.
	fn replace_node(&self, old: &Self::Node, new: &Self::Node);
	fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
	fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
	/// Attribute names currently present on `node`, in surface order.
	fn attribute_names(&self, node: &Self::Node) -> Vec<String>;
	fn set_text(&self, node: &Self::Node, text: &str);
	/// Text content of a text node. [`None`] for element nodes.
	fn text(&self, node: &Self::Node) -> Option<String>;
	fn child(&self, parent: &Self::Node, index: usize) -> Option<Self::Node>;
	fn child_count(&self, parent: &Self::Node) -> usize;
	fn is_text(&self, node: &Self::Node) -> bool;
	/// Tag of an element node. [`None`] for text nodes.
	fn tag(&self, node: &Self::Node) -> Option<String>;
	/// Registers `callback` for click events on `node`.
	///
	/// The runtime registers at most one listener per node and never removes it; rebinding
	/// happens behind the callback (see [`crate::diff`]). Implementations need not support
	/// de-duplication or removal.
	fn add_click_listener(&self, node: &Self::Node, callback: Rc<dyn Fn()>);
}
