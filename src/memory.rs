use crate::surface::Surface;
use core::fmt::Write as _;
use hashbrown::HashMap;
use std::{cell::RefCell, rc::Rc};
use tracing::{trace, warn};

/// Reference [`Surface`] implementation backed by an in-process node arena.
///
/// Useful for headless rendering and as the rendering target in tests: clicks can be driven
/// through [`MemorySurface::click`], and every write the runtime issues is counted, so
/// no-redundant-write guarantees are directly observable.
#[derive(Clone)]
pub struct MemorySurface {
	shared: Rc<RefCell<Arena>>,
}

/// Reference to one node in a [`MemorySurface`]. Equality is node identity.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MemoryNode(usize);

#[derive(Default)]
struct Arena {
	nodes: Vec<NodeData>,
	nodes_created: usize,
	attribute_writes: usize,
	text_writes: usize,
}

struct NodeData {
	kind: NodeKind,
	attributes: HashMap<String, String>,
	// Insertion order, so `attribute_names` and the serialiser are deterministic.
	attribute_order: Vec<String>,
	children: Vec<usize>,
	listener: Option<Rc<dyn Fn()>>,
}

enum NodeKind {
	Element { tag: String },
	Text { data: String },
}

impl Arena {
	fn alloc(&mut self, kind: NodeKind) -> usize {
		let index = self.nodes.len();
		self.nodes.push(NodeData {
			kind,
			attributes: HashMap::new(),
			attribute_order: Vec::new(),
			children: Vec::new(),
			listener: None,
		});
		self.nodes_created += 1;
		index
	}

	fn write_node(&self, index: usize, out: &mut String) {
		let node = &self.nodes[index];
		match &node.kind {
			NodeKind::Text { data } => out.push_str(data),
			NodeKind::Element { tag } => {
				out.push('<');
				out.push_str(tag);
				for name in &node.attribute_order {
					write!(out, " {}={:?}", name, node.attributes[name.as_str()]).expect("writing to a `String` can't fail");
				}
				out.push('>');
				for &child in &node.children {
					self.write_node(child, out);
				}
				write!(out, "</{}>", tag).expect("writing to a `String` can't fail");
			}
		}
	}
}

impl MemorySurface {
	#[must_use]
	pub fn new() -> Self {
		Self {
			shared: Rc::new(RefCell::new(Arena::default())),
		}
	}

	/// Dispatches a click to the listener registered on `node`, if any.
	///
	/// The arena borrow ends before the listener runs, so listeners are free to call back into
	/// the surface — which is the entire update path.
	pub fn click(&self, node: &MemoryNode) {
		let listener = self.shared.borrow().nodes[node.0].listener.clone();
		match listener {
			Some(listener) => listener(),
			None => trace!("Click on {:?} without a listener. Ignoring.", node),
		}
	}

	#[must_use]
	pub fn nodes_created(&self) -> usize {
		self.shared.borrow().nodes_created
	}

	#[must_use]
	pub fn attribute_writes(&self) -> usize {
		self.shared.borrow().attribute_writes
	}

	#[must_use]
	pub fn text_writes(&self) -> usize {
		self.shared.borrow().text_writes
	}

	/// Serialises the subtree under `node` into an HTML-ish string for assertions.
	#[must_use]
	pub fn render_to_string(&self, node: &MemoryNode) -> String {
		let mut out = String::new();
		self.shared.borrow().write_node(node.0, &mut out);
		out
	}
}

impl Default for MemorySurface {
	fn default() -> Self {
		Self::new()
	}
}

impl Surface for MemorySurface {
	type Node = MemoryNode;

	fn create_node(&self, tag: &str) -> MemoryNode {
		MemoryNode(self.shared.borrow_mut().alloc(NodeKind::Element { tag: tag.to_owned() }))
	}

	fn create_text_node(&self, text: &str) -> MemoryNode {
		MemoryNode(self.shared.borrow_mut().alloc(NodeKind::Text { data: text.to_owned() }))
	}

	fn append_child(&self, parent: &MemoryNode, child: &MemoryNode) {
		self.shared.borrow_mut().nodes[parent.0].children.push(child.0);
	}

	fn replace_node(&self, old: &MemoryNode, new: &MemoryNode) {
		let mut arena = self.shared.borrow_mut();
		for node in &mut arena.nodes {
			if let Some(slot) = node.children.iter().position(|&child| child == old.0) {
				node.children[slot] = new.0;
				return;
			}
		}
		warn!("`replace_node`: {:?} has no parent. Ignoring.", old);
	}

	fn set_attribute(&self, node: &MemoryNode, name: &str, value: &str) {
		let mut arena = self.shared.borrow_mut();
		arena.attribute_writes += 1;
		let data = &mut arena.nodes[node.0];
		if !data.attributes.contains_key(name) {
			data.attribute_order.push(name.to_owned());
		}
		data.attributes.insert(name.to_owned(), value.to_owned());
	}

	fn attribute(&self, node: &MemoryNode, name: &str) -> Option<String> {
		self.shared.borrow().nodes[node.0].attributes.get(name).cloned()
	}

	fn attribute_names(&self, node: &MemoryNode) -> Vec<String> {
		self.shared.borrow().nodes[node.0].attribute_order.clone()
	}

	fn set_text(&self, node: &MemoryNode, text: &str) {
		let mut arena = self.shared.borrow_mut();
		arena.text_writes += 1;
		match &mut arena.nodes[node.0].kind {
			NodeKind::Text { data } => *data = text.to_owned(),
			NodeKind::Element { tag } => warn!("`set_text` on element <{}>. Ignoring.", tag),
		}
	}

	fn text(&self, node: &MemoryNode) -> Option<String> {
		match &self.shared.borrow().nodes[node.0].kind {
			NodeKind::Text { data } => Some(data.clone()),
			NodeKind::Element { .. } => None,
		}
	}

	fn child(&self, parent: &MemoryNode, index: usize) -> Option<MemoryNode> {
		self.shared.borrow().nodes[parent.0].children.get(index).copied().map(MemoryNode)
	}

	fn child_count(&self, parent: &MemoryNode) -> usize {
		self.shared.borrow().nodes[parent.0].children.len()
	}

	fn is_text(&self, node: &MemoryNode) -> bool {
		matches!(self.shared.borrow().nodes[node.0].kind, NodeKind::Text { .. })
	}

	fn tag(&self, node: &MemoryNode) -> Option<String> {
		match &self.shared.borrow().nodes[node.0].kind {
			NodeKind::Element { tag } => Some(tag.clone()),
			NodeKind::Text { .. } => None,
		}
	}

	fn add_click_listener(&self, node: &MemoryNode, callback: Rc<dyn Fn()>) {
		let mut arena = self.shared.borrow_mut();
		let data = &mut arena.nodes[node.0];
		if data.listener.is_some() {
			warn!("Second click listener on {:?}. Replacing; the runtime registers at most one.", node);
		}
		data.listener = Some(callback);
	}
}
