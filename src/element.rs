use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// Shared zero-argument click callback.
///
/// Handlers close over the state snapshot of the render pass that produced them, so component
/// functions mint a fresh closure on every pass and the previously rendered one is dropped when
/// the reconciler swaps it out.
pub type ClickHandler = Rc<dyn Fn()>;

/// A single attribute of an [`Element`].
#[derive(Clone)]
pub enum Attribute {
	/// A plain string attribute.
	Text {
		name: String,
		value: String,
	},
	/// The element's click handler. At most one is honoured per element; the last one wins,
	/// matching a plain property assignment.
	Click(ClickHandler),
}

impl Debug for Attribute {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Attribute::Text { name, value } => f.debug_struct("Text").field("name", name).field("value", value).finish(),
			Attribute::Click(_) => f.debug_tuple("Click").field(&"..").finish(),
		}
	}
}

/// One entry in an [`Element`]'s ordered child list.
#[derive(Clone, Debug)]
pub enum Child {
	/// Literal text content.
	Text(String),
	/// A nested element subtree.
	Nested(Element),
	/// Renders no node and does not consume a surface child slot.
	///
	/// Interleaving [`Child::None`] differently with real entries across passes shifts the
	/// sibling indices the walk keys on; see [`crate::diff`].
	None,
}

impl From<Element> for Child {
	fn from(element: Element) -> Self {
		Child::Nested(element)
	}
}

impl From<&str> for Child {
	fn from(text: &str) -> Self {
		Child::Text(text.to_owned())
	}
}

/// An immutable description of one node and its subtree, produced fresh by component functions
/// on every render pass and consumed by [`TreeDiffer`](`crate::diff::TreeDiffer`).
///
/// `Element`s are plain values: they are not mutated after construction and own no
/// rendering-surface resources.
#[derive(Clone, Debug)]
pub struct Element {
	pub tag: String,
	pub attributes: Vec<Attribute>,
	pub children: Vec<Child>,
}

impl Element {
	#[must_use]
	pub fn new(tag: &str) -> Self {
		Self {
			tag: tag.to_owned(),
			attributes: Vec::new(),
			children: Vec::new(),
		}
	}

	#[must_use]
	pub fn attribute(mut self, name: &str, value: &str) -> Self {
		self.attributes.push(Attribute::Text {
			name: name.to_owned(),
			value: value.to_owned(),
		});
		self
	}

	#[must_use]
	pub fn on_click(mut self, handler: impl Fn() + 'static) -> Self {
		self.attributes.push(Attribute::Click(Rc::new(handler)));
		self
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<Child>) -> Self {
		self.children.push(child.into());
		self
	}

	#[must_use]
	pub fn text(mut self, text: &str) -> Self {
		self.children.push(Child::Text(text.to_owned()));
		self
	}

	#[must_use]
	pub fn nested(mut self, element: Element) -> Self {
		self.children.push(Child::Nested(element));
		self
	}
}
