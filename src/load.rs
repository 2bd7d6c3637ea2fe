use crate::{
	element::{Attribute, Child, Element},
	surface::Surface,
};

pub fn load_child_nodes<S: Surface>(surface: &S, parent: &S::Node) -> Vec<Child> {
	(0..surface.child_count(parent))
		.map(|i| {
			let child = surface.child(parent, i).expect("suberin bug: child index within `child_count`");
			if surface.is_text(&child) {
				Child::Text(surface.text(&child).expect("suberin bug: `is_text` node without text"))
			} else {
				Child::Nested(load_element(surface, &child))
			}
		})
		.collect()
}

pub fn load_element<S: Surface>(surface: &S, node: &S::Node) -> Element {
	Element {
		tag: surface.tag(node).expect("`load_element` called on a non-element node"),
		attributes: load_attributes(surface, node),
		children: load_child_nodes(surface, node),
	}
}

pub fn load_attributes<S: Surface>(surface: &S, node: &S::Node) -> Vec<Attribute> {
	// Click handlers are not recoverable from a surface; they load as absent.
	surface
		.attribute_names(node)
		.into_iter()
		.map(|name| {
			let value = surface.attribute(node, &name).unwrap_or_default();
			Attribute::Text { name, value }
		})
		.collect()
}
