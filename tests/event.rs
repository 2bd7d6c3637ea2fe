use std::sync::Once;
use suberin::{element::Element, memory::MemorySurface, root::Root, state::Scope, surface::Surface};

static LOG_INITIALIZED: Once = Once::new();

fn init_logging() {
	LOG_INITIALIZED.call_once(|| {
		tracing_subscriber::fmt().with_test_writer().init();
	});
}

fn counter(scope: &mut Scope<'_>) -> Element {
	let (count, set_count) = scope.state(0_i32);
	Element::new("div")
		.nested(Element::new("p").text(&format!("Count: {}", count)))
		.nested(Element::new("button").on_click(move || set_count.set(count + 1)).text("Increment"))
}

#[test]
fn click_updates_text_in_place() {
	init_logging();

	let surface = MemorySurface::new();
	let target = surface.create_node("app");
	let _root = Root::mount(surface.clone(), target.clone(), counter).unwrap();

	let div = surface.child(&target, 0).unwrap();
	let p = surface.child(&div, 0).unwrap();
	let p_text = surface.child(&p, 0).unwrap();
	let button = surface.child(&div, 1).unwrap();
	assert_eq!(surface.text(&p_text).as_deref(), Some("Count: 0"));

	let nodes_created = surface.nodes_created();
	surface.click(&button);

	// Same paragraph and text node instances, patched in place; nothing new created.
	assert_eq!(surface.child(&div, 0), Some(p.clone()));
	assert_eq!(surface.child(&p, 0), Some(p_text.clone()));
	assert_eq!(surface.text(&p_text).as_deref(), Some("Count: 1"));
	assert_eq!(surface.nodes_created(), nodes_created);

	surface.click(&button);
	assert_eq!(surface.text(&p_text).as_deref(), Some("Count: 2"));
}

#[test]
fn handler_only_change_preserves_node_identity() {
	init_logging();

	let surface = MemorySurface::new();
	let target = surface.create_node("app");
	let _root = Root::mount(surface.clone(), target.clone(), counter).unwrap();

	let div = surface.child(&target, 0).unwrap();
	let button = surface.child(&div, 1).unwrap();

	// Each pass mints a fresh handler closing over the new count; the rendered button must
	// nevertheless stay the same node.
	surface.click(&button);
	assert_eq!(surface.child(&div, 1), Some(button.clone()));

	// The swapped-in handler sees the updated snapshot.
	surface.click(&button);
	let p = surface.child(&div, 0).unwrap();
	let p_text = surface.child(&p, 0).unwrap();
	assert_eq!(surface.text(&p_text).as_deref(), Some("Count: 2"));
}

fn eager(scope: &mut Scope<'_>) -> Element {
	let (n, set_n) = scope.state(0_i32);
	Element::new("div")
		.nested(Element::new("p").text(&format!("{}", n)))
		.nested(
			Element::new("button")
				.on_click(move || {
					// Both updates run against this handler's snapshot of `n`; each completes a
					// full render pass before returning.
					set_n.set(n + 1);
					set_n.set(n + 2);
				})
				.text("go"),
		)
}

#[test]
fn sequential_updates_serialize() {
	init_logging();

	let surface = MemorySurface::new();
	let target = surface.create_node("app");
	let _root = Root::mount(surface.clone(), target.clone(), eager).unwrap();

	let div = surface.child(&target, 0).unwrap();
	let p = surface.child(&div, 0).unwrap();
	let p_text = surface.child(&p, 0).unwrap();
	let button = surface.child(&div, 1).unwrap();

	surface.click(&button);
	assert_eq!(surface.text(&p_text).as_deref(), Some("2"));
}

#[test]
fn updates_after_root_drop_are_ignored() {
	init_logging();

	let surface = MemorySurface::new();
	let target = surface.create_node("app");
	let root = Root::mount(surface.clone(), target.clone(), counter).unwrap();

	let div = surface.child(&target, 0).unwrap();
	let p = surface.child(&div, 0).unwrap();
	let p_text = surface.child(&p, 0).unwrap();
	let button = surface.child(&div, 1).unwrap();

	drop(root);

	// The rendered output stays, but the binding is retired.
	surface.click(&button);
	assert_eq!(surface.text(&p_text).as_deref(), Some("Count: 0"));
}
