use std::sync::Once;
use suberin::{element::Element, memory::MemorySurface, root::Root, state::Scope, surface::Surface};

static LOG_INITIALIZED: Once = Once::new();

fn init_logging() {
	LOG_INITIALIZED.call_once(|| {
		tracing_subscriber::fmt().with_test_writer().init();
	});
}

// Two-component app: `counter` owns one slot and nests `on_off`, which owns another. Slot
// positions interleave across the component boundary purely by call order.

fn counter(scope: &mut Scope<'_>) -> Element {
	let (count, set_count) = scope.state(0_i32);

	Element::new("div")
		.nested(Element::new("p").text("Count: ").text(&format!("{} ", count)))
		.nested(Element::new("button").on_click(move || set_count.set(count + 1)).text("Increment"))
		.nested(on_off(scope))
}

fn on_off(scope: &mut Scope<'_>) -> Element {
	let (on, set_on) = scope.state(false);

	Element::new("div")
		.nested(Element::new("p").text(if on { "On" } else { "Off" }))
		.nested(Element::new("button").on_click(move || set_on.set(!on)).text("Toggle"))
}

#[test]
fn nested_components_update_independently() {
	init_logging();

	let surface = MemorySurface::new();
	let target = surface.create_node("app");
	let _root = Root::mount(surface.clone(), target.clone(), counter).unwrap();

	assert_eq!(
		surface.render_to_string(&target),
		"<app><div><p>Count: 0 </p><button>Increment</button><div><p>Off</p><button>Toggle</button></div></div></app>",
	);

	let outer = surface.child(&target, 0).unwrap();
	let increment = surface.child(&outer, 1).unwrap();
	let inner = surface.child(&outer, 2).unwrap();
	let toggle = surface.child(&inner, 1).unwrap();

	surface.click(&increment);
	assert_eq!(
		surface.render_to_string(&target),
		"<app><div><p>Count: 1 </p><button>Increment</button><div><p>Off</p><button>Toggle</button></div></div></app>",
	);

	surface.click(&toggle);
	assert_eq!(
		surface.render_to_string(&target),
		"<app><div><p>Count: 1 </p><button>Increment</button><div><p>On</p><button>Toggle</button></div></div></app>",
	);

	// The other component's slot is untouched by either update.
	surface.click(&increment);
	assert_eq!(
		surface.render_to_string(&target),
		"<app><div><p>Count: 2 </p><button>Increment</button><div><p>On</p><button>Toggle</button></div></div></app>",
	);
}

#[test]
fn rendered_nodes_are_reused_across_updates() {
	init_logging();

	let surface = MemorySurface::new();
	let target = surface.create_node("app");
	let _root = Root::mount(surface.clone(), target.clone(), counter).unwrap();

	let nodes_created = surface.nodes_created();

	let outer = surface.child(&target, 0).unwrap();
	let increment = surface.child(&outer, 1).unwrap();
	let inner = surface.child(&outer, 2).unwrap();
	let toggle = surface.child(&inner, 1).unwrap();

	surface.click(&increment);
	surface.click(&toggle);
	surface.click(&increment);

	assert_eq!(surface.nodes_created(), nodes_created);
}
