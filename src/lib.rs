#![doc(html_root_url = "https://docs.rs/suberin/0.0.1")]
#![warn(clippy::pedantic)]

//! An incremental tree reconciler with positional hook-style state, over an abstract rendering
//! surface.
//!
//! Component functions assemble [`element::Element`] descriptions and read state through
//! [`state::Scope`]; [`root::Root`] owns the binding that re-invokes them and drives
//! [`diff::TreeDiffer`] whenever a [`state::Setter`] fires. Anything that can implement
//! [`surface::Surface`] can be rendered to; [`memory::MemorySurface`] is the built-in
//! reference target.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod diff;
pub mod element;
mod handler_cell;
pub mod load;
pub mod memory;
pub mod root;
pub mod state;
pub mod surface;
