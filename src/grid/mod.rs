//! Molecule grid widget.
//!
//! A grid runs inside a sandboxed `iframe srcdoc` surface. Search, sorting
//! and pagination stay local to the surface; every checkbox change posts the
//! complete selection to the host as
//! `{gridId, type: "MOLGRID_SELECTION", selection}`. The host keeps one
//! listener for all grids and replaces a grid's selection wholesale on
//! every message addressed to it.
//!
//! [`GridView`] holds the surface rules in Rust (the embedded script mirrors
//! them); [`HostListener`] and [`GridModel`] are the host side.

mod debounce;
mod document;
pub mod host;
mod item;
mod message;
mod view;

pub use debounce::Debouncer;
pub use document::MolGrid;
pub use host::{channel, GridModel, HostListener, SurfacePort};
pub use item::GridItem;
pub use message::{SelectionMessage, SELECTION_TYPE};
pub use view::{GridView, LiteralMatcher, PatternMatcher, SearchMode, ToolkitMatcher};
