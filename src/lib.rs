// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Self-contained 3D molecular scene documents for notebooks.
//!
//! Scenebook compiles a declarative scene (molecules, complexes and design
//! units plus style rules, a preset, a camera target and chrome settings)
//! into one HTML document that embeds the rendering library, the structure
//! data and all of its own scripts. The document never touches the network.
//! Next to the scene viewer sits a molecule grid widget that reports its
//! selection back to the host through one message channel.
//!
//! # Key entry points
//!
//! - [`scene::SceneBuilder`] - the only way to mutate a scene
//! - [`document::assemble`] - scene model → [`document::Artifact`]
//! - [`serialize`] - SDF/PDB text for each entity
//! - [`grid::MolGrid`] - selectable molecule grid and its host model
//! - [`options::Options`] - defaults for size, background, chrome and grid
//!
//! # Architecture
//!
//! Building a scene only records intent. Rendering freezes the model,
//! serializes every entity (generating coordinates through a
//! [`chem::Toolkit`] where needed), resolves preset precedence, and inlines
//! everything into the page. A failing entity is dropped with a warning
//! instead of failing the document.

pub mod assets;
pub mod chem;
pub mod document;
pub mod error;
pub mod grid;
pub mod options;
pub mod scene;
pub mod serialize;

/// Common imports for building and rendering scenes.
pub mod prelude {
    pub use crate::chem::{Complex, DesignUnit, Molecule, Toolkit};
    pub use crate::document::{
        AssemblyContext, Artifact, Displayable, MimeBundle, RenderLibrary,
    };
    pub use crate::error::{RenderWarning, SceneError, ValidationError};
    pub use crate::grid::{GridItem, MolGrid};
    pub use crate::options::Options;
    pub use crate::scene::{
        EntityOptions, Representation, SceneBuilder, Selector, StyleParams,
        UiConfig, ZoomTarget,
    };
}
