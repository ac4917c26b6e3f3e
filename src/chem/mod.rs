//! Chemistry-side data handed to the scene builder.
//!
//! Molecules, complexes and design units are plain data; anything that needs
//! real chemistry (conformer generation, substructure search) goes through
//! the [`Toolkit`] trait.

pub mod io;
mod molecule;
mod toolkit;

pub use molecule::{
    Atom, Bond, BondOrder, Complex, Component, ComponentRole, DesignUnit,
    Dimensionality, Molecule, Residue,
};
pub use toolkit::{NullToolkit, Toolkit, ToolkitError};
