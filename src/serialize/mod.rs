//! Structural text for entities: SDF for molecules, PDB for complexes.
//!
//! Serialization happens at assembly time, one entity at a time. A failure
//! is fatal for that entity only; the assembler decides what to do with it.

pub mod pdb;
pub mod sdf;

use serde::Serialize;

use crate::chem::{Atom, Complex, Molecule, Toolkit};
use crate::error::{RenderWarning, SerializationError};
use crate::scene::{Entity, EntityKind, EntitySource};

/// Text format of a structural payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralFormat {
    /// MDL SDF V2000.
    Sdf,
    /// Protein Data Bank.
    Pdb,
}

/// Serialized structure ready to embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    /// Text format.
    pub format: StructuralFormat,
    /// File contents.
    pub text: String,
}

/// An entity after serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedEntity {
    /// Entity id.
    pub id: String,
    /// Molecule or complex.
    pub kind: EntityKind,
    /// Shown when the document opens.
    pub displayed: bool,
    /// Structural text.
    pub payload: Payload,
    /// Atoms as written, with hetero flags resolved. Used for proximity
    /// queries.
    pub(crate) atoms: Vec<Atom>,
}

/// Serialize one scene entity.
///
/// Molecules without a 3D conformation are sent through
/// [`Toolkit::generate_coordinates`]; both the generation and its failure
/// are reported as warnings, never as errors.
pub fn prepare(
    entity: &Entity,
    toolkit: &dyn Toolkit,
    warnings: &mut Vec<RenderWarning>,
) -> Result<PreparedEntity, SerializationError> {
    let id = entity.id();
    let (payload, atoms) = match entity.source() {
        EntitySource::Molecule(mol) => {
            let mol = with_coordinates(id, mol, toolkit, warnings);
            let text = sdf::write(id, &mol)?;
            let atoms = mol
                .atoms
                .into_iter()
                .map(|mut a| {
                    a.hetero = true;
                    a
                })
                .collect();
            (
                Payload {
                    format: StructuralFormat::Sdf,
                    text,
                },
                atoms,
            )
        }
        EntitySource::Complex(complex) => (
            Payload {
                format: StructuralFormat::Pdb,
                text: pdb::write(id, complex)?,
            },
            complex_atoms(complex),
        ),
    };
    log::debug!(
        "serialized '{id}' as {:?} ({} bytes)",
        payload.format,
        payload.text.len()
    );
    Ok(PreparedEntity {
        id: id.to_owned(),
        kind: entity.kind(),
        displayed: entity.displayed(),
        payload,
        atoms,
    })
}

fn with_coordinates(
    id: &str,
    mol: &Molecule,
    toolkit: &dyn Toolkit,
    warnings: &mut Vec<RenderWarning>,
) -> Molecule {
    if mol.has_3d_coordinates() || mol.atoms.is_empty() {
        return mol.clone();
    }
    let warning = match toolkit.generate_coordinates(mol) {
        Ok(generated) => {
            let warning = RenderWarning::MissingCoordinates {
                entity: id.to_owned(),
            };
            log::warn!("{warning}");
            warnings.push(warning);
            return generated;
        }
        Err(e) => RenderWarning::coordinate_failure(id, &e),
    };
    log::warn!("{warning}");
    warnings.push(warning);
    mol.clone()
}

/// Every atom of a complex in component order, hetero when either the atom
/// or its component role says so.
pub(crate) fn complex_atoms(complex: &Complex) -> Vec<Atom> {
    complex
        .components
        .iter()
        .flat_map(|c| {
            let role_hetero = c.role.is_hetero();
            c.molecule.atoms.iter().map(move |a| {
                let mut atom = a.clone();
                atom.hetero |= role_hetero;
                atom
            })
        })
        .collect()
}
