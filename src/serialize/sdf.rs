//! MDL SDF V2000 writer.

use std::fmt::{self, Write as _};

use crate::chem::{Dimensionality, Molecule};
use crate::error::SerializationError;

/// V2000 counts fields are three columns wide.
const MAX_COUNT: usize = 999;

/// Whether `c` fits a 10-column `%10.4f` coordinate field.
fn fits_coordinate_column(c: f32) -> bool {
    c > -10_000.0 && c < 100_000.0
}

/// Write one molecule as a single SDF record, data fields included.
pub fn write(entity: &str, mol: &Molecule) -> Result<String, SerializationError> {
    if mol.atoms.is_empty() {
        return Err(SerializationError::new(entity, "molecule has no atoms"));
    }
    if mol.atoms.len() > MAX_COUNT || mol.bonds.len() > MAX_COUNT {
        return Err(SerializationError::new(
            entity,
            format!(
                "{} atoms / {} bonds exceed the V2000 limit of {MAX_COUNT}",
                mol.atoms.len(),
                mol.bonds.len()
            ),
        ));
    }
    if let Some(atom) = mol.atoms.iter().find(|a| !a.position.is_finite()) {
        return Err(SerializationError::new(
            entity,
            format!("atom '{}' has non-finite coordinates", atom.name),
        ));
    }
    if let Some(atom) = mol
        .atoms
        .iter()
        .find(|a| !a.position.to_array().into_iter().all(fits_coordinate_column))
    {
        return Err(SerializationError::new(
            entity,
            format!(
                "atom '{}' at {} is outside the V2000 coordinate range",
                atom.name, atom.position
            ),
        ));
    }
    if let Some(bond) = mol
        .bonds
        .iter()
        .find(|b| b.a >= mol.atoms.len() || b.b >= mol.atoms.len())
    {
        return Err(SerializationError::new(
            entity,
            format!("bond {}-{} references a missing atom", bond.a, bond.b),
        ));
    }

    let mut out = String::new();
    write_record(&mut out, mol)
        .map_err(|e| SerializationError::new(entity, e.to_string()))?;
    Ok(out)
}

fn write_record(out: &mut String, mol: &Molecule) -> fmt::Result {
    let title: String = mol.title.lines().next().unwrap_or("").chars().take(80).collect();
    let dim = match mol.dimensionality {
        Dimensionality::ThreeD => "3D",
        Dimensionality::Flat => "2D",
    };
    writeln!(out, "{title}")?;
    writeln!(out, "  scenebook        {dim}")?;
    writeln!(out)?;
    writeln!(
        out,
        "{:3}{:3}  0  0  0  0  0  0  0  0999 V2000",
        mol.atoms.len(),
        mol.bonds.len()
    )?;

    for atom in &mol.atoms {
        let symbol = if atom.element.is_empty() { "C" } else { &atom.element };
        writeln!(
            out,
            "{:10.4}{:10.4}{:10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            atom.position.x, atom.position.y, atom.position.z, symbol
        )?;
    }
    for bond in &mol.bonds {
        writeln!(
            out,
            "{:3}{:3}{:3}  0  0  0  0",
            bond.a + 1,
            bond.b + 1,
            bond.order.mdl_code()
        )?;
    }

    let charged: Vec<_> = mol
        .atoms
        .iter()
        .enumerate()
        .filter(|(_, a)| a.formal_charge != 0)
        .collect();
    for chunk in charged.chunks(8) {
        write!(out, "M  CHG{:3}", chunk.len())?;
        for (idx, atom) in chunk {
            write!(out, " {:3} {:3}", idx + 1, atom.formal_charge)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "M  END")?;

    for (name, value) in &mol.properties {
        writeln!(out, "> <{name}>")?;
        writeln!(out, "{value}")?;
        writeln!(out)?;
    }
    writeln!(out, "$$$$")
}
