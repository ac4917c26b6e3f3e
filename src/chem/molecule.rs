use std::collections::BTreeMap;

use glam::Vec3;

// ---------------------------------------------------------------------------
// Atoms and bonds
// ---------------------------------------------------------------------------

/// Residue context of an atom inside a macromolecule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    /// Three-letter residue name (e.g. `"ALA"`, `"HOH"`).
    pub name: String,
    /// Residue sequence number.
    pub number: i32,
    /// Chain identifier.
    pub chain: String,
    /// Insertion code, if any.
    pub insertion: Option<char>,
}

impl Residue {
    /// Create a residue without insertion code.
    #[must_use]
    pub fn new(name: &str, number: i32, chain: &str) -> Self {
        Self {
            name: name.to_owned(),
            number,
            chain: chain.to_owned(),
            insertion: None,
        }
    }

    /// Whether this is a water residue.
    #[must_use]
    pub fn is_water(&self) -> bool {
        matches!(self.name.trim(), "HOH" | "WAT" | "H2O" | "DOD" | "SOL")
    }
}

/// A single atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom name (e.g. `"CA"`); the element symbol for small molecules.
    pub name: String,
    /// Element symbol with conventional capitalization (e.g. `"Cl"`).
    pub element: String,
    /// Cartesian position in Angstroms.
    pub position: Vec3,
    /// Residue context, absent for small molecules.
    pub residue: Option<Residue>,
    /// Hetero atom (ligand, solvent, cofactor).
    pub hetero: bool,
    /// Formal charge.
    pub formal_charge: i8,
}

impl Atom {
    /// Create an atom with no residue context.
    #[must_use]
    pub fn new(name: &str, element: &str, position: Vec3) -> Self {
        Self {
            name: name.to_owned(),
            element: element.to_owned(),
            position,
            residue: None,
            hetero: false,
            formal_charge: 0,
        }
    }

    /// Attach residue context.
    #[must_use]
    pub fn with_residue(mut self, residue: Residue) -> Self {
        self.residue = Some(residue);
        self
    }

    /// Mark as hetero atom.
    #[must_use]
    pub fn hetero(mut self) -> Self {
        self.hetero = true;
        self
    }
}

/// Bond multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BondOrder {
    /// Single bond.
    #[default]
    Single,
    /// Double bond.
    Double,
    /// Triple bond.
    Triple,
    /// Aromatic bond.
    Aromatic,
}

impl BondOrder {
    /// MDL bond type code.
    #[must_use]
    pub fn mdl_code(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Aromatic => 4,
        }
    }

    /// Parse an MDL bond type code. Unknown codes read as single.
    #[must_use]
    pub fn from_mdl_code(code: u8) -> Self {
        match code {
            2 => Self::Double,
            3 => Self::Triple,
            4 => Self::Aromatic,
            _ => Self::Single,
        }
    }
}

/// A bond between two atoms, by zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    /// First atom index.
    pub a: usize,
    /// Second atom index.
    pub b: usize,
    /// Bond order.
    pub order: BondOrder,
}

// ---------------------------------------------------------------------------
// Molecule
// ---------------------------------------------------------------------------

/// Whether a molecule's coordinates describe a 3D conformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimensionality {
    /// 2D depiction coordinates (or none at all).
    Flat,
    /// A real 3D conformation.
    #[default]
    ThreeD,
}

/// A molecule as handed over by the chemistry toolkit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Molecule {
    /// Title (first SDF line, PDB TITLE record).
    pub title: String,
    /// Atoms in file order.
    pub atoms: Vec<Atom>,
    /// Bonds by atom index.
    pub bonds: Vec<Bond>,
    /// Coordinate dimensionality.
    pub dimensionality: Dimensionality,
    /// Line notation of the structure, used as the grid's structure field.
    pub smiles: Option<String>,
    /// Named data fields (SDF `> <name>` blocks).
    pub properties: BTreeMap<String, String>,
}

impl Molecule {
    /// Create an empty 3D molecule with a title.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            ..Self::default()
        }
    }

    /// Append an atom, returning its index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    /// Append a bond between two existing atoms.
    pub fn add_bond(&mut self, a: usize, b: usize, order: BondOrder) {
        self.bonds.push(Bond { a, b, order });
    }

    /// Whether the coordinates are a usable 3D conformation.
    #[must_use]
    pub fn has_3d_coordinates(&self) -> bool {
        self.dimensionality == Dimensionality::ThreeD
            && self.atoms.iter().any(|a| a.position.z != 0.0)
    }

    /// Whether every atom carries chain/residue naming.
    #[must_use]
    pub fn has_residue_naming(&self) -> bool {
        !self.atoms.is_empty()
            && self.atoms.iter().all(|a| {
                a.residue.as_ref().is_some_and(|r| !r.chain.trim().is_empty())
            })
    }
}

// ---------------------------------------------------------------------------
// Complex
// ---------------------------------------------------------------------------

/// Role of a component inside a multi-component complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentRole {
    /// Protein or peptide polymer.
    Protein,
    /// DNA / RNA polymer.
    NucleicAcid,
    /// Bound small molecule.
    Ligand,
    /// Waters and other solvent.
    Solvent,
    /// Cofactors, ions and anything else.
    Other,
}

impl ComponentRole {
    /// Whether atoms of this role are written as hetero records.
    #[must_use]
    pub fn is_hetero(self) -> bool {
        !matches!(self, Self::Protein | Self::NucleicAcid)
    }
}

/// One component of a complex.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// What the component is.
    pub role: ComponentRole,
    /// The component's structure.
    pub molecule: Molecule,
}

/// A multi-component structure, e.g. a protein with a bound ligand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Complex {
    /// Title.
    pub title: String,
    /// Components in serialization order.
    pub components: Vec<Component>,
}

impl Complex {
    /// Create an empty complex.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            components: Vec::new(),
        }
    }

    /// Append a component.
    #[must_use]
    pub fn with_component(
        mut self,
        role: ComponentRole,
        molecule: Molecule,
    ) -> Self {
        self.components.push(Component { role, molecule });
        self
    }

    /// Wrap a single macromolecule (e.g. a parsed PDB file). Hetero flags
    /// are kept per atom.
    #[must_use]
    pub fn from_structure(molecule: Molecule) -> Self {
        let title = molecule.title.clone();
        Self::new(&title).with_component(ComponentRole::Protein, molecule)
    }

    /// Total atom count over all components.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.components.iter().map(|c| c.molecule.atoms.len()).sum()
    }
}

/// A prepared protein–ligand design unit.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignUnit {
    /// Title.
    pub title: String,
    /// Receptor structure.
    pub protein: Molecule,
    /// Bound ligand, if any.
    pub ligand: Option<Molecule>,
    /// Crystallographic waters, if kept.
    pub solvent: Option<Molecule>,
}

impl DesignUnit {
    /// Flatten into a [`Complex`] in protein, ligand, solvent order.
    #[must_use]
    pub fn to_complex(&self) -> Complex {
        let mut complex = Complex::new(&self.title)
            .with_component(ComponentRole::Protein, self.protein.clone());
        if let Some(ligand) = &self.ligand {
            complex = complex.with_component(ComponentRole::Ligand, ligand.clone());
        }
        if let Some(solvent) = &self.solvent {
            complex =
                complex.with_component(ComponentRole::Solvent, solvent.clone());
        }
        complex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_molecule_has_no_3d_coordinates() {
        let mut mol = Molecule::new("benzene");
        mol.dimensionality = Dimensionality::Flat;
        let _ = mol.add_atom(Atom::new("C", "C", Vec3::new(1.0, 0.0, 0.0)));
        assert!(!mol.has_3d_coordinates());
    }

    #[test]
    fn planar_3d_header_without_depth_counts_as_flat() {
        let mut mol = Molecule::new("flat");
        let _ = mol.add_atom(Atom::new("C", "C", Vec3::new(1.0, 2.0, 0.0)));
        assert!(!mol.has_3d_coordinates());
        mol.atoms[0].position.z = 0.5;
        assert!(mol.has_3d_coordinates());
    }

    #[test]
    fn residue_naming_requires_chain_on_every_atom() {
        let mut mol = Molecule::new("p");
        let _ = mol.add_atom(
            Atom::new("CA", "C", Vec3::ZERO)
                .with_residue(Residue::new("ALA", 1, "A")),
        );
        assert!(mol.has_residue_naming());
        let _ = mol.add_atom(Atom::new("O", "O", Vec3::ONE));
        assert!(!mol.has_residue_naming());
    }

    #[test]
    fn design_unit_orders_components() {
        let du = DesignUnit {
            title: "du".to_owned(),
            protein: Molecule::new("prot"),
            ligand: Some(Molecule::new("lig")),
            solvent: None,
        };
        let roles: Vec<_> =
            du.to_complex().components.iter().map(|c| c.role).collect();
        assert_eq!(roles, vec![ComponentRole::Protein, ComponentRole::Ligand]);
    }
}
