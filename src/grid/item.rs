//! Grid rows.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::chem::Molecule;

/// One row of a grid. `index` is the row's identity; selection refers to
/// it, never to the row's position on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridItem {
    /// Stable identity.
    pub index: usize,
    /// Display name.
    pub name: String,
    /// Structure line notation; the only field `pattern` search looks at.
    pub structure: String,
    /// Named data fields.
    pub fields: BTreeMap<String, String>,
}

impl GridItem {
    /// Row with no structure and no fields.
    #[must_use]
    pub fn new(index: usize, name: &str) -> Self {
        Self {
            index,
            name: name.to_owned(),
            structure: String::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Set the structure field.
    #[must_use]
    pub fn with_structure(mut self, structure: &str) -> Self {
        structure.clone_into(&mut self.structure);
        self
    }

    /// Add a data field.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        let _ = self.fields.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Value of `field`: `name`, `structure`, or a data field. Empty values
    /// count as missing.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        let value = match field {
            "name" => self.name.as_str(),
            "structure" => self.structure.as_str(),
            other => self.fields.get(other)?.as_str(),
        };
        Some(value).filter(|v| !v.is_empty())
    }

    /// One row per molecule, indexed by position. Untitled molecules are
    /// named `mol-N`.
    #[must_use]
    pub fn from_molecules(molecules: &[Molecule]) -> Vec<Self> {
        molecules
            .iter()
            .enumerate()
            .map(|(index, mol)| {
                let title = mol.title.trim();
                let name = if title.is_empty() {
                    format!("mol-{}", index + 1)
                } else {
                    title.to_owned()
                };
                Self {
                    index,
                    name,
                    structure: mol.smiles.clone().unwrap_or_default(),
                    fields: mol.properties.clone(),
                }
            })
            .collect()
    }
}
