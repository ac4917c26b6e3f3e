//! Scene entities and the structures they wrap.

use serde::Serialize;

use crate::chem::{Complex, DesignUnit, Molecule};

/// What kind of structure an entity wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A single small molecule.
    Molecule,
    /// A multi-component structure (protein, ligand, solvent...).
    Complex,
}

/// The chemistry object behind an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntitySource {
    /// A single molecule.
    Molecule(Molecule),
    /// A multi-component complex.
    Complex(Complex),
}

impl EntitySource {
    /// Entity kind for this source.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Molecule(_) => EntityKind::Molecule,
            Self::Complex(_) => EntityKind::Complex,
        }
    }

    /// The source's own title, trimmed.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Molecule(m) => m.title.trim(),
            Self::Complex(c) => c.title.trim(),
        }
    }
}

impl From<Molecule> for EntitySource {
    fn from(m: Molecule) -> Self {
        Self::Molecule(m)
    }
}

impl From<Complex> for EntitySource {
    fn from(c: Complex) -> Self {
        Self::Complex(c)
    }
}

impl From<DesignUnit> for EntitySource {
    fn from(du: DesignUnit) -> Self {
        Self::Complex(du.to_complex())
    }
}

/// Per-call options for [`SceneBuilder::add_entity`](super::SceneBuilder::add_entity).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityOptions {
    /// Explicit id / display name.
    pub name: Option<String>,
    /// Embed the entity hidden.
    pub disabled: bool,
}

impl EntityOptions {
    /// Options with an explicit name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_owned()),
            disabled: false,
        }
    }

    /// Embed the entity hidden; the sidebar can still show it.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// One displayable unit of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub(super) id: String,
    pub(super) displayed: bool,
    pub(super) source: EntitySource,
}

impl Entity {
    /// Unique id within the scene; also the display name.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Molecule or complex.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.source.kind()
    }

    /// Whether the entity is shown when the document opens.
    #[must_use]
    pub fn displayed(&self) -> bool {
        self.displayed
    }

    /// The wrapped chemistry object.
    #[must_use]
    pub fn source(&self) -> &EntitySource {
        &self.source
    }

    /// Title of the wrapped chemistry object.
    #[must_use]
    pub fn source_title(&self) -> &str {
        self.source.title()
    }
}
