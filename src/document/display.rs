//! Notebook display hooks.
//!
//! Anything the notebook can show automatically is one variant of
//! [`Displayable`]; each variant has its own resolver, picked by `match`.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Artifact, AssemblyContext};
use crate::chem::{Complex, DesignUnit, Molecule};
use crate::error::SceneError;
use crate::grid::MolGrid;
use crate::scene::{
    EntityOptions, Representation, SceneBuilder, Selector, StyleParams,
};

/// MIME type → rendered content, as notebook frontends expect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MimeBundle(BTreeMap<String, String>);

impl MimeBundle {
    /// Bundle holding a single `text/html` entry.
    #[must_use]
    pub fn html(html: &str) -> Self {
        let mut map = BTreeMap::new();
        let _ = map.insert("text/html".to_owned(), html.to_owned());
        Self(map)
    }

    /// Content for `mime`.
    #[must_use]
    pub fn get(&self, mime: &str) -> Option<&str> {
        self.0.get(mime).map(String::as_str)
    }

    /// JSON object form.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v.as_str())))
                .collect(),
        )
    }
}

/// Handle returned by a live display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayHandle {
    /// Sink-assigned display id.
    pub display_id: String,
}

/// Where live displays go (a notebook kernel's display channel, a test
/// buffer, ...).
pub trait DisplaySink {
    /// Show `bundle`.
    fn publish(&mut self, bundle: MimeBundle) -> Result<DisplayHandle, SceneError>;
}

/// Sink that keeps every bundle in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Published bundles, oldest first.
    pub published: Vec<MimeBundle>,
}

impl DisplaySink for MemorySink {
    fn publish(&mut self, bundle: MimeBundle) -> Result<DisplayHandle, SceneError> {
        self.published.push(bundle);
        Ok(DisplayHandle {
            display_id: format!("display-{}", self.published.len()),
        })
    }
}

/// Hand a finished artifact to a live display.
pub fn display(
    artifact: &Artifact,
    sink: &mut dyn DisplaySink,
) -> Result<DisplayHandle, SceneError> {
    let handle = sink.publish(MimeBundle::html(artifact.html()))?;
    log::debug!("published {}", handle.display_id);
    Ok(handle)
}

/// Everything with an automatic notebook rendering.
#[derive(Debug, Clone)]
pub enum Displayable {
    /// A single molecule, shown as sticks.
    Molecule(Molecule),
    /// A complex, shown with the `simple` preset.
    Complex(Complex),
    /// A user-built scene.
    Scene(SceneBuilder),
    /// A design unit, shown with the `sites` preset and framed on the
    /// ligand.
    DesignUnit(DesignUnit),
    /// A column of molecules, shown as a grid.
    Column(Vec<Molecule>),
}

impl Displayable {
    /// Render to HTML.
    pub fn to_html(self, ctx: &AssemblyContext<'_>) -> Result<String, SceneError> {
        match self {
            Self::Molecule(mol) => molecule_html(mol, ctx),
            Self::Complex(complex) => complex_html(complex, ctx),
            Self::Scene(mut builder) => builder.to_html(ctx),
            Self::DesignUnit(unit) => design_unit_html(unit, ctx),
            Self::Column(molecules) => column_html(&molecules, ctx),
        }
    }

    /// Render to a MIME bundle.
    pub fn to_mime_bundle(
        self,
        ctx: &AssemblyContext<'_>,
    ) -> Result<MimeBundle, SceneError> {
        self.to_html(ctx).map(|html| MimeBundle::html(&html))
    }
}

fn molecule_html(mol: Molecule, ctx: &AssemblyContext<'_>) -> Result<String, SceneError> {
    SceneBuilder::new()
        .add_entity(mol, EntityOptions::default())?
        .add_style(Selector::all(), Representation::Stick, StyleParams::new())?
        .to_html(ctx)
}

fn complex_html(complex: Complex, ctx: &AssemblyContext<'_>) -> Result<String, SceneError> {
    SceneBuilder::new()
        .add_entity(complex, EntityOptions::default())?
        .set_preset("simple")?
        .to_html(ctx)
}

fn design_unit_html(
    unit: DesignUnit,
    ctx: &AssemblyContext<'_>,
) -> Result<String, SceneError> {
    let has_ligand = unit.ligand.is_some();
    let mut builder = SceneBuilder::new();
    let _ = builder
        .add_entity(unit, EntityOptions::default())?
        .set_preset("sites")?;
    if has_ligand {
        let _ = builder.zoom_to(Selector::hetero())?;
    }
    builder.to_html(ctx)
}

fn column_html(molecules: &[Molecule], ctx: &AssemblyContext<'_>) -> Result<String, SceneError> {
    MolGrid::from_molecules(molecules)
        .with_options(ctx.options.grid.clone())
        .to_html()
}
