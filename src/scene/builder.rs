//! Fluent scene construction.

use std::path::Path;

use super::{
    Entity, EntityOptions, EntitySource, Preset, Representation, SceneModel,
    Selector, StyleParams, StyleRule, UiConfig, ZoomTarget,
};
use crate::document::{self, Artifact, AssemblyContext, DisplayHandle, DisplaySink};
use crate::error::{SceneError, ValidationError};

/// Lifecycle of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Nothing added yet.
    Empty,
    /// At least one entity, still mutable.
    EntitiesAdded,
    /// A document was produced; the model is read-only.
    Finalized,
}

/// Accumulates a [`SceneModel`] through chained calls and compiles it into a
/// document.
///
/// Every mutating call returns `Result<&mut Self, _>` so a scene reads as one
/// expression:
///
/// ```no_run
/// # use scenebook::prelude::*;
/// # fn demo(mol: Molecule, ctx: &AssemblyContext<'_>) -> Result<String, SceneError> {
/// SceneBuilder::new()
///     .add_entity(mol, EntityOptions::named("ligand"))?
///     .set_preset("ball-and-stick")?
///     .set_background("black")?
///     .to_html(ctx)
/// # }
/// ```
///
/// The first `to_html`/`render`/`export`/`display` freezes the model; later
/// mutations fail with [`SceneError::Frozen`], while rendering again yields
/// the same bytes.
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    model: SceneModel,
    finalized: bool,
}

impl SceneBuilder {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated model.
    #[must_use]
    pub fn model(&self) -> &SceneModel {
        &self.model
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SceneState {
        if self.finalized {
            SceneState::Finalized
        } else if self.model.entities.is_empty() {
            SceneState::Empty
        } else {
            SceneState::EntitiesAdded
        }
    }

    fn ensure_mutable(&self) -> Result<(), SceneError> {
        if self.finalized {
            Err(SceneError::Frozen)
        } else {
            Ok(())
        }
    }

    // -- Entities --

    /// Add a molecule or complex.
    ///
    /// The id is the explicit name if given, else the source's title, else
    /// the first free `entity-N`. A name or title that is already taken
    /// fails with [`ValidationError::DuplicateId`].
    pub fn add_entity(
        &mut self,
        source: impl Into<EntitySource>,
        options: EntityOptions,
    ) -> Result<&mut Self, SceneError> {
        self.ensure_mutable()?;
        let source = source.into();

        let explicit = options
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or_else(|| Some(source.title()).filter(|t| !t.is_empty()));
        let id = match explicit {
            Some(id) if self.model.has_id(id) => {
                return Err(ValidationError::DuplicateId(id.to_owned()).into());
            }
            Some(id) => id.to_owned(),
            None => self.generated_id(),
        };

        log::debug!("add_entity '{id}' ({:?})", source.kind());
        self.model.entities.push(Entity {
            id,
            displayed: !options.disabled,
            source,
        });
        Ok(self)
    }

    fn generated_id(&self) -> String {
        let mut n = self.model.entities.len() + 1;
        loop {
            let id = format!("entity-{n}");
            if !self.model.has_id(&id) {
                return id;
            }
            n += 1;
        }
    }

    /// Show or hide an existing entity when the document opens.
    pub fn set_displayed(
        &mut self,
        id: &str,
        displayed: bool,
    ) -> Result<&mut Self, SceneError> {
        self.ensure_mutable()?;
        let entity = self
            .model
            .entities
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ValidationError::UnknownEntity(id.to_owned()))?;
        entity.displayed = displayed;
        Ok(self)
    }

    // -- Styling --

    /// Append a custom style rule. Allowed after a preset, in which case it
    /// layers on top of the preset.
    pub fn add_style(
        &mut self,
        selector: Selector,
        representation: Representation,
        params: StyleParams,
    ) -> Result<&mut Self, SceneError> {
        self.ensure_mutable()?;
        let seq = self.model.bump_seq();
        let rule = StyleRule::new(selector, representation).with_params(params);
        self.model.rules.push((seq, rule));
        Ok(self)
    }

    /// Activate a built-in preset by name. Custom rules added before this
    /// call stop applying; rules added afterwards layer on top.
    pub fn set_preset(&mut self, name: &str) -> Result<&mut Self, SceneError> {
        self.ensure_mutable()?;
        let preset: Preset = name.parse()?;
        let seq = self.model.bump_seq();
        self.model.preset = Some((preset, seq));
        Ok(self)
    }

    // -- View --

    /// Set the camera target, stored verbatim.
    pub fn zoom_to(
        &mut self,
        target: impl Into<ZoomTarget>,
    ) -> Result<&mut Self, SceneError> {
        self.ensure_mutable()?;
        let target = match target.into() {
            ZoomTarget::Expression(expr) => ZoomTarget::expression(&expr)?,
            other => other,
        };
        self.model.zoom = target;
        Ok(self)
    }

    /// Partially update chrome visibility; `None` fields keep their value.
    pub fn set_ui(&mut self, patch: UiConfig) -> Result<&mut Self, SceneError> {
        self.ensure_mutable()?;
        self.model.ui.apply(patch);
        Ok(self)
    }

    /// Set the viewer background to any CSS color.
    pub fn set_background(
        &mut self,
        color: &str,
    ) -> Result<&mut Self, SceneError> {
        self.ensure_mutable()?;
        let color = color.trim();
        if color.is_empty() {
            return Err(ValidationError::EmptyBackground.into());
        }
        self.model.background = Some(color.to_owned());
        Ok(self)
    }

    /// Set the viewer size in pixels.
    pub fn set_size(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<&mut Self, SceneError> {
        self.ensure_mutable()?;
        if width == 0 || height == 0 {
            return Err(ValidationError::InvalidSize { width, height }.into());
        }
        self.model.size = Some((width, height));
        Ok(self)
    }

    // -- Output --

    /// Freeze the model and return it.
    pub fn finalize(&mut self) -> &SceneModel {
        if !self.finalized {
            log::debug!(
                "finalizing scene with {} entities",
                self.model.entities.len()
            );
        }
        self.finalized = true;
        &self.model
    }

    /// Freeze and assemble, keeping the warnings.
    pub fn render(
        &mut self,
        ctx: &AssemblyContext<'_>,
    ) -> Result<Artifact, SceneError> {
        document::assemble(self.finalize(), ctx)
    }

    /// Freeze and assemble the self-contained HTML document.
    pub fn to_html(
        &mut self,
        ctx: &AssemblyContext<'_>,
    ) -> Result<String, SceneError> {
        self.render(ctx).map(Artifact::into_html)
    }

    /// Freeze, assemble and write the document to `path`.
    pub fn export(
        &mut self,
        ctx: &AssemblyContext<'_>,
        path: &Path,
    ) -> Result<Artifact, SceneError> {
        let artifact = self.render(ctx)?;
        artifact.write_to(path)?;
        Ok(artifact)
    }

    /// Freeze, assemble and hand the document to a live display.
    pub fn display(
        &mut self,
        ctx: &AssemblyContext<'_>,
        sink: &mut dyn DisplaySink,
    ) -> Result<DisplayHandle, SceneError> {
        let artifact = self.render(ctx)?;
        document::display(&artifact, sink)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::chem::{Atom, Molecule};
    use crate::document::RenderLibrary;

    fn mol(title: &str) -> Molecule {
        let mut m = Molecule::new(title);
        let _ = m.add_atom(Atom::new("C", "C", glam::Vec3::new(0.0, 0.0, 1.0)));
        m
    }

    #[test]
    fn ids_derive_from_name_then_title_then_sequence() {
        let mut b = SceneBuilder::new();
        let _ = b
            .add_entity(mol("aspirin"), EntityOptions::named("x"))
            .unwrap()
            .add_entity(mol("aspirin"), EntityOptions::default())
            .unwrap()
            .add_entity(mol("  "), EntityOptions::default())
            .unwrap();
        let ids: Vec<_> = b.model().entities().iter().map(Entity::id).collect();
        assert_eq!(ids, vec!["x", "aspirin", "entity-3"]);
    }

    #[test]
    fn duplicate_name_is_rejected_at_the_call() {
        let mut b = SceneBuilder::new();
        let _ = b.add_entity(mol("a"), EntityOptions::named("x")).unwrap();
        let err = b.add_entity(mol("b"), EntityOptions::named("x")).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Validation(ValidationError::DuplicateId(ref id)) if id == "x"
        ));
        assert_eq!(b.model().entities().len(), 1);
    }

    #[test]
    fn distinct_titles_never_collide() {
        let mut b = SceneBuilder::new();
        for i in 0..50 {
            let _ = b
                .add_entity(mol(&format!("mol-{i}")), EntityOptions::default())
                .unwrap();
        }
        assert_eq!(b.model().entities().len(), 50);
    }

    #[test]
    fn generated_ids_skip_taken_names() {
        let mut b = SceneBuilder::new();
        let _ = b
            .add_entity(mol(""), EntityOptions::named("entity-2"))
            .unwrap()
            .add_entity(mol(""), EntityOptions::default())
            .unwrap();
        assert_eq!(b.model().entities()[1].id(), "entity-3");
    }

    #[test]
    fn disabled_entities_are_kept_hidden() {
        let mut b = SceneBuilder::new();
        let _ = b
            .add_entity(mol("a"), EntityOptions::default().disabled())
            .unwrap();
        assert!(!b.model().entities()[0].displayed());
        let _ = b.set_displayed("a", true).unwrap();
        assert!(b.model().entities()[0].displayed());
        assert!(b.set_displayed("nope", true).is_err());
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let mut b = SceneBuilder::new();
        let err = b.set_preset("fancy").unwrap_err();
        assert!(matches!(
            err,
            SceneError::Validation(ValidationError::UnknownPreset(_))
        ));
        assert_eq!(b.model().preset(), None);
    }

    #[test]
    fn zoom_accepts_all_three_forms() {
        let mut b = SceneBuilder::new();
        let _ = b.zoom_to(ZoomTarget::expression("resn LIG").unwrap()).unwrap();
        assert_eq!(b.model().zoom(), &ZoomTarget::Expression("resn LIG".to_owned()));
        let sel = Selector::from_value(&json!({"chain": "A"})).unwrap();
        let _ = b.zoom_to(sel.clone()).unwrap();
        assert_eq!(b.model().zoom(), &ZoomTarget::Selector(sel));
        let _ = b.zoom_to(ZoomTarget::All).unwrap();
        assert_eq!(b.model().zoom(), &ZoomTarget::All);
        assert!(b.zoom_to(ZoomTarget::Expression(String::new())).is_err());
    }

    #[test]
    fn background_and_size_validation() {
        let mut b = SceneBuilder::new();
        assert!(b.set_background(" ").is_err());
        assert!(b.set_size(0, 100).is_err());
        let _ = b.set_background("#112233").unwrap().set_size(320, 240).unwrap();
        let defaults = crate::options::ViewerOptions::default();
        assert_eq!(b.model().background(&defaults), "#112233");
        assert_eq!(b.model().size(&defaults), (320, 240));
    }

    #[test]
    fn state_machine_and_frozen_model() {
        let library = RenderLibrary::new("stub", "window.$3Dmol = {};");
        let ctx = AssemblyContext::new(&library);
        let mut b = SceneBuilder::new();
        assert_eq!(b.state(), SceneState::Empty);
        let _ = b.add_entity(mol("a"), EntityOptions::default()).unwrap();
        assert_eq!(b.state(), SceneState::EntitiesAdded);

        let first = b.to_html(&ctx).unwrap();
        assert_eq!(b.state(), SceneState::Finalized);

        assert!(matches!(
            b.add_entity(mol("b"), EntityOptions::default()),
            Err(SceneError::Frozen)
        ));
        assert!(matches!(b.set_preset("simple"), Err(SceneError::Frozen)));
        assert!(matches!(
            b.add_style(Selector::all(), Representation::Line, StyleParams::new()),
            Err(SceneError::Frozen)
        ));
        assert!(matches!(b.zoom_to(ZoomTarget::All), Err(SceneError::Frozen)));
        assert!(matches!(b.set_ui(UiConfig::default()), Err(SceneError::Frozen)));
        assert!(matches!(b.set_background("red"), Err(SceneError::Frozen)));

        assert_eq!(b.to_html(&ctx).unwrap(), first);
    }
}
