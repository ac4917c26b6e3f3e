//! Declarative scene model: entities, style rules, preset, camera target
//! and chrome overrides.
//!
//! A [`SceneModel`] is plain data. It is only mutated through
//! [`SceneBuilder`], which freezes it the first time a document is
//! produced. Style precedence lives in [`resolve`].

mod builder;
mod entity;
pub mod file;
pub mod preset;
pub mod resolve;
mod style;
mod view;

pub use builder::{SceneBuilder, SceneState};
pub use entity::{Entity, EntityKind, EntityOptions, EntitySource};
pub use preset::Preset;
pub use style::{Representation, Selector, StyleParams, StyleRule};
pub use view::{UiConfig, UiLayout, ZoomTarget};

use crate::error::ValidationError;
use crate::options::ViewerOptions;

// ---------------------------------------------------------------------------
// SceneModel
// ---------------------------------------------------------------------------

/// Everything a scene document is compiled from.
///
/// Style rules and the preset share one insertion sequence so the resolver
/// can tell which custom rules were added after the preset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneModel {
    /// Entities in insertion order.
    entities: Vec<Entity>,
    /// Custom rules tagged with their insertion sequence.
    rules: Vec<(u64, StyleRule)>,
    /// Active preset and the sequence at which it was set.
    preset: Option<(Preset, u64)>,
    next_seq: u64,
    zoom: ZoomTarget,
    ui: UiConfig,
    background: Option<String>,
    size: Option<(u32, u32)>,
}

impl SceneModel {
    // -- Read access --

    /// Entities in insertion order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Look up an entity by id.
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Custom style rules in insertion order, including ones a later preset
    /// overrides.
    pub fn custom_rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.rules.iter().map(|(_, rule)| rule)
    }

    pub(crate) fn sequenced_rules(
        &self,
    ) -> impl Iterator<Item = (u64, &StyleRule)> {
        self.rules.iter().map(|(seq, rule)| (*seq, rule))
    }

    /// Active preset, if any.
    #[must_use]
    pub fn preset(&self) -> Option<Preset> {
        self.preset.map(|(p, _)| p)
    }

    pub(crate) fn preset_activation(&self) -> Option<u64> {
        self.preset.map(|(_, seq)| seq)
    }

    /// Camera target.
    #[must_use]
    pub fn zoom(&self) -> &ZoomTarget {
        &self.zoom
    }

    /// Explicit chrome overrides.
    #[must_use]
    pub fn ui(&self) -> UiConfig {
        self.ui
    }

    /// Background color, falling back to the viewer default.
    #[must_use]
    pub fn background<'a>(&'a self, defaults: &'a ViewerOptions) -> &'a str {
        self.background.as_deref().unwrap_or(&defaults.background)
    }

    /// Viewer size in pixels, falling back to the viewer default.
    #[must_use]
    pub fn size(&self, defaults: &ViewerOptions) -> (u32, u32) {
        self.size.unwrap_or((defaults.width, defaults.height))
    }

    /// Check the model's invariants. The builder enforces them call by call;
    /// this is the final gate before assembly.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (i, entity) in self.entities.iter().enumerate() {
            if self.entities[..i].iter().any(|e| e.id == entity.id) {
                return Err(ValidationError::DuplicateId(entity.id.clone()));
            }
        }
        if self.background.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(ValidationError::EmptyBackground);
        }
        if let Some((width, height)) = self.size {
            if width == 0 || height == 0 {
                return Err(ValidationError::InvalidSize { width, height });
            }
        }
        if let ZoomTarget::Expression(expr) = &self.zoom {
            if expr.trim().is_empty() {
                return Err(ValidationError::MalformedZoom(
                    "empty selection expression".to_owned(),
                ));
            }
        }
        Ok(())
    }

    // -- Mutation (builder only) --

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn has_id(&self, id: &str) -> bool {
        self.entities.iter().any(|e| e.id == id)
    }
}
