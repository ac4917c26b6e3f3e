//! The serialized scene embedded in every document.

use std::hash::Hasher;

use rustc_hash::FxHasher;
use serde::Serialize;
use serde_json::Value;

use crate::scene::{EntityKind, Selector, StyleRule, UiLayout, ZoomTarget};
use crate::serialize::{PreparedEntity, StructuralFormat};

/// One entity as the bootstrap script sees it.
#[derive(Debug, Clone, Serialize)]
pub struct EntityDescriptor<'a> {
    /// Entity id.
    pub id: &'a str,
    /// Molecule or complex.
    pub kind: EntityKind,
    /// Shown on load.
    pub displayed: bool,
    /// `sdf` or `pdb`, passed to `addModel`.
    pub format: StructuralFormat,
    /// Structural text.
    pub data: &'a str,
}

/// A resolved rule: `addStyle(selector, style)` or
/// `addSurface(type, style, selector)`.
#[derive(Debug, Clone, Serialize)]
pub struct RuleDescriptor {
    /// Atom selector.
    pub selector: Selector,
    /// Style object.
    pub style: Value,
}

impl From<&StyleRule> for RuleDescriptor {
    fn from(rule: &StyleRule) -> Self {
        Self {
            selector: rule.selector.clone(),
            style: rule.style_value(),
        }
    }
}

/// Everything the document needs at load time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescriptor<'a> {
    /// DOM id of the viewer element; derived from the rest of the descriptor.
    pub viewer_id: String,
    /// CSS background color.
    pub background: &'a str,
    /// Viewer width in pixels.
    pub width: u32,
    /// Viewer height in pixels.
    pub height: u32,
    /// Entities in insertion order; index = model index.
    pub entities: Vec<EntityDescriptor<'a>>,
    /// Atom styles, applied in order.
    pub styles: Vec<RuleDescriptor>,
    /// Surfaces, applied after styles.
    pub surfaces: Vec<RuleDescriptor>,
    /// Camera target.
    pub zoom: &'a ZoomTarget,
    /// Visible chrome.
    pub ui: UiLayout,
}

impl<'a> SceneDescriptor<'a> {
    /// Build the descriptor and derive its viewer id.
    pub fn new(
        background: &'a str,
        (width, height): (u32, u32),
        entities: &'a [PreparedEntity],
        rules: &[StyleRule],
        zoom: &'a ZoomTarget,
        ui: UiLayout,
    ) -> Result<Self, serde_json::Error> {
        let (surfaces, styles): (Vec<_>, Vec<_>) =
            rules.iter().partition(|r| r.is_surface());
        let mut descriptor = Self {
            viewer_id: String::new(),
            background,
            width,
            height,
            entities: entities
                .iter()
                .map(|e| EntityDescriptor {
                    id: &e.id,
                    kind: e.kind,
                    displayed: e.displayed,
                    format: e.payload.format,
                    data: &e.payload.text,
                })
                .collect(),
            styles: styles.into_iter().map(RuleDescriptor::from).collect(),
            surfaces: surfaces.into_iter().map(RuleDescriptor::from).collect(),
            zoom,
            ui,
        };
        descriptor.viewer_id = viewer_id(&serde_json::to_string(&descriptor)?);
        Ok(descriptor)
    }

    /// JSON safe to place inside `<script type="application/json">`.
    pub fn to_script_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self).map(|json| escape_for_script(&json))
    }
}

/// Stable id from the descriptor contents: identical scenes share an id,
/// distinct scenes on one page do not collide in practice.
fn viewer_id(content: &str) -> String {
    let mut hasher = FxHasher::default();
    hasher.write(content.as_bytes());
    format!("scenebook-{:016x}", hasher.finish())
}

/// Escape characters that could end the script element or confuse an HTML
/// parser. The result is still valid JSON.
#[must_use]
pub fn escape_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}
