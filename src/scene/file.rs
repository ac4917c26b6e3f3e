//! Scene files: a TOML description of a scene for the command line.
//!
//! ```toml
//! background = "black"
//! preset = "sites"
//! zoom = "resn LIG"
//!
//! [ui]
//! terminal = false
//!
//! [[entities]]
//! path = "receptor.pdb"
//!
//! [[entities]]
//! path = "ligands.sdf"
//! name = "pose"
//!
//! [[styles]]
//! selector = { chain = "A" }
//! representation = "surface"
//! params = { opacity = 0.6 }
//! ```
//!
//! Paths are relative to the scene file. The preset is applied before the
//! styles, so styles always layer on top of it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    EntityOptions, Representation, SceneBuilder, Selector, StyleParams,
    UiConfig, ZoomTarget,
};
use crate::chem::io::{self, Loaded};
use crate::error::{SceneError, ValidationError};

/// Top-level scene file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneFile {
    /// CSS background color.
    pub background: Option<String>,
    /// Viewer width in pixels.
    pub width: Option<u32>,
    /// Viewer height in pixels.
    pub height: Option<u32>,
    /// Preset name.
    pub preset: Option<String>,
    /// Selection expression (string) or selector (table).
    pub zoom: Option<Value>,
    /// Chrome overrides.
    pub ui: UiConfig,
    /// Structure files to load.
    pub entities: Vec<EntityEntry>,
    /// Custom style rules, in order.
    pub styles: Vec<StyleEntry>,
}

/// One `[[entities]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityEntry {
    /// Structure file (`.pdb`, `.sdf`, `.mol`).
    pub path: PathBuf,
    /// Explicit id. Multi-record files get `name-1`, `name-2`, ...
    #[serde(default)]
    pub name: Option<String>,
    /// Embed hidden.
    #[serde(default)]
    pub disabled: bool,
}

/// One `[[styles]]` table. Exactly one of `representation` and `raw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleEntry {
    /// `"all"` or an attribute table; defaults to all atoms.
    #[serde(default)]
    pub selector: Option<Value>,
    /// Named representation.
    #[serde(default)]
    pub representation: Option<String>,
    /// Complete style object.
    #[serde(default)]
    pub raw: Option<Value>,
    /// Representation parameters.
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

impl SceneFile {
    /// Read and parse a scene file.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse scene file text.
    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        toml::from_str(content).map_err(|e| SceneError::OptionsParse(e.to_string()))
    }

    /// Load every entity (paths relative to `base_dir`) and replay the file
    /// into a builder.
    pub fn build(&self, base_dir: &Path) -> Result<SceneBuilder, SceneError> {
        let mut builder = SceneBuilder::new();

        if let Some(preset) = &self.preset {
            let _ = builder.set_preset(preset)?;
        }
        for entry in &self.entities {
            add_entry(&mut builder, entry, base_dir)?;
        }
        for style in &self.styles {
            let (selector, representation, params) = style.to_rule()?;
            let _ = builder.add_style(selector, representation, params)?;
        }
        if let Some(zoom) = &self.zoom {
            let _ = builder.zoom_to(zoom_target(zoom)?)?;
        }
        let _ = builder.set_ui(self.ui)?;
        if let Some(color) = &self.background {
            let _ = builder.set_background(color)?;
        }
        match (self.width, self.height) {
            (None, None) => {}
            (w, h) => {
                let (width, height) = builder
                    .model()
                    .size(&crate::options::ViewerOptions::default());
                let _ = builder.set_size(w.unwrap_or(width), h.unwrap_or(height))?;
            }
        }
        Ok(builder)
    }
}

impl StyleEntry {
    fn to_rule(
        &self,
    ) -> Result<(Selector, Representation, StyleParams), SceneError> {
        let selector = match &self.selector {
            None => Selector::all(),
            Some(v) => Selector::from_value(v)?,
        };
        let representation = match (&self.representation, &self.raw) {
            (Some(name), None) => name.parse::<Representation>()?,
            (None, Some(raw)) => Representation::raw(raw.clone())?,
            _ => {
                return Err(ValidationError::MalformedStyle(
                    "give exactly one of `representation` or `raw`".to_owned(),
                )
                .into())
            }
        };
        let params = self
            .params
            .iter()
            .fold(StyleParams::new(), |p, (k, v)| p.set(k, v.clone()));
        Ok((selector, representation, params))
    }
}

fn zoom_target(value: &Value) -> Result<ZoomTarget, ValidationError> {
    match value {
        Value::String(s) if s == "all" => Ok(ZoomTarget::All),
        Value::String(expr) => ZoomTarget::expression(expr),
        other => Selector::from_value(other).map(ZoomTarget::Selector),
    }
}

fn add_entry(
    builder: &mut SceneBuilder,
    entry: &EntityEntry,
    base_dir: &Path,
) -> Result<(), SceneError> {
    let path = base_dir.join(&entry.path);
    let options = |name: Option<String>| EntityOptions {
        name,
        disabled: entry.disabled,
    };
    match io::load(&path)? {
        Loaded::Complex(complex) => {
            let _ = builder.add_entity(complex, options(entry.name.clone()))?;
        }
        Loaded::Molecules(molecules) => {
            let single = molecules.len() == 1;
            for (i, mol) in molecules.into_iter().enumerate() {
                let name = entry.name.as_ref().map(|n| {
                    if single {
                        n.clone()
                    } else {
                        format!("{n}-{}", i + 1)
                    }
                });
                let _ = builder.add_entity(mol, options(name))?;
            }
        }
    }
    log::debug!("loaded {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::scene::Preset;

    const SCENE: &str = r#"
background = "black"
width = 640
preset = "ball-and-stick"
zoom = { chain = "A" }

[ui]
sidebar = true

[[styles]]
selector = { chain = "A" }
representation = "surface"
params = { opacity = 0.6 }

[[styles]]
raw = { sphere = { radius = 0.3 } }
"#;

    #[test]
    fn parses_and_replays() {
        let file = SceneFile::from_toml(SCENE).unwrap();
        assert_eq!(file.styles.len(), 2);
        let b = file.build(Path::new(".")).unwrap();
        let model = b.model();
        assert_eq!(model.preset(), Some(Preset::BallAndStick));
        assert_eq!(model.custom_rules().count(), 2);
        assert_eq!(model.ui().sidebar, Some(true));
        let defaults = crate::options::ViewerOptions::default();
        assert_eq!(model.size(&defaults), (640, defaults.height));
        assert_eq!(model.background(&defaults), "black");
        assert_eq!(model.zoom(), &ZoomTarget::Selector(Selector::chain("A")));

        let resolved = crate::scene::resolve::resolve_styles(model);
        assert_eq!(resolved.len(), Preset::BallAndStick.rules().len() + 2);
        assert_eq!(
            resolved.last().unwrap().style_value(),
            json!({"sphere": {"radius": 0.3}})
        );
    }

    #[test]
    fn style_needs_one_representation() {
        let file = SceneFile::from_toml(
            "[[styles]]\nrepresentation = \"stick\"\nraw = { line = {} }\n",
        )
        .unwrap();
        assert!(matches!(
            file.build(Path::new(".")),
            Err(SceneError::Validation(ValidationError::MalformedStyle(_)))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            SceneFile::from_toml("colour = \"red\""),
            Err(SceneError::OptionsParse(_))
        ));
    }

    #[test]
    fn loads_entities_relative_to_the_file() {
        let dir = std::env::temp_dir().join(format!("scenebook-file-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("two.sdf"),
            "a\n  x\n\n  1  0  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    1.0000 C   0  0  0  0  0  0  0  0  0  0  0  0\nM  END\n$$$$\n\
             b\n  x\n\n  1  0  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    2.0000 N   0  0  0  0  0  0  0  0  0  0  0  0\nM  END\n$$$$\n",
        )
        .unwrap();
        let file = SceneFile::from_toml(
            "[[entities]]\npath = \"two.sdf\"\nname = \"pose\"\ndisabled = true\n",
        )
        .unwrap();
        let b = file.build(&dir).unwrap();
        let ids: Vec<_> = b.model().entities().iter().map(|e| e.id().to_owned()).collect();
        assert_eq!(ids, vec!["pose-1", "pose-2"]);
        assert!(b.model().entities().iter().all(|e| !e.displayed()));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
