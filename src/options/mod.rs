//! Ambient defaults for scene documents and grids, with TOML file support.
//!
//! A scene only stores what the caller set explicitly; everything else is
//! taken from an [`Options`] value at assembly time. Options serialize
//! to/from TOML so a notebook session can keep its defaults in a file.

mod grid;
mod ui;
mod viewer;

use std::path::Path;

pub use grid::GridOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use ui::{SidebarMode, UiOptions};
pub use viewer::ViewerOptions;

use crate::error::SceneError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[grid]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Viewer size and background.
    pub viewer: ViewerOptions,
    /// Document chrome visibility.
    pub ui: UiOptions,
    /// Grid widget parameters.
    pub grid: GridOptions,
}

impl Options {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(SceneError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        toml::from_str(content)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SceneError::Io)?;
        }
        std::fs::write(path, content).map_err(SceneError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let opts = Options::from_toml(
            r#"
[grid]
page_size = 30

[ui]
sidebar = "show"
"#,
        )
        .unwrap();
        assert_eq!(opts.grid.page_size, 30);
        assert_eq!(opts.ui.sidebar, SidebarMode::Show);
        // Everything else should be default
        assert_eq!(opts.grid.debounce_ms, 300);
        assert_eq!(opts.viewer.background, "white");
        assert!(opts.ui.terminal);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[viewer]\nwidth = \"wide\"").unwrap_err();
        assert!(matches!(err, SceneError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join("scenebook-options-test")
            .join("options.toml");
        let mut opts = Options::default();
        opts.viewer.width = 1024;
        opts.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), opts);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();
        assert!(props.contains_key("viewer"));
        assert!(props.contains_key("ui"));
        assert!(props.contains_key("grid"));

        let viewer = &props["viewer"]["properties"];
        assert!(viewer.get("width").is_some());
        assert!(viewer.get("document_title").is_none());
    }
}
