use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Viewer", inline)]
#[serde(default)]
/// Viewer surface defaults used when a scene does not override them.
pub struct ViewerOptions {
    /// Viewer width in pixels.
    #[schemars(title = "Width", range(min = 100, max = 4000))]
    pub width: u32,
    /// Viewer height in pixels.
    #[schemars(title = "Height", range(min = 100, max = 4000))]
    pub height: u32,
    /// CSS color of the viewer background.
    #[schemars(title = "Background")]
    pub background: String,
    /// Document title of exported artifacts.
    #[schemars(skip)]
    pub document_title: String,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: "white".to_owned(),
            document_title: "scenebook".to_owned(),
        }
    }
}
