use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default sidebar behavior when a scene does not force it.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SidebarMode {
    /// Shown once the scene holds `sidebar_min_entities` entities.
    #[default]
    Auto,
    /// Always shown.
    Show,
    /// Always hidden.
    Hide,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Interface", inline)]
#[serde(default)]
/// Default visibility of the document chrome.
pub struct UiOptions {
    /// Entity list with visibility toggles.
    #[schemars(title = "Sidebar")]
    pub sidebar: SidebarMode,
    /// Entity count at which an `auto` sidebar appears.
    #[schemars(title = "Sidebar Threshold", range(min = 1, max = 16))]
    pub sidebar_min_entities: usize,
    /// View controls above the viewer.
    #[schemars(title = "Menubar")]
    pub menubar: bool,
    /// Command line below the viewer.
    #[schemars(title = "Terminal")]
    pub terminal: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            sidebar: SidebarMode::Auto,
            sidebar_min_entities: 2,
            menubar: true,
            terminal: true,
        }
    }
}
