use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Grid", inline)]
#[serde(default)]
/// Molecule grid widget parameters.
pub struct GridOptions {
    /// Cards per page.
    #[schemars(title = "Page Size", range(min = 1, max = 200))]
    pub page_size: usize,
    /// Quiet period before a search query is applied, in milliseconds.
    #[schemars(title = "Search Delay", range(min = 0, max = 2000))]
    pub debounce_ms: u64,
    /// Data fields searched in `properties` mode. Empty means every field.
    #[schemars(title = "Search Fields")]
    pub search_fields: Vec<String>,
    /// Initial sort field (`name` or a data field).
    #[schemars(title = "Sort Field")]
    pub sort_field: Option<String>,
    /// Height of the embedded grid frame in pixels.
    #[schemars(title = "Frame Height", range(min = 100, max = 4000))]
    pub frame_height: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            page_size: 12,
            debounce_ms: 300,
            search_fields: Vec::new(),
            sort_field: None,
            frame_height: 520,
        }
    }
}
