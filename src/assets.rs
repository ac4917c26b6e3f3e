//! Browser-side chrome compiled into the binary.

use rust_embed::RustEmbed;

use crate::error::SceneError;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Embedded;

/// Scene bootstrap (`scenebook.boot`).
pub const VIEWER_JS: &str = "viewer.js";
/// Stylesheet shared by all scene chrome.
pub const CHROME_CSS: &str = "chrome.css";
/// Entity list.
pub const SIDEBAR_JS: &str = "sidebar.js";
/// View controls.
pub const MENUBAR_JS: &str = "menubar.js";
/// Command line.
pub const TERMINAL_JS: &str = "terminal.js";
/// Grid surface logic, runs inside the iframe.
pub const GRID_JS: &str = "grid.js";
/// Grid surface stylesheet.
pub const GRID_CSS: &str = "grid.css";
/// Host-side selection listener.
pub const GRID_HOST_JS: &str = "grid_host.js";

/// Contents of an embedded asset as UTF-8 text.
pub fn text(name: &str) -> Result<String, SceneError> {
    let file =
        Embedded::get(name).ok_or_else(|| SceneError::MissingAsset(name.to_owned()))?;
    String::from_utf8(file.data.into_owned())
        .map_err(|_| SceneError::MissingAsset(format!("{name} (not UTF-8)")))
}

/// Names of every embedded asset.
pub fn names() -> impl Iterator<Item = String> {
    Embedded::iter().map(|name| name.into_owned())
}
