use std::path::Path;

use crate::error::SceneError;

/// The rendering library inlined into every scene document.
///
/// The source must define a global `$3Dmol` with `createViewer`; the crate
/// never fetches it, so supply a local copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderLibrary {
    /// Label written into the document for provenance.
    pub name: String,
    /// JavaScript source.
    pub source: String,
}

impl RenderLibrary {
    /// Wrap in-memory JavaScript source.
    #[must_use]
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.to_owned(),
            source: source.to_owned(),
        }
    }

    /// Read the library from disk; the file name becomes its label.
    pub fn from_path(path: &Path) -> Result<Self, SceneError> {
        let source = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("library")
            .to_owned();
        log::debug!("loaded rendering library {name} ({} bytes)", source.len());
        Ok(Self { name, source })
    }
}
