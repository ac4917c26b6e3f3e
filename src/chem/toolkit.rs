use std::fmt;

use super::Molecule;

/// Failure reported by a chemistry toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolkitError {
    /// The toolkit does not provide this capability.
    Unsupported(&'static str),
    /// The capability ran and failed.
    Failed(String),
}

impl fmt::Display for ToolkitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(what) => write!(f, "{what} is not supported"),
            Self::Failed(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ToolkitError {}

/// External chemistry capabilities scenebook relies on but does not
/// implement. Every method may fail; callers degrade instead of aborting.
pub trait Toolkit {
    /// Produce a copy of `molecule` with a 3D conformation.
    fn generate_coordinates(
        &self,
        molecule: &Molecule,
    ) -> Result<Molecule, ToolkitError>;

    /// Whether the substructure `pattern` (SMARTS-like) occurs in the
    /// structure written as `structure`.
    fn pattern_matches(
        &self,
        pattern: &str,
        structure: &str,
    ) -> Result<bool, ToolkitError>;
}

/// Toolkit with no capabilities. Coordinate generation fails and pattern
/// queries fall back to literal matching at the call site.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullToolkit;

impl Toolkit for NullToolkit {
    fn generate_coordinates(
        &self,
        _molecule: &Molecule,
    ) -> Result<Molecule, ToolkitError> {
        Err(ToolkitError::Unsupported("3D coordinate generation"))
    }

    fn pattern_matches(
        &self,
        _pattern: &str,
        _structure: &str,
    ) -> Result<bool, ToolkitError> {
        Err(ToolkitError::Unsupported("substructure search"))
    }
}
