//! Crate-level error and warning types.

use std::fmt;

use crate::chem::ToolkitError;

/// Errors produced by the scenebook crate.
#[derive(Debug)]
pub enum SceneError {
    /// A builder call was rejected at the point it was made.
    Validation(ValidationError),
    /// A mutation was attempted after the scene was finalized.
    Frozen,
    /// Structural serialization failed for an entity.
    Serialization(SerializationError),
    /// The assembled document references an external resource.
    ExternalReference(String),
    /// A required embedded asset is missing from the build.
    MissingAsset(String),
    /// Failed to parse a structure file.
    Parse(ParseError),
    /// TOML options / scene file parsing or serialization failure.
    OptionsParse(String),
    /// Descriptor JSON encoding failure.
    Json(serde_json::Error),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation error: {e}"),
            Self::Frozen => {
                write!(f, "scene is finalized and can no longer be modified")
            }
            Self::Serialization(e) => write!(f, "serialization error: {e}"),
            Self::ExternalReference(url) => {
                write!(f, "document references external resource: {url}")
            }
            Self::MissingAsset(name) => {
                write!(f, "embedded asset missing: {name}")
            }
            Self::Parse(e) => write!(f, "structure parse error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for SceneError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<SerializationError> for SceneError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}

impl From<ParseError> for SceneError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A builder argument that can never produce a valid scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Another entity already uses this id.
    DuplicateId(String),
    /// The preset name is not one of the built-in presets.
    UnknownPreset(String),
    /// A selector key or value the rendering surface cannot interpret.
    MalformedSelector(String),
    /// A representation or raw style the rendering surface cannot apply.
    MalformedStyle(String),
    /// An empty or unparseable zoom expression.
    MalformedZoom(String),
    /// The background color string is empty.
    EmptyBackground,
    /// Viewer dimensions must be non-zero.
    InvalidSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// No entity with this id exists in the scene.
    UnknownEntity(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate entity id '{id}'"),
            Self::UnknownPreset(name) => write!(
                f,
                "unknown preset '{name}' (expected simple, sites or \
                 ball-and-stick)"
            ),
            Self::MalformedSelector(msg) => {
                write!(f, "malformed selector: {msg}")
            }
            Self::MalformedStyle(msg) => write!(f, "malformed style: {msg}"),
            Self::MalformedZoom(msg) => write!(f, "malformed zoom target: {msg}"),
            Self::EmptyBackground => write!(f, "background color is empty"),
            Self::InvalidSize { width, height } => {
                write!(f, "invalid viewer size {width}x{height}")
            }
            Self::UnknownEntity(id) => write!(f, "no entity with id '{id}'"),
        }
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// SerializationError
// ---------------------------------------------------------------------------

/// Structural serialization failure. Fatal for the named entity only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationError {
    /// Id of the entity that could not be serialized.
    pub entity: String,
    /// What went wrong.
    pub reason: String,
}

impl SerializationError {
    pub(crate) fn new(entity: &str, reason: impl Into<String>) -> Self {
        Self {
            entity: entity.to_owned(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity '{}': {}", self.entity, self.reason)
    }
}

impl std::error::Error for SerializationError {}

// ---------------------------------------------------------------------------
// ParseError
// ---------------------------------------------------------------------------

/// Failure reading a structure file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number, when known.
    pub line: Option<usize>,
    /// What went wrong.
    pub message: String,
}

impl ParseError {
    pub(crate) fn at(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }

    pub(crate) fn general(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// RenderWarning
// ---------------------------------------------------------------------------

/// Non-fatal problems met while assembling a document. Processing continues
/// with the fallback described on each variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    /// The molecule had no 3D coordinates; they were generated.
    MissingCoordinates {
        /// Entity id.
        entity: String,
    },
    /// Coordinate generation failed; the flat coordinates were kept.
    CoordinateGenerationFailed {
        /// Entity id.
        entity: String,
        /// Toolkit failure.
        reason: String,
    },
    /// The `sites` preset found no residue naming; only its baseline
    /// styles apply.
    NoResidueData {
        /// Entity id.
        entity: String,
    },
    /// The entity failed to serialize and was left out of the document.
    EntityOmitted {
        /// Entity id.
        entity: String,
        /// Serialization failure.
        reason: String,
    },
}

impl RenderWarning {
    /// Id of the entity the warning concerns.
    #[must_use]
    pub fn entity(&self) -> &str {
        match self {
            Self::MissingCoordinates { entity }
            | Self::CoordinateGenerationFailed { entity, .. }
            | Self::NoResidueData { entity }
            | Self::EntityOmitted { entity, .. } => entity,
        }
    }

    pub(crate) fn coordinate_failure(entity: &str, e: &ToolkitError) -> Self {
        Self::CoordinateGenerationFailed {
            entity: entity.to_owned(),
            reason: e.to_string(),
        }
    }
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCoordinates { entity } => write!(
                f,
                "entity '{entity}' has no 3D coordinates; generated them"
            ),
            Self::CoordinateGenerationFailed { entity, reason } => write!(
                f,
                "entity '{entity}': coordinate generation failed ({reason}); \
                 using flat coordinates"
            ),
            Self::NoResidueData { entity } => write!(
                f,
                "entity '{entity}' has no chain/residue naming; binding site \
                 styles skipped"
            ),
            Self::EntityOmitted { entity, reason } => {
                write!(f, "entity '{entity}' omitted: {reason}")
            }
        }
    }
}
