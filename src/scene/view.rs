//! Camera target and chrome visibility.

use serde::{Deserialize, Serialize, Serializer};

use super::Selector;
use crate::error::ValidationError;
use crate::options::{SidebarMode, UiOptions};

// ---------------------------------------------------------------------------
// ZoomTarget
// ---------------------------------------------------------------------------

/// What the camera frames when the document opens.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ZoomTarget {
    /// Fit every displayed atom.
    #[default]
    All,
    /// Selection expression such as `"chain A and resi 10-20"`, resolved by
    /// the document's own selection parser.
    Expression(String),
    /// Selector handed to the rendering library verbatim.
    Selector(Selector),
}

impl ZoomTarget {
    /// Expression target; empty expressions are rejected.
    pub fn expression(expr: &str) -> Result<Self, ValidationError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(ValidationError::MalformedZoom(
                "empty selection expression".to_owned(),
            ));
        }
        Ok(Self::Expression(expr.to_owned()))
    }
}

impl From<Selector> for ZoomTarget {
    fn from(sel: Selector) -> Self {
        Self::Selector(sel)
    }
}

impl Serialize for ZoomTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_none(),
            Self::Expression(expr) => serializer.serialize_str(expr),
            Self::Selector(sel) => sel.serialize(serializer),
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Explicit chrome overrides. `None` defers to the [`UiOptions`] defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    /// Entity list.
    pub sidebar: Option<bool>,
    /// View controls.
    pub menubar: Option<bool>,
    /// Command line.
    pub terminal: Option<bool>,
}

impl UiConfig {
    /// Overlay the `Some` fields of `patch`; `None` keeps the current value.
    pub fn apply(&mut self, patch: Self) {
        self.sidebar = patch.sidebar.or(self.sidebar);
        self.menubar = patch.menubar.or(self.menubar);
        self.terminal = patch.terminal.or(self.terminal);
    }

    /// Resolve against defaults for a scene holding `entity_count` entities.
    #[must_use]
    pub fn resolve(&self, defaults: &UiOptions, entity_count: usize) -> UiLayout {
        let sidebar = self.sidebar.unwrap_or(match defaults.sidebar {
            SidebarMode::Show => true,
            SidebarMode::Hide => false,
            SidebarMode::Auto => entity_count >= defaults.sidebar_min_entities,
        });
        UiLayout {
            sidebar,
            menubar: self.menubar.unwrap_or(defaults.menubar),
            terminal: self.terminal.unwrap_or(defaults.terminal),
        }
    }
}

/// Resolved chrome visibility embedded in the scene descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UiLayout {
    /// Entity list shown.
    pub sidebar: bool,
    /// View controls shown.
    pub menubar: bool,
    /// Command line shown.
    pub terminal: bool,
}
