//! GUI chrome around the viewer. Only enabled parts are emitted.

use crate::assets;
use crate::error::SceneError;
use crate::scene::UiLayout;

/// Markup, styles and scripts for one document.
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    /// Stylesheet text.
    pub css: String,
    /// Markup placed above the viewer row.
    pub header: String,
    /// Markup placed left of the viewer.
    pub aside: String,
    /// Markup placed below the viewer row.
    pub footer: String,
    /// Script sources in load order, viewer bootstrap first.
    pub scripts: Vec<String>,
}

impl Chrome {
    /// Chrome for `layout` around the viewer with DOM id `id`.
    pub fn build(id: &str, layout: UiLayout) -> Result<Self, SceneError> {
        let mut chrome = Self {
            css: assets::text(assets::CHROME_CSS)?,
            scripts: vec![assets::text(assets::VIEWER_JS)?],
            ..Self::default()
        };
        if layout.menubar {
            chrome.header = format!(r#"<nav class="sb-menubar" id="{id}-menubar"></nav>"#);
            chrome.scripts.push(assets::text(assets::MENUBAR_JS)?);
        }
        if layout.sidebar {
            chrome.aside = format!(r#"<aside class="sb-sidebar" id="{id}-sidebar"></aside>"#);
            chrome.scripts.push(assets::text(assets::SIDEBAR_JS)?);
        }
        if layout.terminal {
            chrome.footer = format!(
                r#"<div class="sb-terminal" id="{id}-terminal"><div class="sb-log"></div><input type="text" spellcheck="false" placeholder="style chain A cartoon | zoom resn LIG | bg black"></div>"#
            );
            chrome.scripts.push(assets::text(assets::TERMINAL_JS)?);
        }
        Ok(chrome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_parts_are_absent() {
        let layout = UiLayout {
            sidebar: false,
            menubar: true,
            terminal: false,
        };
        let chrome = Chrome::build("v", layout).unwrap();
        assert!(chrome.aside.is_empty());
        assert!(chrome.footer.is_empty());
        assert!(chrome.header.contains("v-menubar"));
        assert_eq!(chrome.scripts.len(), 2);
        assert!(!chrome.scripts.iter().any(|s| s.contains("sb.sidebar =")));
    }

    #[test]
    fn full_chrome() {
        let layout = UiLayout {
            sidebar: true,
            menubar: true,
            terminal: true,
        };
        let chrome = Chrome::build("v", layout).unwrap();
        assert_eq!(chrome.scripts.len(), 4);
        assert!(chrome.aside.contains("v-sidebar"));
        assert!(chrome.footer.contains("v-terminal"));
    }
}
