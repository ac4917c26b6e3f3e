//! The grid widget as host-page markup: an `iframe srcdoc` surface plus the
//! host-side listener script.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{GridItem, GridModel};
use crate::assets;
use crate::chem::Molecule;
use crate::document::descriptor::escape_for_script;
use crate::document::{escape_html, network};
use crate::error::SceneError;
use crate::options::GridOptions;

/// Data the surface script boots from.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SurfaceConfig<'a> {
    grid_id: &'a str,
    page_size: usize,
    debounce_ms: u64,
    search_fields: Vec<String>,
    sort_field: Option<&'a str>,
    items: &'a [GridItem],
    selected: &'a [usize],
}

/// A selectable, searchable grid of molecules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MolGrid {
    id: String,
    items: Vec<GridItem>,
    options: GridOptions,
    selected: Vec<usize>,
}

impl MolGrid {
    /// Grid over `items` with a fresh random id.
    #[must_use]
    pub fn new(items: Vec<GridItem>) -> Self {
        Self {
            id: format!("molgrid-{:08x}", rand::random::<u32>()),
            items,
            options: GridOptions::default(),
            selected: Vec::new(),
        }
    }

    /// Grid with one row per molecule.
    #[must_use]
    pub fn from_molecules(molecules: &[Molecule]) -> Self {
        Self::new(GridItem::from_molecules(molecules))
    }

    /// Use a fixed id instead of the random one.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        id.clone_into(&mut self.id);
        self
    }

    /// Page size, search fields, sort and frame height.
    #[must_use]
    pub fn with_options(mut self, options: GridOptions) -> Self {
        self.options = options;
        self
    }

    /// Rows checked when the surface first loads. Unknown identities are
    /// dropped.
    #[must_use]
    pub fn with_selection(mut self, selection: &[usize]) -> Self {
        let known: BTreeSet<_> = self.items.iter().map(|i| i.index).collect();
        let chosen: BTreeSet<_> =
            selection.iter().copied().filter(|i| known.contains(i)).collect();
        self.selected = chosen.into_iter().collect();
        self
    }

    /// Grid id carried by every selection message.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Rows in item order.
    #[must_use]
    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    /// Host-side model seeded with the initial selection.
    #[must_use]
    pub fn model(&self) -> GridModel {
        let mut model = GridModel::new(&self.id);
        let _ = model.apply(&super::SelectionMessage::new(&self.id, &self.selected));
        model
    }

    fn search_fields(&self) -> Vec<String> {
        if self.options.search_fields.is_empty() {
            let all: BTreeSet<&String> =
                self.items.iter().flat_map(|i| i.fields.keys()).collect();
            all.into_iter().cloned().collect()
        } else {
            self.options.search_fields.clone()
        }
    }

    fn config_json(&self) -> Result<String, SceneError> {
        let config = SurfaceConfig {
            grid_id: &self.id,
            page_size: self.options.page_size.max(1),
            debounce_ms: self.options.debounce_ms,
            search_fields: self.search_fields(),
            sort_field: self.options.sort_field.as_deref(),
            items: &self.items,
            selected: &self.selected,
        };
        Ok(escape_for_script(&serde_json::to_string(&config)?))
    }

    /// Surface document around its config: everything up to the opening of
    /// the config script, and everything from its closing tag on.
    fn surface_parts(&self) -> Result<(String, String), SceneError> {
        let search_fields = self.search_fields();

        let mut sort_options = String::from(r#"<option value="">Item order</option><option value="name">name</option>"#);
        for field in &search_fields {
            let selected = if self.options.sort_field.as_deref() == Some(field.as_str()) {
                " selected"
            } else {
                ""
            };
            let field = escape_html(field);
            sort_options.push_str(&format!(r#"<option value="{field}"{selected}>{field}</option>"#));
        }

        let head = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{css}</style>\n</head>\n<body>\n\
             <div class=\"mg-controls\">\
             <input class=\"mg-search\" type=\"search\" placeholder=\"Search\">\
             <select class=\"mg-mode\"><option value=\"properties\">Properties</option><option value=\"pattern\">Pattern</option></select>\
             <select class=\"mg-sort\">{sort_options}</select>\
             </div>\n<div class=\"mg-items\"></div>\n\
             <div class=\"mg-pager\"><button class=\"mg-prev\" type=\"button\">&lsaquo;</button>\
             <span class=\"mg-label\"></span>\
             <button class=\"mg-next\" type=\"button\">&rsaquo;</button></div>\n\
             <script type=\"application/json\" id=\"mg-config\">",
            css = assets::text(assets::GRID_CSS)?,
        );
        let tail = format!(
            "</script>\n<script>\n{script}\n</script>\n</body>\n</html>\n",
            script = network::neutralize_script(&assets::text(assets::GRID_JS)?),
        );
        Ok((head, tail))
    }

    fn host_markup(&self, surface: &str) -> Result<String, SceneError> {
        let initial = serde_json::to_string(&self.model().selection_json())?;
        Ok(format!(
            "<div class=\"molgrid\" id=\"{id}\">\n\
             <iframe class=\"molgrid-frame\" sandbox=\"allow-scripts\" \
             style=\"width:100%;height:{height}px;border:0\" srcdoc=\"{surface}\"></iframe>\n\
             <script>\n{host}\n</script>\n\
             <script>scenebook.grids.register({key}, {initial});</script>\n</div>\n",
            id = escape_html(&self.id),
            surface = escape_html(surface),
            height = self.options.frame_height,
            host = network::neutralize_script(&assets::text(assets::GRID_HOST_JS)?),
            key = escape_for_script(&serde_json::to_string(&self.id)?),
        ))
    }

    /// Host markup: the sandboxed surface and the listener that records its
    /// selection. Fails if the markup or scripts would reach the network;
    /// item data is not scanned.
    pub fn to_html(&self) -> Result<String, SceneError> {
        let (head, tail) = self.surface_parts()?;
        network::ensure_offline(&self.host_markup(&format!("{head}{tail}"))?)?;

        let html = self.host_markup(&format!("{head}{}{tail}", self.config_json()?))?;
        log::debug!("grid {} with {} items", self.id, self.items.len());
        Ok(html)
    }
}
