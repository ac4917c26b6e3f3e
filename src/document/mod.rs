//! Scene model → single self-contained HTML document.
//!
//! [`assemble`] is stateless: given a model and an [`AssemblyContext`] it
//! serializes every entity, resolves styles, and inlines the rendering
//! library, the chrome and the scene descriptor into one string. The result
//! never references anything outside itself.

mod chrome;
pub mod descriptor;
mod display;
mod library;
pub mod network;

use std::path::Path;

pub use chrome::Chrome;
pub use descriptor::SceneDescriptor;
pub use display::{
    display, DisplayHandle, DisplaySink, Displayable, MemorySink, MimeBundle,
};
pub use library::RenderLibrary;

use crate::chem::{NullToolkit, Toolkit};
use crate::error::{RenderWarning, SceneError};
use crate::options::Options;
use crate::scene::resolve::resolve_styles_with_sites;
use crate::scene::SceneModel;
use crate::serialize;

static NULL_TOOLKIT: NullToolkit = NullToolkit;

/// Everything assembly needs besides the model itself.
#[derive(Clone)]
pub struct AssemblyContext<'a> {
    /// Ambient defaults.
    pub options: Options,
    /// Inlined rendering library.
    pub library: &'a RenderLibrary,
    /// Chemistry collaborator for coordinate generation.
    pub toolkit: &'a dyn Toolkit,
}

impl<'a> AssemblyContext<'a> {
    /// Default options and no chemistry toolkit.
    #[must_use]
    pub fn new(library: &'a RenderLibrary) -> Self {
        Self {
            options: Options::default(),
            library,
            toolkit: &NULL_TOOLKIT,
        }
    }

    /// Use `options` instead of the defaults.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Use `toolkit` for coordinate generation.
    #[must_use]
    pub fn with_toolkit(mut self, toolkit: &'a dyn Toolkit) -> Self {
        self.toolkit = toolkit;
        self
    }
}

impl std::fmt::Debug for AssemblyContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssemblyContext")
            .field("options", &self.options)
            .field("library", &self.library.name)
            .finish_non_exhaustive()
    }
}

/// A finished document and the warnings raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    html: String,
    warnings: Vec<RenderWarning>,
}

impl Artifact {
    pub(crate) fn new(html: String, warnings: Vec<RenderWarning>) -> Self {
        Self { html, warnings }
    }

    /// The document text.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Consume into the document text.
    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }

    /// Non-fatal problems, in the order they were met.
    #[must_use]
    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }

    /// Write the document to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<(), SceneError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.html)?;
        log::info!("wrote {} ({} bytes)", path.display(), self.html.len());
        Ok(())
    }
}

/// Compile `model` into a self-contained HTML document.
///
/// Entities that fail to serialize are left out with a
/// [`RenderWarning::EntityOmitted`]; the rest of the scene still renders.
/// A document that would need the network is rejected with
/// [`SceneError::ExternalReference`].
pub fn assemble(
    model: &SceneModel,
    ctx: &AssemblyContext<'_>,
) -> Result<Artifact, SceneError> {
    model.validate()?;
    let mut warnings = Vec::new();

    let mut prepared = Vec::with_capacity(model.entities().len());
    for entity in model.entities() {
        match serialize::prepare(entity, ctx.toolkit, &mut warnings) {
            Ok(p) => prepared.push(p),
            Err(e) => {
                let warning = RenderWarning::EntityOmitted {
                    entity: e.entity,
                    reason: e.reason,
                };
                log::warn!("{warning}");
                warnings.push(warning);
            }
        }
    }

    let rules = resolve_styles_with_sites(model, &prepared, &mut warnings);
    let layout = model
        .ui()
        .resolve(&ctx.options.ui, model.entities().len());
    let descriptor = SceneDescriptor::new(
        model.background(&ctx.options.viewer),
        model.size(&ctx.options.viewer),
        &prepared,
        &rules,
        model.zoom(),
        layout,
    )?;
    log::debug!(
        "assembling {}: {} entities, {} styles, {} surfaces",
        descriptor.viewer_id,
        descriptor.entities.len(),
        descriptor.styles.len(),
        descriptor.surfaces.len()
    );

    let chrome = Chrome::build(&descriptor.viewer_id, layout)?;
    let (head, tail) = render_page(ctx, &descriptor, &chrome);
    network::ensure_offline(&head)?;
    network::ensure_offline(&tail)?;

    let json = descriptor.to_script_json()?;
    let mut html = String::with_capacity(head.len() + json.len() + tail.len());
    html.push_str(&head);
    html.push_str(&json);
    html.push_str(&tail);
    Ok(Artifact::new(html, warnings))
}

/// The page around the scene data: everything up to the opening of the data
/// script, and everything from its closing tag on.
fn render_page(
    ctx: &AssemblyContext<'_>,
    descriptor: &SceneDescriptor<'_>,
    chrome: &Chrome,
) -> (String, String) {
    let id = &descriptor.viewer_id;
    let library = network::neutralize_script(&ctx.library.source);

    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n",
        escape_html(&ctx.options.viewer.document_title),
        chrome.css
    ));
    html.push_str(&format!(
        "<div class=\"sb-root\" id=\"{id}-root\">\n{}\n<div class=\"sb-body\">\n{}\n\
         <div class=\"sb-viewer\" id=\"{id}\" style=\"width:{}px;height:{}px\"></div>\n\
         </div>\n{}\n</div>\n",
        chrome.header, chrome.aside, descriptor.width, descriptor.height, chrome.footer
    ));
    html.push_str(&format!(
        "<script type=\"application/json\" id=\"{id}-scene\">"
    ));

    let mut tail = String::with_capacity(library.len() + 16 * 1024);
    tail.push_str("</script>\n");
    tail.push_str(&format!(
        "<script data-library=\"{}\">\n{library}\n</script>\n",
        escape_html(&ctx.library.name)
    ));
    for script in &chrome.scripts {
        tail.push_str("<script>\n");
        tail.push_str(&network::neutralize_script(script));
        tail.push_str("\n</script>\n");
    }
    tail.push_str(&format!("<script>scenebook.boot(\"{id}\");</script>\n"));
    tail.push_str("</body>\n</html>\n");
    (html, tail)
}

/// Escape text for HTML element content and double-quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::chem::{Atom, Complex, ComponentRole, Molecule, Residue};
    use crate::scene::{EntityOptions, SceneBuilder};

    fn library() -> RenderLibrary {
        RenderLibrary::new("3Dmol-stub.js", "window.$3Dmol = { createViewer: function () {} };")
    }

    fn ligand(title: &str) -> Molecule {
        let mut m = Molecule::new(title);
        let _ = m.add_atom(Atom::new("C", "C", Vec3::new(0.0, 0.0, 0.5)));
        m
    }

    fn protein() -> Complex {
        let mut m = Molecule::new("receptor");
        let _ = m.add_atom(
            Atom::new("CA", "C", Vec3::new(2.0, 0.0, 0.0))
                .with_residue(Residue::new("SER", 42, "A")),
        );
        Complex::from_structure(m)
    }

    #[test]
    fn document_embeds_everything() {
        let lib = library();
        let ctx = AssemblyContext::new(&lib);
        let mut b = SceneBuilder::new();
        let _ = b
            .add_entity(ligand("lig"), EntityOptions::default())
            .unwrap()
            .add_entity(protein(), EntityOptions::default().disabled())
            .unwrap()
            .set_preset("sites")
            .unwrap();
        let artifact = b.render(&ctx).unwrap();
        let html = artifact.html();

        assert!(html.contains("window.$3Dmol"));
        assert!(html.contains("scenebook.boot(\"scenebook-"));
        assert!(html.contains("-sidebar\""));
        assert!(html.contains(r#""resi":[42]"#));
        assert!(html.contains(r#""displayed":false"#));
        assert!(artifact.warnings().is_empty());
    }

    #[test]
    fn assembly_is_deterministic() {
        let lib = library();
        let ctx = AssemblyContext::new(&lib);
        let build = || {
            let mut b = SceneBuilder::new();
            let _ = b
                .add_entity(ligand("a"), EntityOptions::default())
                .unwrap()
                .set_background("black")
                .unwrap();
            b
        };
        let first = assemble(build().model(), &ctx).unwrap();
        let second = assemble(build().model(), &ctx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn failing_entity_is_omitted_with_warning() {
        let lib = library();
        let ctx = AssemblyContext::new(&lib);
        let bad = Complex::new("bad").with_component(ComponentRole::Protein, {
            let mut m = Molecule::new("bad");
            let _ = m.add_atom(
                Atom::new("CA", "C", Vec3::ZERO).with_residue(Residue::new("GLY", 1, "AA")),
            );
            m
        });
        let mut b = SceneBuilder::new();
        let _ = b
            .add_entity(ligand("ok"), EntityOptions::default())
            .unwrap()
            .add_entity(bad, EntityOptions::default())
            .unwrap();
        let artifact = b.render(&ctx).unwrap();
        assert_eq!(artifact.warnings().len(), 1);
        assert_eq!(artifact.warnings()[0].entity(), "bad");
        assert!(artifact.html().contains(r#""id":"ok""#));
        assert!(!artifact.html().contains(r#""id":"bad""#));
    }

    #[test]
    fn remote_library_is_rejected() {
        let lib = RenderLibrary::new(
            "loader.js",
            r#"var s = document.createElement('script'); s.src = "https://cdn.example/3Dmol.js";"#,
        );
        let ctx = AssemblyContext::new(&lib);
        let err = assemble(&SceneModel::default(), &ctx).unwrap_err();
        assert!(matches!(err, SceneError::ExternalReference(url) if url == "https://cdn.example/3Dmol.js"));
    }

    #[test]
    fn library_fetching_by_url_is_rejected() {
        let lib = RenderLibrary::new(
            "loader.js",
            r#"fetch("https://cdn.example.org/payload.js"); import("https://cdn.example.org/m.js");"#,
        );
        let ctx = AssemblyContext::new(&lib);
        let err = assemble(&SceneModel::default(), &ctx).unwrap_err();
        assert!(matches!(err, SceneError::ExternalReference(url) if url == "https://cdn.example.org/payload.js"));
    }

    #[test]
    fn urls_inside_entity_data_are_inert() {
        let lib = library();
        let ctx = AssemblyContext::new(&lib);
        let mut cited = ligand("aspirin");
        let _ = cited.properties.insert(
            "source".to_owned(),
            "url(https://pubchem.ncbi.nlm.nih.gov/compound/2244)".to_owned(),
        );
        let mut b = SceneBuilder::new();
        let _ = b
            .add_entity(cited, EntityOptions::default())
            .unwrap()
            .add_entity(ligand("clean"), EntityOptions::default())
            .unwrap();
        let artifact = b.render(&ctx).unwrap();
        assert!(artifact.warnings().is_empty());
        assert!(artifact.html().contains("pubchem.ncbi.nlm.nih.gov"));
        assert!(artifact.html().contains(r#""id":"aspirin""#));
        assert!(artifact.html().contains(r#""id":"clean""#));
    }

    #[test]
    fn library_cannot_close_its_script() {
        let lib = RenderLibrary::new("evil.js", "var x = '</script><p>';");
        let ctx = AssemblyContext::new(&lib);
        let html = assemble(&SceneModel::default(), &ctx).unwrap().into_html();
        assert!(html.contains(r"var x = '<\/script><p>';"));
    }

    #[test]
    fn options_drive_defaults() {
        let lib = library();
        let mut options = Options::default();
        options.viewer.background = "#000".to_owned();
        options.ui.terminal = false;
        let ctx = AssemblyContext::new(&lib).with_options(options);
        let html = assemble(&SceneModel::default(), &ctx).unwrap().into_html();
        assert!(html.contains(r##""background":"#000""##));
        assert!(!html.contains("-terminal\""));
    }
}
