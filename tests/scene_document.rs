//! End-to-end: build scenes and grids through the public API and inspect
//! the produced documents.

use glam::Vec3;
use scenebook::chem::{Atom, ComponentRole, Residue};
use scenebook::grid::{channel, GridView, SearchMode};
use scenebook::options::GridOptions;
use scenebook::prelude::*;
use serde_json::Value;

fn ligand(title: &str) -> Molecule {
    let mut m = Molecule::new(title);
    let c = m.add_atom(Atom::new("C1", "C", Vec3::new(0.0, 0.0, 0.5)));
    let o = m.add_atom(Atom::new("O1", "O", Vec3::new(1.2, 0.0, 0.5)));
    m.add_bond(c, o, scenebook::chem::BondOrder::Double);
    m
}

fn receptor() -> Complex {
    let mut protein = Molecule::new("rec");
    for (i, x) in [0.0_f32, 3.8, 30.0].into_iter().enumerate() {
        let _ = protein.add_atom(
            Atom::new("CA", "C", Vec3::new(x, 0.0, 0.0))
                .with_residue(Residue::new("ALA", i as i32 + 1, "A")),
        );
    }
    let mut lig = ligand("LIG");
    for atom in &mut lig.atoms {
        atom.residue = Some(Residue::new("LIG", 900, "B"));
    }
    Complex::new("holo")
        .with_component(ComponentRole::Protein, protein)
        .with_component(ComponentRole::Ligand, lig)
}

/// The scene descriptor embedded in a document.
fn descriptor(html: &str) -> Value {
    let start = html.find("-scene\">").map(|i| i + "-scene\">".len()).unwrap();
    let end = start + html[start..].find("</script>").unwrap();
    serde_json::from_str(&html[start..end]).unwrap()
}

fn library() -> RenderLibrary {
    RenderLibrary::new("3Dmol-min.js", "window.$3Dmol = { createViewer() {} };")
}

#[test]
fn identical_scenes_give_identical_documents() {
    let lib = library();
    let ctx = AssemblyContext::new(&lib);
    let build = || {
        let mut b = SceneBuilder::new();
        let _ = b
            .add_entity(receptor(), EntityOptions::default())
            .unwrap()
            .add_entity(ligand("pose"), EntityOptions::default())
            .unwrap()
            .set_preset("sites")
            .unwrap();
        b.to_html(&ctx).unwrap()
    };
    let (a, b) = (build(), build());
    assert_eq!(a, b);
    assert!(a.contains("window.$3Dmol"));
}

#[test]
fn preset_then_custom_rules_layer_in_order() {
    let lib = library();
    let ctx = AssemblyContext::new(&lib);
    let mut b = SceneBuilder::new();
    let _ = b
        .add_entity(receptor(), EntityOptions::default())
        .unwrap()
        .add_style(Selector::all(), Representation::Sphere, StyleParams::new())
        .unwrap()
        .set_preset("simple")
        .unwrap()
        .add_style(
            Selector::chain("A"),
            Representation::Line,
            StyleParams::new().set("color", "red"),
        )
        .unwrap();
    let scene = descriptor(&b.to_html(&ctx).unwrap());
    let styles = scene["styles"].as_array().unwrap();
    // simple preset (2 rules), then the rule added after it; the earlier
    // sphere rule is dropped
    assert_eq!(styles.len(), 3);
    assert_eq!(styles[0]["style"]["cartoon"]["color"], "spectrum");
    assert_eq!(styles[2]["selector"]["chain"], "A");
    assert_eq!(styles[2]["style"]["line"]["color"], "red");
    assert!(!scene.to_string().contains("sphere"));
}

#[test]
fn sites_preset_highlights_residues_near_the_ligand() {
    let lib = library();
    let ctx = AssemblyContext::new(&lib);
    let mut b = SceneBuilder::new();
    let _ = b
        .add_entity(receptor(), EntityOptions::default())
        .unwrap()
        .set_preset("sites")
        .unwrap();
    let artifact = b.render(&ctx).unwrap();
    assert!(artifact.warnings().is_empty());
    let scene = descriptor(artifact.html());
    let resi: Vec<_> = scene["styles"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["selector"]["resi"].as_array())
        .flatten()
        .filter_map(Value::as_i64)
        .collect();
    assert_eq!(resi, vec![1, 2]);
}

#[test]
fn duplicate_ids_and_frozen_scenes_are_rejected() {
    let lib = library();
    let ctx = AssemblyContext::new(&lib);
    let mut b = SceneBuilder::new();
    let _ = b.add_entity(ligand("x"), EntityOptions::default()).unwrap();
    assert!(matches!(
        b.add_entity(ligand("x"), EntityOptions::default()),
        Err(SceneError::Validation(ValidationError::DuplicateId(_)))
    ));
    let first = b.to_html(&ctx).unwrap();
    assert!(matches!(
        b.set_background("red"),
        Err(SceneError::Frozen)
    ));
    assert_eq!(b.to_html(&ctx).unwrap(), first);
}

#[test]
fn sidebar_appears_with_several_entities() {
    let lib = library();
    let ctx = AssemblyContext::new(&lib);

    let mut one = SceneBuilder::new();
    let _ = one.add_entity(ligand("a"), EntityOptions::default()).unwrap();
    let html = one.to_html(&ctx).unwrap();
    assert!(!html.contains("class=\"sb-sidebar\""));

    let mut two = SceneBuilder::new();
    let _ = two
        .add_entity(ligand("a"), EntityOptions::default())
        .unwrap()
        .add_entity(ligand("b"), EntityOptions::named("b").disabled())
        .unwrap();
    let html = two.to_html(&ctx).unwrap();
    assert!(html.contains("class=\"sb-sidebar\""));
    assert_eq!(descriptor(&html)["entities"][1]["displayed"], false);

    let mut forced = SceneBuilder::new();
    let _ = forced
        .add_entity(ligand("a"), EntityOptions::default())
        .unwrap()
        .set_ui(UiConfig {
            sidebar: Some(true),
            ..UiConfig::default()
        })
        .unwrap();
    assert!(forced.to_html(&ctx).unwrap().contains("class=\"sb-sidebar\""));
}

#[test]
fn documents_and_grids_never_reach_the_network() {
    let lib = library();
    let ctx = AssemblyContext::new(&lib);
    let mut b = SceneBuilder::new();
    let _ = b.add_entity(receptor(), EntityOptions::default()).unwrap();
    let html = b.to_html(&ctx).unwrap();
    assert!(scenebook::document::network::external_references(&html).is_empty());

    let grid = MolGrid::from_molecules(&[ligand("a"), ligand("b")]);
    let html = grid.to_html().unwrap();
    assert!(scenebook::document::network::external_references(&html).is_empty());

    let remote = RenderLibrary::new(
        "cdn",
        "document.write('<script src=\"https://cdn.example.org/3Dmol.js\"></script>')",
    );
    let mut b = SceneBuilder::new();
    let _ = b.add_entity(ligand("a"), EntityOptions::default()).unwrap();
    assert!(matches!(
        b.to_html(&AssemblyContext::new(&remote)),
        Err(SceneError::ExternalReference(_))
    ));
}

#[test]
fn grid_selection_round_trips_to_the_host() {
    let items = vec![
        GridItem::new(0, "aspirin").with_field("MW", "180.16"),
        GridItem::new(1, "caffeine").with_field("MW", "194.19"),
        GridItem::new(2, "ibuprofen").with_field("MW", "206.28"),
    ];
    let grid = MolGrid::new(items.clone()).with_id("g1");
    let (port, mut host) = channel();
    let _ = host.register(grid.id());

    let mut view = GridView::new(items, &GridOptions::default());
    let _ = view.toggle(2, true);
    let selection = view.toggle(0, true);
    assert!(port.post_selection(grid.id(), &selection));
    let selection = view.toggle(2, false);
    assert!(port.post_selection(grid.id(), &selection));

    assert_eq!(host.pump(), 2);
    let model = host.model("g1").unwrap();
    assert_eq!(model.selection(), &[0]);
    assert_eq!(model.selection_json(), "[0]");
}

#[test]
fn grid_search_routes_by_mode() {
    let items = vec![
        GridItem::new(0, "benzene").with_structure("c1ccccc1"),
        GridItem::new(1, "ethanol").with_structure("CCO"),
    ];
    let mut view = GridView::new(items, &GridOptions::default());
    view.set_query("CCO");
    assert!(view.matching().is_empty());
    assert_eq!(view.label(), "Showing 0 of 0");

    view.set_mode(SearchMode::Pattern);
    let names: Vec<_> = view.matching().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["ethanol"]);
    assert_eq!(view.label(), "Showing 1–1 of 1");
}
