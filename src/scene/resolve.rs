//! Final style list: preset precedence over custom rules.

use super::{Preset, SceneModel, StyleRule};
use crate::error::RenderWarning;
use crate::scene::preset::binding_site_rules;
use crate::serialize::PreparedEntity;

/// The ordered rules to apply for `model`.
///
/// With an active preset the list is the preset's rules followed by the
/// custom rules added *after* the preset was set; rules added before it are
/// dropped. Without a preset it is every custom rule in insertion order.
#[must_use]
pub fn resolve_styles(model: &SceneModel) -> Vec<StyleRule> {
    let mut rules = model.preset().map(Preset::rules).unwrap_or_default();
    rules.extend(applicable_custom_rules(model).cloned());
    rules
}

/// [`resolve_styles`] plus the coordinate-dependent binding-site rules of
/// the `sites` preset, inserted between the preset and the custom rules.
pub(crate) fn resolve_styles_with_sites(
    model: &SceneModel,
    entities: &[PreparedEntity],
    warnings: &mut Vec<RenderWarning>,
) -> Vec<StyleRule> {
    let Some(preset) = model.preset() else {
        return resolve_styles(model);
    };
    let mut rules = preset.rules();
    if preset == Preset::Sites {
        rules.extend(binding_site_rules(entities, warnings));
    }
    rules.extend(applicable_custom_rules(model).cloned());
    rules
}

fn applicable_custom_rules(
    model: &SceneModel,
) -> impl Iterator<Item = &StyleRule> {
    let cutoff = model.preset_activation();
    model
        .sequenced_rules()
        .filter(move |(seq, _)| cutoff.map_or(true, |c| *seq > c))
        .map(|(_, rule)| rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Representation, SceneBuilder, Selector, StyleParams};

    fn rule(chain: &str) -> (Selector, Representation, StyleParams) {
        (Selector::chain(chain), Representation::Stick, StyleParams::new())
    }

    #[test]
    fn no_preset_keeps_insertion_order() {
        let mut b = SceneBuilder::new();
        for chain in ["A", "B", "C"] {
            let (s, r, p) = rule(chain);
            let _ = b.add_style(s, r, p).unwrap();
        }
        let chains: Vec<_> = resolve_styles(b.model())
            .iter()
            .map(|r| r.selector.to_value()["chain"].clone())
            .collect();
        assert_eq!(chains, vec!["A", "B", "C"]);
    }

    #[test]
    fn preset_drops_rules_added_before_it() {
        let mut b = SceneBuilder::new();
        let (s, r, p) = rule("A");
        let _ = b.add_style(s, r, p).unwrap();
        let _ = b.set_preset("simple").unwrap();
        let (s, r, p) = rule("B");
        let _ = b.add_style(s, r, p).unwrap();

        let mut expected = Preset::Simple.rules();
        expected.push(StyleRule::new(Selector::chain("B"), Representation::Stick));
        assert_eq!(resolve_styles(b.model()), expected);
    }

    #[test]
    fn later_preset_moves_the_cutoff() {
        let mut b = SceneBuilder::new();
        let _ = b.set_preset("simple").unwrap();
        let (s, r, p) = rule("A");
        let _ = b.add_style(s, r, p).unwrap();
        let _ = b.set_preset("ball-and-stick").unwrap();

        assert_eq!(resolve_styles(b.model()), Preset::BallAndStick.rules());
    }
}
