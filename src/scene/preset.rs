//! Built-in style bundles.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::{EntityKind, Representation, Selector, StyleParams, StyleRule};
use crate::error::{RenderWarning, ValidationError};
use crate::serialize::PreparedEntity;

/// Residues with any atom this close to a ligand atom form the binding
/// site, in Angstroms.
pub const SITE_DISTANCE: f32 = 5.0;

/// A named, fixed bundle of style rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Spectrum cartoon with ligands as sticks.
    Simple,
    /// Translucent cartoon, ligands and binding-site residues as sticks.
    Sites,
    /// Every atom as ball and stick.
    BallAndStick,
}

impl Preset {
    /// All presets in declaration order.
    pub const ALL: [Self; 3] = [Self::Simple, Self::Sites, Self::BallAndStick];

    /// Canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Sites => "sites",
            Self::BallAndStick => "ball-and-stick",
        }
    }

    /// The preset's fixed rules. The `sites` binding-site residues depend on
    /// coordinates and are added by [`binding_site_rules`].
    #[must_use]
    pub fn rules(self) -> Vec<StyleRule> {
        match self {
            Self::Simple => vec![
                StyleRule::new(Selector::all(), Representation::Cartoon)
                    .with_params(StyleParams::new().set("color", "spectrum")),
                StyleRule::new(Selector::hetero(), Representation::Stick),
            ],
            Self::Sites => vec![
                StyleRule::new(Selector::all(), Representation::Cartoon)
                    .with_params(
                        StyleParams::new()
                            .set("color", "white")
                            .set("opacity", 0.8),
                    ),
                StyleRule::new(Selector::hetero(), Representation::Stick)
                    .with_params(
                        StyleParams::new().set("colorscheme", "greenCarbon"),
                    ),
            ],
            Self::BallAndStick => vec![
                StyleRule::new(Selector::all(), Representation::Stick)
                    .with_params(StyleParams::new().set("radius", 0.15)),
                StyleRule::new(Selector::all(), Representation::Sphere)
                    .with_params(StyleParams::new().set("scale", 0.25)),
            ],
        }
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "simple" => Ok(Self::Simple),
            "sites" => Ok(Self::Sites),
            "ball-and-stick" => Ok(Self::BallAndStick),
            _ => Err(ValidationError::UnknownPreset(s.to_owned())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stick rules for residues within [`SITE_DISTANCE`] of any ligand atom in
/// the scene. Ligand atoms are non-water hetero atoms of complexes plus every
/// atom of molecule entities.
///
/// A complex whose polymer atoms carry no chain/residue naming cannot be
/// filtered; it gets a [`RenderWarning::NoResidueData`] and only the preset
/// baseline applies to it.
pub(crate) fn binding_site_rules(
    entities: &[PreparedEntity],
    warnings: &mut Vec<RenderWarning>,
) -> Vec<StyleRule> {
    let ligand: Vec<_> = entities
        .iter()
        .flat_map(|e| e.atoms.iter())
        .filter(|a| a.hetero && !a.residue.as_ref().is_some_and(|r| r.is_water()))
        .map(|a| a.position)
        .collect();
    let cutoff = SITE_DISTANCE * SITE_DISTANCE;

    let mut rules = Vec::new();
    for (model, entity) in entities.iter().enumerate() {
        if entity.kind != EntityKind::Complex {
            continue;
        }
        let polymer: Vec<_> = entity.atoms.iter().filter(|a| !a.hetero).collect();
        if polymer.is_empty() {
            continue;
        }
        let named = polymer.iter().all(|a| {
            a.residue.as_ref().is_some_and(|r| !r.chain.trim().is_empty())
        });
        if !named {
            let warning = RenderWarning::NoResidueData {
                entity: entity.id.clone(),
            };
            log::warn!("{warning}");
            warnings.push(warning);
            continue;
        }

        let mut site: BTreeMap<&str, BTreeSet<i32>> = BTreeMap::new();
        for atom in polymer {
            let Some(res) = &atom.residue else { continue };
            if ligand
                .iter()
                .any(|p| p.distance_squared(atom.position) <= cutoff)
            {
                let _ = site.entry(res.chain.trim()).or_default().insert(res.number);
            }
        }

        for (chain, residues) in site {
            let mut attrs = BTreeMap::new();
            let _ = attrs.insert("model".to_owned(), Value::from(model));
            let _ = attrs.insert("chain".to_owned(), Value::from(chain));
            let _ = attrs.insert(
                "resi".to_owned(),
                Value::from(residues.into_iter().collect::<Vec<_>>()),
            );
            rules.push(StyleRule::new(Selector::Attrs(attrs), Representation::Stick));
        }
    }
    log::debug!("binding site: {} residue rules", rules.len());
    rules
}
