//! Style rules: which atoms ([`Selector`]), how they are drawn
//! ([`Representation`]), and with which parameters ([`StyleParams`]).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// Atom selection in the rendering library's attribute vocabulary.
///
/// Attributes are kept in a sorted map so the serialized form is stable.
/// Every constructor validates keys and value shapes, so a `Selector` that
/// exists is one the rendering surface can interpret.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selector {
    /// Every atom of every model.
    #[default]
    All,
    /// Atoms matching all attribute constraints.
    Attrs(BTreeMap<String, Value>),
}

/// Keys whose values are a string or a list of strings.
const STRING_KEYS: &[&str] = &["chain", "resn", "elem", "atom", "ss", "icode"];
/// Keys whose values are an integer or a list of integers.
const INT_KEYS: &[&str] = &["model", "serial", "index", "expand"];
/// Keys whose values are booleans.
const BOOL_KEYS: &[&str] = &["hetflag", "byres", "invert"];

impl Selector {
    /// Select everything.
    #[must_use]
    pub fn all() -> Self {
        Self::All
    }

    /// Select one chain.
    #[must_use]
    pub fn chain(id: &str) -> Self {
        Self::All.with_unchecked("chain", Value::from(id))
    }

    /// Select hetero atoms (ligands, solvent, small molecules).
    #[must_use]
    pub fn hetero() -> Self {
        Self::All.with_unchecked("hetflag", Value::Bool(true))
    }

    /// Parse a selector from JSON: the string `"all"`, or an object of
    /// attribute constraints.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::String(s) if s == "all" => Ok(Self::All),
            Value::Object(map) => {
                let mut sel = Self::All;
                for (key, v) in map {
                    sel = sel.with(key, v.clone())?;
                }
                Ok(sel)
            }
            other => Err(ValidationError::MalformedSelector(format!(
                "expected \"all\" or an attribute map, got {other}"
            ))),
        }
    }

    /// Add one attribute constraint, validating it.
    pub fn with(self, key: &str, value: Value) -> Result<Self, ValidationError> {
        validate_attr(key, &value)?;
        Ok(self.with_unchecked(key, value))
    }

    fn with_unchecked(self, key: &str, value: Value) -> Self {
        let mut attrs = match self {
            Self::All => BTreeMap::new(),
            Self::Attrs(attrs) => attrs,
        };
        let _ = attrs.insert(key.to_owned(), value);
        Self::Attrs(attrs)
    }

    /// Whether this selects every atom.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The selector as a JSON value (`{}` for [`Selector::All`]).
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::All => Value::Object(Map::new()),
            Self::Attrs(attrs) => Value::Object(
                attrs.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            ),
        }
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_map(Some(0))?.end(),
            Self::Attrs(attrs) => attrs.serialize(serializer),
        }
    }
}

fn malformed(key: &str, expected: &str, value: &Value) -> ValidationError {
    ValidationError::MalformedSelector(format!(
        "'{key}' expects {expected}, got {value}"
    ))
}

fn validate_attr(key: &str, value: &Value) -> Result<(), ValidationError> {
    let each = |ok: fn(&Value) -> bool| match value {
        Value::Array(items) => !items.is_empty() && items.iter().all(ok),
        single => ok(single),
    };

    if STRING_KEYS.contains(&key) {
        if !each(|v| v.as_str().is_some_and(|s| !s.is_empty())) {
            return Err(malformed(key, "a string or list of strings", value));
        }
    } else if INT_KEYS.contains(&key) {
        if !each(|v| v.as_i64().is_some()) {
            return Err(malformed(key, "an integer or list of integers", value));
        }
    } else if BOOL_KEYS.contains(&key) {
        if !value.is_boolean() {
            return Err(malformed(key, "a boolean", value));
        }
    } else {
        match key {
            "resi" => {
                if !each(is_residue_spec) {
                    return Err(malformed(
                        key,
                        "residue numbers or \"start-end\" ranges",
                        value,
                    ));
                }
            }
            "within" => validate_within(value)?,
            "and" | "or" => match value {
                Value::Array(items) if !items.is_empty() => {
                    for item in items {
                        let _ = Selector::from_value(item)?;
                    }
                }
                _ => return Err(malformed(key, "a list of selectors", value)),
            },
            "not" => {
                if !value.is_object() {
                    return Err(malformed(key, "a selector", value));
                }
                let _ = Selector::from_value(value)?;
            }
            _ => {
                return Err(ValidationError::MalformedSelector(format!(
                    "unknown selector attribute '{key}'"
                )))
            }
        }
    }
    Ok(())
}

fn is_residue_spec(value: &Value) -> bool {
    if value.as_i64().is_some() {
        return true;
    }
    value.as_str().is_some_and(|s| {
        let s = s.trim();
        let (start, end) = match s.get(1..).and_then(|rest| rest.find('-')) {
            Some(pos) => (&s[..=pos], &s[pos + 2..]),
            None => (s, "0"),
        };
        start.parse::<i64>().is_ok() && end.parse::<i64>().is_ok()
    })
}

fn validate_within(value: &Value) -> Result<(), ValidationError> {
    let distance_ok = value
        .get("distance")
        .and_then(Value::as_f64)
        .is_some_and(|d| d > 0.0);
    let Some(sel) = value.get("sel").filter(|_| distance_ok) else {
        return Err(malformed(
            "within",
            "{ distance: positive number, sel: selector }",
            value,
        ));
    };
    let _ = Selector::from_value(sel)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Representation
// ---------------------------------------------------------------------------

/// How selected atoms are drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Representation {
    /// Secondary-structure ribbon.
    Cartoon,
    /// Bonds as cylinders.
    Stick,
    /// Space-filling spheres.
    Sphere,
    /// Bonds as lines.
    Line,
    /// Atoms as crosses.
    Cross,
    /// Molecular surface.
    Surface,
    /// A complete style object passed to the rendering library unchanged.
    Raw(Map<String, Value>),
}

impl Representation {
    /// Wrap a raw style object. Anything but a JSON object is rejected.
    pub fn raw(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self::Raw(map)),
            other => Err(ValidationError::MalformedStyle(format!(
                "raw style must be an object, got {other}"
            ))),
        }
    }

    /// Style key in the rendering library, `None` for raw styles.
    #[must_use]
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::Cartoon => Some("cartoon"),
            Self::Stick => Some("stick"),
            Self::Sphere => Some("sphere"),
            Self::Line => Some("line"),
            Self::Cross => Some("cross"),
            Self::Surface => Some("surface"),
            Self::Raw(_) => None,
        }
    }
}

impl FromStr for Representation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cartoon" => Ok(Self::Cartoon),
            "stick" | "sticks" => Ok(Self::Stick),
            "sphere" | "spheres" => Ok(Self::Sphere),
            "line" | "lines" => Ok(Self::Line),
            "cross" => Ok(Self::Cross),
            "surface" => Ok(Self::Surface),
            other => Err(ValidationError::MalformedStyle(format!(
                "unknown representation '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key().unwrap_or("raw"))
    }
}

// ---------------------------------------------------------------------------
// StyleParams / StyleRule
// ---------------------------------------------------------------------------

/// Free-form overrides for a representation, e.g. `color` or `radius`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct StyleParams(BTreeMap<String, Value>);

impl StyleParams {
    /// No overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one parameter.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        let _ = self.0.insert(key.to_owned(), value.into());
        self
    }

    /// Whether no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// One styling instruction: draw `selector` as `representation`.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// Atoms the rule applies to.
    pub selector: Selector,
    /// How they are drawn.
    pub representation: Representation,
    /// Representation overrides.
    pub params: StyleParams,
}

impl StyleRule {
    /// Create a rule with no parameter overrides.
    #[must_use]
    pub fn new(selector: Selector, representation: Representation) -> Self {
        Self {
            selector,
            representation,
            params: StyleParams::new(),
        }
    }

    /// Replace the parameter overrides.
    #[must_use]
    pub fn with_params(mut self, params: StyleParams) -> Self {
        self.params = params;
        self
    }

    /// Whether the rule adds a surface rather than an atom style.
    #[must_use]
    pub fn is_surface(&self) -> bool {
        self.representation == Representation::Surface
    }

    /// Style object for the rendering library: `{ "<repr>": {params} }`,
    /// the raw object merged with params, or the bare params for surfaces.
    #[must_use]
    pub fn style_value(&self) -> Value {
        let params: Map<String, Value> = self
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        match (&self.representation, self.representation.key()) {
            (Representation::Raw(raw), _) => {
                let mut merged = raw.clone();
                merged.extend(params);
                Value::Object(merged)
            }
            (Representation::Surface, _) | (_, None) => Value::Object(params),
            (_, Some(key)) => {
                let mut style = Map::new();
                let _ = style.insert(key.to_owned(), Value::Object(params));
                Value::Object(style)
            }
        }
    }
}
