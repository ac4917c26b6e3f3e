//! Presentation state of the grid surface: search, sort, pagination and
//! selection. The embedded script mirrors these rules; only the selection
//! ever leaves the surface.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::GridItem;
use crate::chem::Toolkit;
use crate::options::GridOptions;

/// Where a search query is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring over the name and the searched fields.
    #[default]
    Properties,
    /// Substructure query against the structure field only.
    Pattern,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "properties" => Ok(Self::Properties),
            "pattern" | "smarts" => Ok(Self::Pattern),
            other => Err(format!("unknown search mode '{other}'")),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Properties => "properties",
            Self::Pattern => "pattern",
        })
    }
}

// ---------------------------------------------------------------------------
// Pattern matching
// ---------------------------------------------------------------------------

/// Decides whether a `pattern` query matches a structure string.
pub trait PatternMatcher {
    /// `true` when `pattern` occurs in `structure`.
    fn matches(&self, pattern: &str, structure: &str) -> bool;
}

/// Plain substring containment.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralMatcher;

impl PatternMatcher for LiteralMatcher {
    fn matches(&self, pattern: &str, structure: &str) -> bool {
        structure.contains(pattern)
    }
}

/// Substructure search through a chemistry toolkit, falling back to literal
/// matching when the toolkit cannot answer.
#[derive(Clone, Copy)]
pub struct ToolkitMatcher<'a>(pub &'a dyn Toolkit);

impl PatternMatcher for ToolkitMatcher<'_> {
    fn matches(&self, pattern: &str, structure: &str) -> bool {
        self.0
            .pattern_matches(pattern, structure)
            .unwrap_or_else(|e| {
                log::debug!("pattern search fell back to substring: {e}");
                LiteralMatcher.matches(pattern, structure)
            })
    }
}

static LITERAL: LiteralMatcher = LiteralMatcher;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Total order for sort values: numbers, then text, then missing.
#[derive(Debug, PartialEq)]
enum SortKey<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

impl<'a> SortKey<'a> {
    /// Blank is missing; only finite decimal numbers are numbers.
    fn of(value: Option<&'a str>) -> Self {
        match value {
            None => Self::Missing,
            Some(v) if v.trim().is_empty() => Self::Missing,
            Some(v) => match v.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Self::Number(n),
                _ => Self::Text(v),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Missing => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

// ---------------------------------------------------------------------------
// GridView
// ---------------------------------------------------------------------------

/// Search, sort, page and selection over a fixed set of items.
pub struct GridView<'m> {
    items: Vec<GridItem>,
    search_fields: Vec<String>,
    page_size: usize,
    query: String,
    mode: SearchMode,
    sort_field: Option<String>,
    page: usize,
    selected: BTreeSet<usize>,
    matcher: &'m dyn PatternMatcher,
}

impl<'m> GridView<'m> {
    /// View over `items` with the page size, searched fields and initial
    /// sort from `options`. An empty field list searches every data field.
    #[must_use]
    pub fn new(items: Vec<GridItem>, options: &GridOptions) -> Self {
        Self {
            items,
            search_fields: options.search_fields.clone(),
            page_size: options.page_size.max(1),
            query: String::new(),
            mode: SearchMode::Properties,
            sort_field: options.sort_field.clone(),
            page: 0,
            selected: BTreeSet::new(),
            matcher: &LITERAL,
        }
    }

    /// Route `pattern` queries through `matcher`.
    #[must_use]
    pub fn with_matcher(mut self, matcher: &'m dyn PatternMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Set the query; returns to the first page.
    pub fn set_query(&mut self, query: &str) {
        query.clone_into(&mut self.query);
        self.page = 0;
    }

    /// Switch search mode; returns to the first page.
    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
        self.page = 0;
    }

    /// Sort by `field` (ascending), or restore item order with `None`.
    pub fn set_sort(&mut self, field: Option<&str>) {
        self.sort_field = field.map(str::to_owned);
    }

    /// Current search mode.
    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    fn is_match(&self, item: &GridItem) -> bool {
        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }
        match self.mode {
            SearchMode::Pattern => {
                !item.structure.is_empty() && self.matcher.matches(query, &item.structure)
            }
            SearchMode::Properties => {
                let needle = query.to_lowercase();
                let contains = |v: &str| v.to_lowercase().contains(&needle);
                if contains(&item.name) {
                    return true;
                }
                if self.search_fields.is_empty() {
                    item.fields.values().any(|v| contains(v))
                } else {
                    self.search_fields
                        .iter()
                        .filter_map(|f| item.field(f))
                        .any(contains)
                }
            }
        }
    }

    /// Matching items in display order.
    #[must_use]
    pub fn matching(&self) -> Vec<&GridItem> {
        let mut items: Vec<_> = self.items.iter().filter(|i| self.is_match(i)).collect();
        if let Some(field) = &self.sort_field {
            items.sort_by(|a, b| {
                SortKey::of(a.field(field)).compare(&SortKey::of(b.field(field)))
            });
        }
        items
    }

    /// Number of pages over the matching items; at least one.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.matching().len().div_ceil(self.page_size).max(1)
    }

    /// Current page, zero-based.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page.min(self.page_count() - 1)
    }

    /// Jump to `page`, clamped to the last page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    /// Advance one page if possible.
    pub fn next_page(&mut self) {
        self.set_page(self.page() + 1);
    }

    /// Go back one page if possible.
    pub fn prev_page(&mut self) {
        self.page = self.page().saturating_sub(1);
    }

    /// Items on the current page.
    #[must_use]
    pub fn visible(&self) -> Vec<&GridItem> {
        self.matching()
            .into_iter()
            .skip(self.page() * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// `Showing X–Y of N` over the matching items.
    #[must_use]
    pub fn label(&self) -> String {
        let total = self.matching().len();
        if total == 0 {
            return "Showing 0 of 0".to_owned();
        }
        let start = self.page() * self.page_size;
        let end = (start + self.page_size).min(total);
        format!("Showing {}–{end} of {total}", start + 1)
    }

    /// Check or uncheck the item with identity `index` and return the full
    /// selection, sorted. Unknown indices leave the selection unchanged.
    pub fn toggle(&mut self, index: usize, checked: bool) -> Vec<usize> {
        if self.items.iter().any(|i| i.index == index) {
            if checked {
                let _ = self.selected.insert(index);
            } else {
                let _ = self.selected.remove(&index);
            }
        }
        self.selection()
    }

    /// Selected item identities, ascending.
    #[must_use]
    pub fn selection(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }
}
