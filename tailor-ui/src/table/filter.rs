//! Search, tab and facet filtering.
//!
//! Filtering is a pure function of the rows and a [`FilterState`]. It
//! returns indices into the input slice and never reorders or copies rows.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

use super::row::TableRow;

/// Tab value that matches every row.
pub const ALL_TAB: &str = "all";

/// A categorical filter tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub label: String,
    pub value: String,
}

impl Tab {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// The catch-all tab.
    pub fn all() -> Self {
        Self::new("All", ALL_TAB)
    }
}

/// How the search term is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Case-insensitive substring.
    #[default]
    Substring,
    /// Fuzzy subsequence match; results are ranked by score.
    Fuzzy,
}

/// User-controlled filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_term: String,
    pub active_tab: Option<String>,
    pub facet_value: Option<String>,
}

impl FilterState {
    /// Whether no filter is in effect.
    pub fn is_default(&self) -> bool {
        self.search_term.trim().is_empty()
            && self.active_tab.as_deref().is_none_or(|t| t == ALL_TAB)
            && self.facet_value.is_none()
    }
}

/// Which fields the filter inputs apply to.
#[derive(Debug, Clone, Default)]
pub struct FilterKeys {
    pub search_key: Option<String>,
    pub filter_key: Option<String>,
    pub facet_key: Option<String>,
}

/// Case-insensitive substring match on the stringified `search_key` field.
///
/// An empty or whitespace-only term, or no search key, matches every row.
pub fn matches_search<R: TableRow>(row: &R, search_key: Option<&str>, term: &str) -> bool {
    let term = term.trim();
    let Some(key) = search_key else {
        return true;
    };
    if term.is_empty() {
        return true;
    }
    row.field(key)
        .to_string()
        .to_lowercase()
        .contains(&term.to_lowercase())
}

/// Exact match on the stringified `filter_key` field.
///
/// An unset tab, the [`ALL_TAB`] value, or no filter key matches every row.
pub fn matches_tab<R: TableRow>(row: &R, filter_key: Option<&str>, tab: Option<&str>) -> bool {
    match (filter_key, tab) {
        (Some(key), Some(tab)) if tab != ALL_TAB => row.field(key).to_string() == tab,
        _ => true,
    }
}

/// Exact match on the stringified `facet_key` field.
pub fn matches_facet<R: TableRow>(row: &R, facet_key: Option<&str>, value: Option<&str>) -> bool {
    match (facet_key, value) {
        (Some(key), Some(value)) => row.field(key).to_string() == value,
        _ => true,
    }
}

/// Indices of the rows that pass every filter, in input order
/// (substring mode) or best-score-first (fuzzy mode).
pub fn filter_indices<R: TableRow>(
    rows: &[R],
    keys: &FilterKeys,
    state: &FilterState,
    mode: SearchMode,
) -> Vec<usize> {
    let categorical = rows.iter().enumerate().filter(|(_, row)| {
        matches_tab(*row, keys.filter_key.as_deref(), state.active_tab.as_deref())
            && matches_facet(*row, keys.facet_key.as_deref(), state.facet_value.as_deref())
    });

    match mode {
        SearchMode::Substring => categorical
            .filter(|(_, row)| {
                matches_search(*row, keys.search_key.as_deref(), &state.search_term)
            })
            .map(|(index, _)| index)
            .collect(),
        SearchMode::Fuzzy => {
            let candidates: Vec<usize> = categorical.map(|(index, _)| index).collect();
            match keys.search_key.as_deref() {
                Some(key) if !state.search_term.trim().is_empty() => {
                    let labels: Vec<String> = candidates
                        .iter()
                        .map(|&i| rows[i].field(key).to_string())
                        .collect();
                    fuzzy_filter(state.search_term.trim(), &labels)
                        .into_iter()
                        .map(|m| candidates[m.index])
                        .collect()
                }
                _ => candidates,
            }
        }
    }
}

/// Result of a fuzzy filter operation.
#[derive(Debug, Clone)]
pub struct FuzzyMatch {
    /// Index into the labels passed to [`fuzzy_filter`].
    pub index: usize,
    /// Match score (higher is better).
    pub score: u32,
}

/// Fuzzy-match `query` against `labels`.
///
/// Returns matches sorted by score, highest first; ties keep input order.
/// An empty query returns every label with score 0.
pub fn fuzzy_filter(query: &str, labels: &[String]) -> Vec<FuzzyMatch> {
    if query.is_empty() {
        return (0..labels.len())
            .map(|index| FuzzyMatch { index, score: 0 })
            .collect();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );

    let mut buf = Vec::new();
    let mut matches: Vec<FuzzyMatch> = labels
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            let haystack = Utf32Str::new(label, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| FuzzyMatch { index, score })
        })
        .collect();

    // stable: equal scores keep input order
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CellValue;

    #[derive(Clone)]
    struct Item {
        id: u32,
        name: &'static str,
        kind: &'static str,
    }

    impl TableRow for Item {
        type Key = u32;
        const FIELDS: &'static [&'static str] = &["id", "name", "kind"];

        fn key(&self) -> u32 {
            self.id
        }

        fn field(&self, name: &str) -> CellValue {
            match name {
                "id" => CellValue::from(self.id),
                "name" => CellValue::from(self.name),
                "kind" => CellValue::from(self.kind),
                _ => CellValue::Empty,
            }
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item { id: 1, name: "Cotton Twill", kind: "fabric" },
            Item { id: 2, name: "Metal Zipper", kind: "trim" },
            Item { id: 3, name: "Poly Twill", kind: "fabric" },
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let items = items();
        let row = &items[0];
        assert!(matches_search(row, Some("name"), "TWILL"));
        assert!(matches_search(row, Some("name"), "ton tw"));
        assert!(!matches_search(row, Some("name"), "zip"));
    }

    #[test]
    fn test_empty_term_matches_all() {
        let items = items();
        let row = &items[1];
        assert!(matches_search(row, Some("name"), ""));
        assert!(matches_search(row, Some("name"), "   "));
        assert!(matches_search(row, None, "anything"));
    }

    #[test]
    fn test_tab_all_matches_every_row() {
        let items = items();
        let row = &items[1];
        assert!(matches_tab(row, Some("kind"), Some(ALL_TAB)));
        assert!(matches_tab(row, Some("kind"), None));
        assert!(!matches_tab(row, Some("kind"), Some("fabric")));
    }

    #[test]
    fn test_tab_is_exact_not_substring() {
        let items = items();
        let row = &items[0];
        assert!(!matches_tab(row, Some("kind"), Some("fab")));
    }

    #[test]
    fn test_filter_indices_combines_search_and_tab() {
        let keys = FilterKeys {
            search_key: Some("name".into()),
            filter_key: Some("kind".into()),
            facet_key: None,
        };
        let state = FilterState {
            search_term: "twill".into(),
            active_tab: Some("fabric".into()),
            facet_value: None,
        };
        assert_eq!(
            filter_indices(&items(), &keys, &state, SearchMode::Substring),
            vec![0, 2]
        );
    }

    #[test]
    fn test_fuzzy_mode_matches_subsequence() {
        let keys = FilterKeys {
            search_key: Some("name".into()),
            ..Default::default()
        };
        let state = FilterState {
            search_term: "mzp".into(),
            ..Default::default()
        };
        assert_eq!(
            filter_indices(&items(), &keys, &state, SearchMode::Fuzzy),
            vec![1]
        );
    }

    #[test]
    fn test_fuzzy_empty_query_returns_all() {
        let labels = vec!["a".to_string(), "b".to_string()];
        let matches = fuzzy_filter("", &labels);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].index, 1);
    }
}
