//! Abstract table query state

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vitrine_config::TableConfig;

/// Sort order for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Total coercion from a query-string value
    pub fn parse(value: &str) -> Option<SortDirection> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Inclusive date range filter, always UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Build a range; inverted bounds are swapped
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }
}

/// Everything a table remembers between renders.
///
/// Persisted only in the URL query string; the codec guarantees
/// `decode(encode(s)) == s.normalized(config)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQueryState {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub sort_column: Option<String>,
    pub sort_direction: Option<SortDirection>,
    /// Free-text search term applied across the searchable columns
    pub search: Option<String>,
    /// Per-column filter value sets; ordered maps keep encoding stable
    pub filters: BTreeMap<String, BTreeSet<String>>,
    pub date_range: Option<DateRange>,
}

impl Default for TableQueryState {
    fn default() -> Self {
        Self::with_defaults(&TableConfig::default())
    }
}

impl TableQueryState {
    /// Fresh state using the configured default page size
    pub fn with_defaults(config: &TableConfig) -> Self {
        Self {
            page: 1,
            page_size: config.default_page_size,
            sort_column: None,
            sort_direction: None,
            search: None,
            filters: BTreeMap::new(),
            date_range: None,
        }
    }

    /// Canonical form: page and page size clamped to their bounds, empty
    /// search and empty filter sets dropped, sort direction tied to the
    /// presence of a sort column.
    pub fn normalized(mut self, config: &TableConfig) -> Self {
        self.page = self.page.max(1);
        self.page_size = self
            .page_size
            .clamp(1, config.max_page_size);

        if self.search.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.search = None;
        }
        self.filters.retain(|_, values| !values.is_empty());

        match (&self.sort_column, self.sort_direction) {
            // A column without a direction sorts ascending
            (Some(_), None) => self.sort_direction = Some(SortDirection::Asc),
            // A direction without a column is meaningless
            (None, Some(_)) => self.sort_direction = None,
            _ => {}
        }

        self
    }

    /// Whether any filter, search term or date range is active
    pub fn has_active_filters(&self) -> bool {
        self.search.is_some() || !self.filters.is_empty() || self.date_range.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let state = TableQueryState::default();
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 10);
        assert!(state.sort_column.is_none());
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_normalize_clamps_pagination() {
        let config = TableConfig::default();
        let state = TableQueryState {
            page: 0,
            page_size: 500,
            ..TableQueryState::with_defaults(&config)
        };
        let normalized = state.normalized(&config);
        assert_eq!(normalized.page, 1);
        assert_eq!(normalized.page_size, config.max_page_size);
    }

    #[test]
    fn test_normalize_drops_empty_search_and_filters() {
        let config = TableConfig::default();
        let mut state = TableQueryState::with_defaults(&config);
        state.search = Some("   ".to_string());
        state.filters.insert("status".to_string(), BTreeSet::new());

        let normalized = state.normalized(&config);
        assert!(normalized.search.is_none());
        assert!(normalized.filters.is_empty());
    }

    #[test]
    fn test_normalize_ties_direction_to_column() {
        let config = TableConfig::default();

        let mut state = TableQueryState::with_defaults(&config);
        state.sort_column = Some("name".to_string());
        assert_eq!(
            state.normalized(&config).sort_direction,
            Some(SortDirection::Asc)
        );

        let mut state = TableQueryState::with_defaults(&config);
        state.sort_direction = Some(SortDirection::Desc);
        assert!(state.normalized(&config).sort_direction.is_none());
    }

    #[test]
    fn test_date_range_swaps_inverted_bounds() {
        let from = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let range = DateRange::new(from, to);
        assert!(range.from <= range.to);
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("ASC"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse(" desc "), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("upward"), None);
    }
}
