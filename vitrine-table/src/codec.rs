//! Query-string codec
//!
//! Encoding is deterministic (fixed key order, sorted filter values) so the
//! same state always produces the same URL. Decoding never fails: malformed
//! components fall back to the field default instead of failing the whole
//! decode.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;
use url::form_urlencoded;
use vitrine_config::TableConfig;

use crate::query::{DateRange, SortDirection, TableQueryState};

/// Query-string prefix marking a per-column filter key
const FILTER_PREFIX: &str = "f.";

/// Bidirectional mapping between [`TableQueryState`] and the URL query string
#[derive(Debug, Clone)]
pub struct QueryCodec {
    config: TableConfig,
}

impl Default for QueryCodec {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}

impl QueryCodec {
    pub fn new(config: TableConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Canonical form of a state under this codec's configuration
    pub fn normalize(&self, state: &TableQueryState) -> TableQueryState {
        state.clone().normalized(&self.config)
    }

    /// Encode a state into its query-string representation.
    ///
    /// Fields at their default are omitted, so a fresh table encodes to an
    /// empty string.
    pub fn encode(&self, state: &TableQueryState) -> String {
        let state = self.normalize(state);
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if state.page != 1 {
            serializer.append_pair("page", &state.page.to_string());
        }
        if state.page_size != self.config.default_page_size {
            serializer.append_pair("pageSize", &state.page_size.to_string());
        }
        if let Some(column) = &state.sort_column {
            serializer.append_pair("sort", column);
            if let Some(direction) = state.sort_direction {
                serializer.append_pair("order", direction.as_str());
            }
        }
        if let Some(search) = &state.search {
            serializer.append_pair("q", search);
        }
        for (column, values) in &state.filters {
            let key = format!("{}{}", FILTER_PREFIX, column);
            for value in values {
                serializer.append_pair(&key, value);
            }
        }
        if let Some(range) = &state.date_range {
            serializer.append_pair("from", &encode_date(&range.from));
            serializer.append_pair("to", &encode_date(&range.to));
        }

        serializer.finish()
    }

    /// Decode a query string into a state.
    ///
    /// Never fails: unknown keys are ignored, non-numeric pagination falls
    /// back to defaults, unparsable dates are treated as absent.
    pub fn decode(&self, query: &str) -> TableQueryState {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = TableQueryState::with_defaults(&self.config);
        let mut from: Option<DateTime<Utc>> = None;
        let mut to: Option<DateTime<Utc>> = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => match value.parse::<u32>() {
                    Ok(page) if page >= 1 => state.page = page,
                    _ => debug!(value = %value, "falling back to default page"),
                },
                "pageSize" => match value.parse::<u32>() {
                    Ok(size) if size >= 1 => {
                        state.page_size = size.min(self.config.max_page_size)
                    }
                    _ => debug!(value = %value, "falling back to default page size"),
                },
                "sort" => {
                    if !value.trim().is_empty() {
                        state.sort_column = Some(value.into_owned());
                    }
                }
                "order" => state.sort_direction = SortDirection::parse(&value),
                "q" => {
                    if !value.trim().is_empty() {
                        state.search = Some(value.into_owned());
                    }
                }
                "from" => from = decode_date(&value),
                "to" => to = decode_date(&value),
                _ => {
                    if let Some(column) = key.strip_prefix(FILTER_PREFIX) {
                        if !column.is_empty() && !value.is_empty() {
                            state
                                .filters
                                .entry(column.to_string())
                                .or_default()
                                .insert(value.into_owned());
                        }
                    }
                    // Anything else is not ours; leave it alone
                }
            }
        }

        // A half-open range is dropped; an inverted one is swapped
        state.date_range = match (from, to) {
            (Some(from), Some(to)) => Some(DateRange::new(from, to)),
            _ => None,
        };

        state.normalized(&self.config)
    }
}

/// Timezone-stable timestamp: RFC 3339 in UTC with a `Z` suffix
fn encode_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn decode_date(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(_) => {
            debug!(value, "dropping unparsable date");
            None
        }
    }
}
