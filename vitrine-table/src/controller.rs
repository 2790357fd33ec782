//! Generic data table controller
//!
//! The controller owns the query state and a monotonically increasing state
//! version. Every mutation bumps the version and runs one fetch tagged with
//! it; a result whose tag no longer matches the current version is discarded,
//! so the visible rows always belong to the newest issued state regardless of
//! completion order. Older fetches are not cancelled, merely superseded.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, warn};
use vitrine_api_types::ListResponse;
use vitrine_config::TableConfig;

use crate::codec::QueryCodec;
use crate::error::{TableError, TableResult};
use crate::labels::ColumnLabelMap;
use crate::query::{DateRange, SortDirection, TableQueryState};

/// Result of one data fetch.
///
/// The fetcher signature is infallible; a failed call travels in `error` and
/// is surfaced through the snapshot, never raised.
#[derive(Debug, Clone)]
pub struct FetchResult<R> {
    pub rows: Vec<R>,
    pub page_count: u32,
    pub error: Option<String>,
}

impl<R> FetchResult<R> {
    pub fn ok(rows: Vec<R>, page_count: u32) -> Self {
        Self {
            rows,
            page_count,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            page_count: 0,
            error: Some(message.into()),
        }
    }
}

impl<R> From<ListResponse<R>> for FetchResult<R> {
    fn from(response: ListResponse<R>) -> Self {
        Self::ok(response.items, response.page_count)
    }
}

/// Caller-supplied data source, one per entity page.
///
/// Opaque to the controller: it receives the full query state and answers
/// with a page of rows.
#[async_trait]
pub trait RowFetcher<R>: Send + Sync {
    async fn fetch(&self, state: &TableQueryState) -> FetchResult<R>;
}

/// Point-in-time view of the table for the presentation layer
#[derive(Debug, Clone)]
pub struct TableSnapshot<R> {
    pub rows: Vec<R>,
    pub page_count: u32,
    pub loading: bool,
    pub error: Option<String>,
    pub state: TableQueryState,
    pub version: u64,
}

struct Inner<R> {
    state: TableQueryState,
    version: u64,
    rows: Vec<R>,
    page_count: u32,
    loading: bool,
    error: Option<String>,
    columns: Vec<String>,
    labels: ColumnLabelMap,
    searchable: BTreeSet<String>,
    filterable: BTreeSet<String>,
}

/// Owns table state and mediates between mutations and the fetcher
pub struct TableController<R> {
    fetcher: Arc<dyn RowFetcher<R>>,
    codec: QueryCodec,
    inner: Mutex<Inner<R>>,
}

impl<R: Clone + Send + 'static> TableController<R> {
    pub fn builder(fetcher: Arc<dyn RowFetcher<R>>) -> TableControllerBuilder<R> {
        TableControllerBuilder::new(fetcher)
    }

    /// Current view of the table
    pub fn snapshot(&self) -> TableSnapshot<R> {
        let inner = self.inner.lock().expect("table lock");
        Self::snapshot_of(&inner)
    }

    /// Column identifiers in display order
    pub fn columns(&self) -> Vec<String> {
        self.inner.lock().expect("table lock").columns.clone()
    }

    /// Cached display labels for the current column set
    pub fn labels(&self) -> ColumnLabelMap {
        self.inner.lock().expect("table lock").labels.clone()
    }

    pub fn searchable_columns(&self) -> BTreeSet<String> {
        self.inner.lock().expect("table lock").searchable.clone()
    }

    pub fn filterable_columns(&self) -> BTreeSet<String> {
        self.inner.lock().expect("table lock").filterable.clone()
    }

    /// Replace the column set; labels are recomputed here, once, not per
    /// render. Searchable and filterable sets are pruned to the new columns.
    pub fn set_columns(&self, columns: Vec<String>) -> TableResult<()> {
        if columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        let mut inner = self.inner.lock().expect("table lock");
        inner.labels = ColumnLabelMap::resolve(&columns);
        inner.searchable.retain(|c| columns.contains(c));
        inner.filterable.retain(|c| columns.contains(c));
        inner.columns = columns;
        Ok(())
    }

    /// Query-string representation of the current state
    pub fn query_string(&self) -> String {
        let inner = self.inner.lock().expect("table lock");
        self.codec.encode(&inner.state)
    }

    /// Adopt state from a URL query string and fetch it
    pub async fn apply_query_string(&self, query: &str) -> TableSnapshot<R> {
        let decoded = self.codec.decode(query);
        self.apply(move |state| *state = decoded).await
    }

    /// Initial fetch for the current state
    pub async fn load(&self) -> TableSnapshot<R> {
        self.apply(|_| {}).await
    }

    /// Re-run the fetch for the current state (manual retry after an error)
    pub async fn refresh(&self) -> TableSnapshot<R> {
        self.apply(|_| {}).await
    }

    /// Jump to a page, keeping every other dimension
    pub async fn set_page(&self, page: u32) -> TableSnapshot<R> {
        self.apply(move |state| state.page = page.max(1)).await
    }

    /// Change the page size; the page resets so the window stays valid
    pub async fn set_page_size(&self, page_size: u32) -> TableSnapshot<R> {
        self.apply(move |state| {
            state.page_size = page_size;
            state.page = 1;
        })
        .await
    }

    /// Cycle sorting on a column: ascending, then descending, then none.
    /// Sorting a different column starts ascending.
    pub async fn set_sort(&self, column: &str) -> TableSnapshot<R> {
        let column = column.to_string();
        self.apply(move |state| {
            if state.sort_column.as_deref() == Some(column.as_str()) {
                match state.sort_direction {
                    Some(SortDirection::Asc) => {
                        state.sort_direction = Some(SortDirection::Desc);
                    }
                    _ => {
                        state.sort_column = None;
                        state.sort_direction = None;
                    }
                }
            } else {
                state.sort_column = Some(column.clone());
                state.sort_direction = Some(SortDirection::Asc);
            }
            state.page = 1;
        })
        .await
    }

    /// Replace the search term; `None` or blank clears it
    pub async fn set_search(&self, search: Option<String>) -> TableSnapshot<R> {
        {
            let inner = self.inner.lock().expect("table lock");
            if inner.searchable.is_empty() {
                warn!("ignoring search on a table with no searchable columns");
                return Self::snapshot_of(&inner);
            }
        }
        self.apply(move |state| {
            state.search = search;
            state.page = 1;
        })
        .await
    }

    /// Toggle one filter value on a column
    pub async fn toggle_filter(&self, column: &str, value: &str) -> TableSnapshot<R> {
        {
            let inner = self.inner.lock().expect("table lock");
            if !inner.filterable.contains(column) {
                warn!(column, "ignoring filter on a non-filterable column");
                return Self::snapshot_of(&inner);
            }
        }
        let column = column.to_string();
        let value = value.to_string();
        self.apply(move |state| {
            let values = state.filters.entry(column.clone()).or_default();
            if !values.remove(&value) {
                values.insert(value.clone());
            }
            if values.is_empty() {
                state.filters.remove(&column);
            }
            state.page = 1;
        })
        .await
    }

    /// Clear every filter, the search term and the date range
    pub async fn reset_filters(&self) -> TableSnapshot<R> {
        self.apply(|state| {
            state.filters.clear();
            state.search = None;
            state.date_range = None;
            state.page = 1;
        })
        .await
    }

    /// Replace the date range; `None` clears it
    pub async fn set_date_range(&self, range: Option<DateRange>) -> TableSnapshot<R> {
        self.apply(move |state| {
            state.date_range = range;
            state.page = 1;
        })
        .await
    }

    /// Mutate the state, bump the version and run the fetch for it.
    ///
    /// Commit is last-write-wins by version: if a newer mutation was issued
    /// while this fetch was in flight, its result is dropped on the floor.
    async fn apply<F>(&self, mutate: F) -> TableSnapshot<R>
    where
        F: FnOnce(&mut TableQueryState),
    {
        let (version, state) = {
            let mut inner = self.inner.lock().expect("table lock");
            mutate(&mut inner.state);
            inner.state = self.codec.normalize(&inner.state);
            inner.version += 1;
            inner.loading = true;
            (inner.version, inner.state.clone())
        };

        let result = self.fetcher.fetch(&state).await;

        let mut inner = self.inner.lock().expect("table lock");
        if inner.version != version {
            debug!(
                issued = version,
                current = inner.version,
                "discarding stale fetch result"
            );
            return Self::snapshot_of(&inner);
        }

        inner.loading = false;
        match result.error {
            Some(message) => {
                warn!(error = %message, "table fetch failed");
                inner.rows = Vec::new();
                inner.page_count = 0;
                inner.error = Some(message);
            }
            None => {
                inner.rows = result.rows;
                inner.page_count = result.page_count;
                inner.error = None;
            }
        }
        Self::snapshot_of(&inner)
    }

    fn snapshot_of(inner: &Inner<R>) -> TableSnapshot<R> {
        TableSnapshot {
            rows: inner.rows.clone(),
            page_count: inner.page_count,
            loading: inner.loading,
            error: inner.error.clone(),
            state: inner.state.clone(),
            version: inner.version,
        }
    }
}

/// Builder mirroring the table contract: columns, fetcher, initial state,
/// searchable and filterable column sets
pub struct TableControllerBuilder<R> {
    fetcher: Arc<dyn RowFetcher<R>>,
    columns: Vec<String>,
    searchable: Vec<String>,
    filterable: Vec<String>,
    initial_state: Option<TableQueryState>,
    config: TableConfig,
}

impl<R: Clone + Send + 'static> TableControllerBuilder<R> {
    pub fn new(fetcher: Arc<dyn RowFetcher<R>>) -> Self {
        Self {
            fetcher,
            columns: Vec::new(),
            searchable: Vec::new(),
            filterable: Vec::new(),
            initial_state: None,
            config: TableConfig::default(),
        }
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn searchable<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn filterable<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filterable = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn initial_state(mut self, state: TableQueryState) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TableResult<TableController<R>> {
        if self.columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        for column in &self.searchable {
            if !self.columns.contains(column) {
                return Err(TableError::unknown_column(column, "searchable columns"));
            }
        }
        for column in &self.filterable {
            if !self.columns.contains(column) {
                return Err(TableError::unknown_column(column, "filterable columns"));
            }
        }

        let codec = QueryCodec::new(self.config);
        let state = self
            .initial_state
            .unwrap_or_else(|| TableQueryState::with_defaults(&self.config))
            .normalized(&self.config);
        let labels = ColumnLabelMap::resolve(&self.columns);

        Ok(TableController {
            fetcher: self.fetcher,
            codec,
            inner: Mutex::new(Inner {
                state,
                version: 0,
                rows: Vec::new(),
                page_count: 0,
                loading: false,
                error: None,
                columns: self.columns,
                labels,
                searchable: self.searchable.into_iter().collect(),
                filterable: self.filterable.into_iter().collect(),
            }),
        })
    }
}
