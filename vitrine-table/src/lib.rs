//! Server-driven data tables for the Vitrine admin console
//!
//! A table's abstract state (pagination, sort, filters, search, date range)
//! lives in the URL query string and nowhere else. The codec maps state to
//! and from that string losslessly; the controller owns the state, delegates
//! fetching to a caller-supplied fetcher, and guarantees that the visible
//! rows always belong to the newest issued state.

pub mod codec;
pub mod controller;
pub mod error;
pub mod labels;
pub mod query;

pub use codec::QueryCodec;
pub use controller::{
    FetchResult, RowFetcher, TableController, TableControllerBuilder, TableSnapshot,
};
pub use error::{TableError, TableResult};
pub use labels::ColumnLabelMap;
pub use query::{DateRange, SortDirection, TableQueryState};
