//! Column label resolution
//!
//! Display labels come from a static dictionary keyed by column identifier;
//! anything unmapped falls back to the raw identifier. The controller caches
//! the resolved map per column set, so resolution cost is paid on column-set
//! changes, not per render.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;

/// Static localization dictionary for the console's column identifiers
static COLUMN_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("name", "Name"),
        ("price", "Price"),
        ("stock", "Stock"),
        ("category", "Category"),
        ("status", "Status"),
        ("createdAt", "Created"),
        ("updatedAt", "Updated"),
        ("orderNo", "Order no."),
        ("customer", "Customer"),
        ("total", "Total"),
        ("discount", "Discount"),
        ("startsAt", "Starts"),
        ("endsAt", "Ends"),
        ("email", "E-mail"),
        ("phone", "Phone"),
        ("seller", "Seller"),
        ("shopName", "Shop"),
        ("role", "Role"),
        ("active", "Active"),
    ])
});

/// Resolved column-id to display-label mapping for one column set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLabelMap {
    labels: BTreeMap<String, String>,
}

impl ColumnLabelMap {
    /// Resolve labels for a column set, falling back to the raw identifier
    pub fn resolve<S: AsRef<str>>(columns: &[S]) -> Self {
        let labels = columns
            .iter()
            .map(|column| {
                let id = column.as_ref();
                let label = COLUMN_LABELS.get(id).copied().unwrap_or(id);
                (id.to_string(), label.to_string())
            })
            .collect();
        Self { labels }
    }

    /// Display label for a column id
    pub fn label<'a>(&'a self, column: &'a str) -> &'a str {
        self.labels
            .get(column)
            .map(String::as_str)
            .unwrap_or(column)
    }

    /// The full mapping, for presentation layers that render all headers
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.labels
    }
}
