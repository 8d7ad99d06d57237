use crate::{search, Record};

/// Full record batch plus the subset currently shown.
///
/// Every change is a whole-batch operation; there are no incremental updates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataStore {
    all: Vec<Record>,
    displayed: Vec<Record>,
    /// Query the displayed set was last narrowed by, if any.
    filter: Option<String>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new batch. Both sets become `records`; no filter is applied.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        self.displayed = records.clone();
        self.all = records;
        self.filter = None;
    }

    pub fn clear(&mut self) {
        self.all.clear();
        self.displayed.clear();
        self.filter = None;
    }

    /// Recomputes the displayed set from the full set.
    pub fn apply_filter(&mut self, query: &str) {
        self.displayed = search::filter(&self.all, query);
        self.filter = (!query.is_empty()).then(|| query.to_string());
    }

    pub fn active_filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn all(&self) -> &[Record] {
        &self.all
    }

    pub fn displayed(&self) -> &[Record] {
        &self.displayed
    }
}
