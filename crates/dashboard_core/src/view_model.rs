use crate::{Phase, Record};

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub progress: u8,
    pub loading: bool,
    pub show_progress: bool,
    pub controls: ControlsView,
    pub query: String,
    /// Query the rows are narrowed by; `None` when every record is shown.
    pub active_filter: Option<String>,
    pub rows: Vec<Record>,
    pub total_records: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlsView {
    pub scrape_enabled: bool,
    pub drop_enabled: bool,
    pub search_enabled: bool,
    pub scrape_label: &'static str,
    pub drop_label: &'static str,
}
