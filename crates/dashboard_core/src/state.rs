use std::fmt;

use crate::view_model::{AppViewModel, ControlsView};
use crate::{DataStore, Record};

/// Scrape lifecycle as last reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No scrape observed this session.
    #[default]
    Idle,
    Running,
    /// Last observed scrape reached 100%.
    Complete,
}

impl Phase {
    /// `Idle` and `Complete` are the same resting state for the operator.
    pub fn is_resting(self) -> bool {
        !matches!(self, Phase::Running)
    }
}

/// Phase and progress snapshot. `progress == 100` exactly when `phase == Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobState {
    pub phase: Phase,
    pub progress: u8,
}

impl JobState {
    pub const DONE: u8 = 100;

    fn running(progress: u8) -> Self {
        Self {
            phase: Phase::Running,
            progress,
        }
    }

    fn complete() -> Self {
        Self {
            phase: Phase::Complete,
            progress: Self::DONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport or connection failure.
    Network,
    /// Server answered with a non-2xx status.
    Server(u16),
    /// Payload did not have the expected shape.
    InvalidResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RequestError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Network => write!(f, "network error: {}", self.message),
            ErrorKind::Server(status) => write!(f, "server error {status}: {}", self.message),
            ErrorKind::InvalidResponse => write!(f, "invalid response: {}", self.message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Operator-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    job: JobState,
    /// Set once the current run's completion has triggered its refresh.
    completion_handled: bool,
    /// Job state and latch to restore if the pending trigger request fails.
    rollback: Option<(JobState, bool)>,
    in_flight: u32,
    store: DataStore,
    query: String,
    notices: Vec<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let loading = self.is_loading();
        let running = self.job.phase == Phase::Running;
        AppViewModel {
            phase: self.job.phase,
            progress: self.job.progress,
            loading,
            show_progress: running,
            controls: ControlsView {
                scrape_enabled: !loading && !running,
                drop_enabled: !loading,
                search_enabled: !loading,
                scrape_label: if loading && running {
                    "Scraping..."
                } else {
                    "Scrape"
                },
                drop_label: if loading {
                    "Deleting collection..."
                } else {
                    "Drop database"
                },
            },
            query: self.query.clone(),
            active_filter: self.store.active_filter().map(str::to_string),
            rows: self.store.displayed().to_vec(),
            total_records: self.store.all().len(),
            dirty: self.dirty,
        }
    }

    pub fn job(&self) -> JobState {
        self.job
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Drains pending notifications in the order they were raised.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_request(&mut self) {
        self.in_flight += 1;
        self.mark_dirty();
    }

    pub(crate) fn end_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.mark_dirty();
    }

    /// Optimistically enters `Running` at 0% for a scrape this client requested.
    pub(crate) fn start_run(&mut self) {
        self.rollback = Some((self.job, self.completion_handled));
        self.job = JobState::running(0);
        self.completion_handled = false;
        self.mark_dirty();
    }

    /// Trigger failed: go back to where we were unless the server already
    /// reported progress for the run.
    pub(crate) fn abort_run(&mut self) -> bool {
        match self.rollback.take() {
            Some((previous, completion_handled)) => {
                self.job = previous;
                self.completion_handled = completion_handled;
                self.mark_dirty();
                true
            }
            None => false,
        }
    }

    pub(crate) fn confirm_run(&mut self) {
        self.rollback = None;
    }

    /// Applies a progress notification. Returns true when this notification
    /// completed the run and a refresh is due.
    pub(crate) fn apply_progress(&mut self, value: u8) -> bool {
        self.rollback = None;
        if value >= JobState::DONE {
            if self.completion_handled {
                return false;
            }
            self.completion_handled = true;
            self.job = JobState::complete();
            self.mark_dirty();
            return true;
        }

        if self.job.phase.is_resting() {
            // A run we did not start ourselves.
            self.completion_handled = false;
        }
        self.job = JobState::running(value);
        self.mark_dirty();
        false
    }

    pub(crate) fn replace_records(&mut self, records: Vec<Record>) {
        self.store.replace_all(records);
        self.mark_dirty();
    }

    pub(crate) fn clear_records(&mut self) {
        self.store.clear();
        self.mark_dirty();
    }

    pub(crate) fn set_query(&mut self, query: String) {
        self.query = query;
        self.mark_dirty();
    }

    pub(crate) fn apply_search(&mut self) {
        self.store.apply_filter(&self.query);
        self.mark_dirty();
    }

    pub(crate) fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            text: text.into(),
        });
        self.mark_dirty();
    }
}
