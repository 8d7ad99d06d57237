//! Dashboard core: pure job-state machine, record store and view-model helpers.
mod effect;
mod msg;
mod record;
mod search;
mod state;
mod store;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{ChannelStatus, Msg};
pub use record::{Record, RecordId};
pub use search::filter;
pub use state::{AppState, ErrorKind, JobState, Notice, NoticeLevel, Phase, RequestError};
pub use store::DataStore;
pub use update::update;
pub use view_model::{AppViewModel, ControlsView};
