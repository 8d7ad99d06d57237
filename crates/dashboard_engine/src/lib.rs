//! Dashboard engine: REST client, progress listeners and effect execution.
mod api;
mod engine;
mod listener;
mod poll;
mod progress;
mod types;

pub use api::{decode_records, ReqwestScraperApi, ScraperApi};
pub use engine::EngineHandle;
pub use listener::{ProgressListener, SocketIoListener, Subscription};
pub use poll::poll_until_complete;
pub use progress::parse_progress;
pub use types::{
    ApiError, ChannelEventSink, ChannelState, CompanyRecord, EngineError, EngineEvent,
    EngineSettings, EventSink, FailureKind, ProgressTransport,
};
