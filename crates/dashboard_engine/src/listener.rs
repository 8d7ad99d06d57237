use std::sync::Arc;

use dashboard_logging::{dash_debug, dash_info, dash_warn};
use rust_socketio::{ClientBuilder, Event, Payload, RawClient};

use crate::progress::parse_progress;
use crate::{ApiError, ChannelState, EngineEvent, EventSink, FailureKind};

const PROGRESS_EVENT: &str = "progress";

/// Source of push progress notifications.
pub trait ProgressListener: Send {
    /// Opens the subscription. Every notification is emitted to `sink` in
    /// receipt order, without coalescing.
    fn subscribe(&self, sink: Arc<dyn EventSink>) -> Result<Subscription, ApiError>;
}

/// Live subscription; closed on drop.
pub struct Subscription {
    close: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(close: impl FnOnce() + 'static) -> Self {
        Self {
            close: Some(Box::new(close)),
        }
    }

    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(close) = self.close.take() {
            close();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// socket.io client listening for the `progress` event on the server's root namespace.
#[derive(Debug, Clone)]
pub struct SocketIoListener {
    url: String,
}

impl SocketIoListener {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl ProgressListener for SocketIoListener {
    fn subscribe(&self, sink: Arc<dyn EventSink>) -> Result<Subscription, ApiError> {
        let progress_sink = sink.clone();
        let open_sink = sink.clone();
        let close_sink = sink;

        let client = ClientBuilder::new(self.url.as_str())
            .on(PROGRESS_EVENT, move |payload: Payload, _socket: RawClient| {
                match progress_from_payload(&payload) {
                    Some(progress) => progress_sink.emit(EngineEvent::Progress(progress)),
                    None => dash_warn!("Ignoring malformed progress payload: {:?}", payload),
                }
            })
            .on(Event::Connect, move |_payload: Payload, _socket: RawClient| {
                dash_debug!("Progress channel connected");
                open_sink.emit(EngineEvent::Channel(ChannelState::Connected));
            })
            .on(Event::Close, move |_payload: Payload, _socket: RawClient| {
                dash_warn!("Progress channel closed");
                close_sink.emit(EngineEvent::Channel(ChannelState::Disconnected));
            })
            .connect()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        dash_info!("Subscribed to progress events at {}", self.url);
        Ok(Subscription::new(move || {
            if let Err(err) = client.disconnect() {
                dash_warn!("Progress channel disconnect failed: {}", err);
            }
        }))
    }
}

fn progress_from_payload(payload: &Payload) -> Option<u8> {
    match payload {
        Payload::Text(values) => values.first().and_then(parse_progress),
        _ => None,
    }
}
