use std::time::Duration;

use dashboard_logging::{dash_debug, dash_warn};

use crate::{ChannelState, EngineEvent, EventSink, ScraperApi};

/// Polls the progress endpoint every `interval` and forwards each value.
///
/// Stops after forwarding 100, or on the first failed request, which is
/// reported as a lost channel.
pub async fn poll_until_complete(api: &dyn ScraperApi, interval: Duration, sink: &dyn EventSink) {
    loop {
        tokio::time::sleep(interval).await;
        match api.scraping_progress().await {
            Ok(progress) => {
                dash_debug!("Polled progress {}", progress);
                sink.emit(EngineEvent::Progress(progress));
                if progress >= 100 {
                    return;
                }
            }
            Err(err) => {
                dash_warn!("Progress polling stopped: {}", err);
                sink.emit(EngineEvent::Channel(ChannelState::Disconnected));
                return;
            }
        }
    }
}
