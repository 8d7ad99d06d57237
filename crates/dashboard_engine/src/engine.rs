use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dashboard_logging::{dash_error, dash_info, dash_warn};

use crate::api::{ReqwestScraperApi, ScraperApi};
use crate::listener::{ProgressListener, SocketIoListener, Subscription};
use crate::poll::poll_until_complete;
use crate::{
    ChannelState, EngineError, EngineEvent, EngineSettings, EventSink, ProgressTransport,
};

enum EngineCommand {
    ListRecords,
    TriggerScrape,
    ClearRecords,
    Subscribe,
    Unsubscribe,
}

/// Runs REST calls on a background tokio runtime and reports results as
/// `EngineEvent`s through the sink.
///
/// Dropping the handle stops the engine thread once in-flight work has been
/// handed to the runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let api: Arc<dyn ScraperApi> = Arc::new(ReqwestScraperApi::new(&settings)?);
        let (listener, poll_interval) = match settings.transport {
            ProgressTransport::SocketIo => {
                let listener: Box<dyn ProgressListener> =
                    Box::new(SocketIoListener::new(settings.base_url.clone()));
                (Some(listener), None)
            }
            ProgressTransport::Poll { interval } => (None, Some(interval)),
        };
        Self::with_parts(api, listener, poll_interval, sink)
    }

    /// Builds an engine from explicit collaborators.
    ///
    /// With `poll_interval` set, every successful trigger starts a poller.
    pub fn with_parts(
        api: Arc<dyn ScraperApi>,
        listener: Option<Box<dyn ProgressListener>>,
        poll_interval: Option<Duration>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("dashboard-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut subscription: Option<Subscription> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Subscribe => {
                        if subscription.is_none() {
                            subscription = subscribe(listener.as_deref(), &sink);
                        }
                    }
                    EngineCommand::Unsubscribe => {
                        if let Some(active) = subscription.take() {
                            active.close();
                        }
                    }
                    request => {
                        let api = api.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            handle_request(api.as_ref(), request, poll_interval, sink.as_ref())
                                .await;
                        });
                    }
                }
            }
            drop(subscription);
            runtime.shutdown_background();
        });

        Ok(Self { cmd_tx })
    }

    pub fn list_records(&self) {
        self.send(EngineCommand::ListRecords);
    }

    pub fn trigger_scrape(&self) {
        self.send(EngineCommand::TriggerScrape);
    }

    pub fn clear_records(&self) {
        self.send(EngineCommand::ClearRecords);
    }

    pub fn subscribe(&self) {
        self.send(EngineCommand::Subscribe);
    }

    pub fn unsubscribe(&self) {
        self.send(EngineCommand::Unsubscribe);
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            dash_error!("Engine thread is gone; command dropped");
        }
    }
}

fn subscribe(
    listener: Option<&dyn ProgressListener>,
    sink: &Arc<dyn EventSink>,
) -> Option<Subscription> {
    let Some(listener) = listener else {
        dash_info!("No push listener configured; progress is polled after each trigger");
        return None;
    };
    match listener.subscribe(sink.clone()) {
        Ok(subscription) => Some(subscription),
        Err(err) => {
            dash_warn!("Progress subscription failed: {}", err);
            sink.emit(EngineEvent::Channel(ChannelState::Disconnected));
            None
        }
    }
}

async fn handle_request(
    api: &dyn ScraperApi,
    command: EngineCommand,
    poll_interval: Option<Duration>,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::ListRecords => {
            let result = api.list_records().await;
            sink.emit(EngineEvent::RecordsListed(result));
        }
        EngineCommand::TriggerScrape => {
            let result = api.trigger_scrape().await;
            let triggered = result.is_ok();
            sink.emit(EngineEvent::ScrapeTriggered(result));
            if let (true, Some(interval)) = (triggered, poll_interval) {
                poll_until_complete(api, interval, sink).await;
            }
        }
        EngineCommand::ClearRecords => {
            let result = api.clear_records().await;
            sink.emit(EngineEvent::RecordsCleared(result));
        }
        EngineCommand::Subscribe | EngineCommand::Unsubscribe => {}
    }
}
