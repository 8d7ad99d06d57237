use std::sync::{mpsc, Arc};

use dashboard_core::{ChannelStatus, Effect, ErrorKind, Msg, Record, RequestError};
use dashboard_engine::{
    ApiError, ChannelState, CompanyRecord, EngineError, EngineEvent, EngineHandle, EngineSettings,
    EventSink, FailureKind,
};
use dashboard_logging::{dash_debug, dash_info};

/// Hands effects to the engine; engine events come back as `Msg`s on the inbox.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: EngineSettings, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        dash_info!(
            "Starting engine base_url={} transport={:?}",
            settings.base_url,
            settings.transport
        );
        let engine = EngineHandle::new(settings, Arc::new(InboxSink { msg_tx }))?;
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            dash_debug!("Effect {:?}", effect);
            match effect {
                Effect::FetchRecords => self.engine.list_records(),
                Effect::TriggerScrape => self.engine.trigger_scrape(),
                Effect::ClearRecords => self.engine.clear_records(),
                Effect::SubscribeProgress => self.engine.subscribe(),
                Effect::UnsubscribeProgress => self.engine.unsubscribe(),
            }
        }
    }
}

struct InboxSink {
    msg_tx: mpsc::Sender<Msg>,
}

impl EventSink for InboxSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.msg_tx.send(map_event(event));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::RecordsListed(result) => Msg::RecordsLoaded(
            result
                .map(|records| records.into_iter().map(map_record).collect())
                .map_err(map_error),
        ),
        EngineEvent::ScrapeTriggered(result) => Msg::ScrapeTriggered(result.map_err(map_error)),
        EngineEvent::RecordsCleared(result) => Msg::RecordsCleared(result.map_err(map_error)),
        EngineEvent::Progress(progress) => Msg::Progress(progress),
        EngineEvent::Channel(ChannelState::Connected) => Msg::Channel(ChannelStatus::Connected),
        EngineEvent::Channel(ChannelState::Disconnected) => {
            Msg::Channel(ChannelStatus::Disconnected)
        }
    }
}

fn map_record(record: CompanyRecord) -> Record {
    Record {
        id: record.id,
        title: record.title,
        phone: record.phone,
        fax: record.fax,
        website: record.website,
        address: record.address,
        activity: record.activity,
        manager: record.manager,
    }
}

fn map_error(err: ApiError) -> RequestError {
    let kind = match err.kind {
        FailureKind::HttpStatus(status) => ErrorKind::Server(status),
        FailureKind::InvalidResponse => ErrorKind::InvalidResponse,
        FailureKind::Network | FailureKind::Timeout | FailureKind::InvalidUrl => ErrorKind::Network,
    };
    RequestError::new(kind, err.message)
}
