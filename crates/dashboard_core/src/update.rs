use dashboard_logging::{dash_debug, dash_info, dash_warn};

use crate::{AppState, ChannelStatus, Effect, Msg, NoticeLevel, Phase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Opened => {
            state.begin_request();
            vec![Effect::SubscribeProgress, Effect::FetchRecords]
        }
        Msg::Closed => vec![Effect::UnsubscribeProgress],
        Msg::ScrapeClicked => {
            if state.is_loading() || state.job().phase == Phase::Running {
                dash_debug!(
                    "Scrape rejected: loading={} phase={:?}",
                    state.is_loading(),
                    state.job().phase
                );
                return (state, Vec::new());
            }
            state.start_run();
            state.begin_request();
            vec![Effect::TriggerScrape]
        }
        Msg::DropClicked => {
            if state.is_loading() {
                dash_debug!("Drop rejected while a request is in flight");
                return (state, Vec::new());
            }
            state.begin_request();
            vec![Effect::ClearRecords]
        }
        Msg::RefreshClicked => {
            if state.is_loading() {
                return (state, Vec::new());
            }
            state.begin_request();
            vec![Effect::FetchRecords]
        }
        Msg::QueryChanged(query) => {
            state.set_query(query);
            state.apply_search();
            Vec::new()
        }
        Msg::SearchSubmitted => {
            if !state.is_loading() {
                state.apply_search();
            }
            Vec::new()
        }
        Msg::RecordsLoaded(result) => {
            state.end_request();
            match result {
                Ok(records) => {
                    dash_info!("Loaded {} records", records.len());
                    state.replace_records(records);
                }
                Err(err) => {
                    dash_warn!("Fetching records failed: {}", err);
                    state.notify(NoticeLevel::Error, "Error fetching companies data");
                }
            }
            Vec::new()
        }
        Msg::ScrapeTriggered(result) => {
            state.end_request();
            match result {
                Ok(()) => state.confirm_run(),
                Err(err) => {
                    dash_warn!("Triggering scrape failed: {}", err);
                    if !state.abort_run() {
                        dash_debug!("Progress already reported; keeping current job state");
                    }
                    state.notify(NoticeLevel::Error, "Error during scraping process");
                }
            }
            Vec::new()
        }
        Msg::RecordsCleared(result) => {
            state.end_request();
            match result {
                Ok(()) => {
                    state.clear_records();
                    state.notify(
                        NoticeLevel::Info,
                        "Database collection dropped successfully",
                    );
                }
                Err(err) => {
                    dash_warn!("Dropping records failed: {}", err);
                    state.notify(NoticeLevel::Error, "Error dropping database collection");
                }
            }
            Vec::new()
        }
        Msg::Progress(value) => {
            if state.apply_progress(value) {
                dash_info!("Scrape complete; refreshing records");
                state.begin_request();
                vec![Effect::FetchRecords]
            } else {
                Vec::new()
            }
        }
        Msg::Channel(ChannelStatus::Connected) => {
            dash_debug!("Progress channel connected");
            Vec::new()
        }
        Msg::Channel(ChannelStatus::Disconnected) => {
            if state.job().phase == Phase::Running {
                state.notify(
                    NoticeLevel::Warning,
                    "Progress channel disconnected; progress may be stale",
                );
            }
            Vec::new()
        }
    };

    (state, effects)
}
