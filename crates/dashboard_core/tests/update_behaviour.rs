use std::sync::Once;

use dashboard_core::{
    update, AppState, ChannelStatus, Effect, ErrorKind, Msg, NoticeLevel, Phase, Record,
    RequestError,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

fn company(id: usize, title: &str, address: &str) -> Record {
    Record {
        id,
        title: title.to_string(),
        address: address.to_string(),
        ..Record::default()
    }
}

fn network_error() -> RequestError {
    RequestError::new(ErrorKind::Network, "connection refused")
}

/// Opens the dashboard and completes the initial load.
fn opened_with(records: Vec<Record>) -> AppState {
    let (state, _) = update(AppState::new(), Msg::Opened);
    let (state, _) = update(state, Msg::RecordsLoaded(Ok(records)));
    state
}

fn apply_all(state: AppState, msgs: Vec<Msg>) -> (AppState, Vec<Effect>) {
    msgs.into_iter()
        .fold((state, Vec::new()), |(state, mut effects), msg| {
            let (next, new_effects) = update(state, msg);
            effects.extend(new_effects);
            (next, effects)
        })
}

fn fetch_count(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| **effect == Effect::FetchRecords)
        .count()
}

#[test]
fn opening_subscribes_and_loads() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Opened);

    assert_eq!(effects, vec![Effect::SubscribeProgress, Effect::FetchRecords]);
    assert!(state.view().loading);
    assert!(!state.view().controls.scrape_enabled);
}

#[test]
fn fresh_load_shows_single_record_with_id_zero() {
    init_logging();
    let mut state = opened_with(vec![company(0, "Acme", "1 Main St")]);
    let view = state.view();

    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id, 0);
    assert_eq!(view.rows[0].title, "Acme");
    assert!(!view.loading);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn failed_load_keeps_previous_records_and_notifies() {
    init_logging();
    let state = opened_with(vec![company(0, "Acme", "1 Main St")]);
    let (state, _) = update(state, Msg::RefreshClicked);
    let (mut state, _) = update(
        state,
        Msg::RecordsLoaded(Err(RequestError::new(
            ErrorKind::InvalidResponse,
            "expected array",
        ))),
    );

    assert_eq!(state.view().rows.len(), 1);
    assert!(!state.view().loading);
    let notices = state.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(state.take_notices().is_empty());
}

#[test]
fn scrape_click_enters_running_and_disables_scrape() {
    init_logging();
    let state = opened_with(Vec::new());
    let (state, effects) = update(state, Msg::ScrapeClicked);
    assert_eq!(effects, vec![Effect::TriggerScrape]);
    assert_eq!(state.view().controls.scrape_label, "Scraping...");

    let (state, effects) = update(state, Msg::ScrapeTriggered(Ok(())));
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.phase, Phase::Running);
    assert_eq!(view.progress, 0);
    assert!(view.show_progress);
    assert!(!view.loading);
    assert!(!view.controls.scrape_enabled);
    assert!(view.controls.drop_enabled);
}

#[test]
fn scrape_rejected_while_loading() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Opened);
    let before = state.job();

    let (state, effects) = update(state, Msg::ScrapeClicked);

    assert!(effects.is_empty());
    assert_eq!(state.job(), before);
}

#[test]
fn scrape_rejected_while_running() {
    init_logging();
    let state = opened_with(Vec::new());
    let (state, _) = apply_all(
        state,
        vec![Msg::ScrapeClicked, Msg::ScrapeTriggered(Ok(())), Msg::Progress(30)],
    );

    let (state, effects) = update(state, Msg::ScrapeClicked);

    assert!(effects.is_empty());
    assert_eq!(state.job().progress, 30);
}

#[test]
fn drop_rejected_while_loading() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Opened);
    let (_state, effects) = update(state, Msg::DropClicked);
    assert!(effects.is_empty());
}

#[test]
fn trigger_failure_restores_prior_state() {
    init_logging();
    let state = opened_with(Vec::new());
    let before = state.job();
    let (state, _) = update(state, Msg::ScrapeClicked);
    let (mut state, effects) = update(state, Msg::ScrapeTriggered(Err(network_error())));

    assert!(effects.is_empty());
    assert_eq!(state.job(), before);
    assert!(!state.view().loading);
    assert!(state.view().controls.scrape_enabled);
    let notices = state.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].text, "Error during scraping process");
}

#[test]
fn trigger_failure_after_completion_keeps_latch_armed() {
    init_logging();
    let state = opened_with(Vec::new());
    let (state, _) = apply_all(
        state,
        vec![
            Msg::ScrapeClicked,
            Msg::ScrapeTriggered(Ok(())),
            Msg::Progress(100),
            Msg::RecordsLoaded(Ok(Vec::new())),
            Msg::ScrapeClicked,
            Msg::ScrapeTriggered(Err(network_error())),
        ],
    );
    assert_eq!(state.job().phase, Phase::Complete);
    assert_eq!(state.job().progress, 100);

    let (state, effects) = update(state, Msg::Progress(100));

    assert!(effects.is_empty());
    assert!(!state.view().loading);
}

#[test]
fn trigger_failure_after_progress_keeps_reported_state() {
    init_logging();
    let state = opened_with(Vec::new());
    let (state, _) = apply_all(
        state,
        vec![
            Msg::ScrapeClicked,
            Msg::Progress(20),
            Msg::ScrapeTriggered(Err(network_error())),
        ],
    );

    assert_eq!(state.job().phase, Phase::Running);
    assert_eq!(state.job().progress, 20);
}

#[test]
fn progress_then_completion_refreshes_once() {
    init_logging();
    let state = opened_with(Vec::new());
    let (state, _) = apply_all(state, vec![Msg::ScrapeClicked, Msg::ScrapeTriggered(Ok(()))]);

    let (state, effects) = update(state, Msg::Progress(40));
    assert!(effects.is_empty());
    assert_eq!(state.job().progress, 40);
    assert_eq!(state.job().phase, Phase::Running);

    let (state, effects) = update(state, Msg::Progress(100));
    assert_eq!(effects, vec![Effect::FetchRecords]);
    assert_eq!(state.job().phase, Phase::Complete);
    assert_eq!(state.job().progress, 100);
    assert!(state.view().loading);

    let (state, _) = update(
        state,
        Msg::RecordsLoaded(Ok(vec![company(0, "Acme", "1 Main St")])),
    );
    assert_eq!(state.view().rows.len(), 1);
    assert!(!state.view().show_progress);
}

#[test]
fn repeated_completion_refreshes_at_most_once() {
    init_logging();
    let state = opened_with(Vec::new());
    let (state, effects) = apply_all(
        state,
        vec![
            Msg::ScrapeClicked,
            Msg::ScrapeTriggered(Ok(())),
            Msg::Progress(100),
            Msg::Progress(100),
        ],
    );

    assert_eq!(fetch_count(&effects), 1);
    assert_eq!(state.job().phase, Phase::Complete);
}

#[test]
fn progress_is_applied_in_arrival_order_without_clamping() {
    init_logging();
    let state = opened_with(Vec::new());
    let (state, _) = apply_all(
        state,
        vec![
            Msg::ScrapeClicked,
            Msg::Progress(60),
            Msg::Progress(40),
        ],
    );

    assert_eq!(state.job().progress, 40);
    assert_eq!(state.job().phase, Phase::Running);
}

#[test]
fn any_sequence_ending_in_completion_refreshes_exactly_once_after_it() {
    init_logging();
    let sequences: Vec<Vec<u8>> = vec![
        vec![100],
        vec![0, 100],
        vec![10, 50, 90, 100],
        vec![100, 100],
        vec![30, 100, 100],
        vec![70, 20, 100],
    ];

    for values in sequences {
        let state = opened_with(Vec::new());
        let (mut state, _) = apply_all(state, vec![Msg::ScrapeClicked, Msg::ScrapeTriggered(Ok(()))]);
        let mut refreshes_elsewhere = 0;
        let mut refreshes_at_completion = 0;
        for (index, value) in values.iter().enumerate() {
            let (next, effects) = update(state, Msg::Progress(*value));
            state = next;
            let fetches = fetch_count(&effects);
            let first_completion = values.iter().position(|v| *v == 100);
            if Some(index) == first_completion {
                refreshes_at_completion += fetches;
            } else {
                refreshes_elsewhere += fetches;
            }
        }

        assert_eq!(state.job().phase, Phase::Complete, "{values:?}");
        assert_eq!(state.job().progress, 100, "{values:?}");
        assert_eq!(refreshes_at_completion, 1, "{values:?}");
        assert_eq!(refreshes_elsewhere, 0, "{values:?}");
    }
}

#[test]
fn new_scrape_rearms_completion() {
    init_logging();
    let state = opened_with(Vec::new());
    let (state, first) = apply_all(
        state,
        vec![
            Msg::ScrapeClicked,
            Msg::ScrapeTriggered(Ok(())),
            Msg::Progress(100),
            Msg::RecordsLoaded(Ok(Vec::new())),
        ],
    );
    let (state, second) = apply_all(
        state,
        vec![
            Msg::ScrapeClicked,
            Msg::ScrapeTriggered(Ok(())),
            Msg::Progress(50),
            Msg::Progress(100),
        ],
    );

    assert_eq!(fetch_count(&first), 1);
    assert_eq!(fetch_count(&second), 1);
    assert_eq!(state.job().phase, Phase::Complete);
}

#[test]
fn externally_started_run_is_followed() {
    init_logging();
    let state = opened_with(Vec::new());
    let (state, effects) = apply_all(
        state,
        vec![
            Msg::ScrapeClicked,
            Msg::ScrapeTriggered(Ok(())),
            Msg::Progress(100),
            Msg::RecordsLoaded(Ok(Vec::new())),
            // Another operator starts a scrape.
            Msg::Progress(10),
        ],
    );
    assert_eq!(state.job().phase, Phase::Running);
    assert_eq!(fetch_count(&effects), 1);

    let (state, effects) = update(state, Msg::Progress(100));
    assert_eq!(effects, vec![Effect::FetchRecords]);
    assert_eq!(state.job().phase, Phase::Complete);
}

#[test]
fn loading_holds_until_every_request_finishes() {
    init_logging();
    let state = opened_with(Vec::new());
    let (state, _) = apply_all(
        state,
        vec![
            Msg::ScrapeClicked,
            Msg::Progress(100),
        ],
    );
    // Trigger POST and completion refresh are both in flight.
    let (state, _) = update(state, Msg::ScrapeTriggered(Ok(())));
    assert!(state.view().loading);
    assert!(!state.view().controls.drop_enabled);

    let (state, _) = update(state, Msg::RecordsLoaded(Ok(Vec::new())));
    assert!(!state.view().loading);
    assert!(state.view().controls.drop_enabled);
}

#[test]
fn search_filters_displayed_rows() {
    init_logging();
    let state = opened_with(vec![
        company(0, "Acme", "1 Main St"),
        company(1, "Zed", "9 Oak Ave"),
    ]);

    let (state, effects) = update(state, Msg::QueryChanged("main".to_string()));
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.rows, vec![company(0, "Acme", "1 Main St")]);
    assert_eq!(view.total_records, 2);
    assert_eq!(view.query, "main");

    let (state, _) = update(state, Msg::QueryChanged(String::new()));
    assert_eq!(state.view().rows.len(), 2);
}

#[test]
fn search_submit_ignored_while_loading() {
    init_logging();
    let state = opened_with(vec![
        company(0, "Acme", "1 Main St"),
        company(1, "Zed", "9 Oak Ave"),
    ]);
    let (state, _) = update(state, Msg::QueryChanged("zed".to_string()));
    let (state, _) = update(state, Msg::RefreshClicked);
    let (state, _) = update(
        state,
        Msg::RecordsLoaded(Ok(vec![
            company(0, "Acme", "1 Main St"),
            company(1, "Zed", "9 Oak Ave"),
        ])),
    );
    // Refresh shows the whole batch again.
    assert_eq!(state.view().rows.len(), 2);

    let (state, _) = update(state, Msg::SearchSubmitted);
    assert_eq!(state.view().rows.len(), 1);

    let (state, _) = update(state, Msg::RefreshClicked);
    let (state, _) = update(state, Msg::QueryChanged("acme".to_string()));
    let rows_before = state.view().rows.clone();
    let (state, _) = update(state, Msg::SearchSubmitted);
    assert_eq!(state.view().rows, rows_before);
    assert!(!state.view().controls.search_enabled);
}

#[test]
fn clearing_empties_both_sets() {
    init_logging();
    let state = opened_with(vec![company(0, "Acme", "1 Main St")]);
    let (state, effects) = update(state, Msg::DropClicked);
    assert_eq!(effects, vec![Effect::ClearRecords]);
    assert_eq!(state.view().controls.drop_label, "Deleting collection...");

    let (mut state, _) = update(state, Msg::RecordsCleared(Ok(())));

    assert!(state.view().rows.is_empty());
    assert!(state.store().all().is_empty());
    assert!(state.store().displayed().is_empty());
    let notices = state.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Info);
}

#[test]
fn failed_clear_keeps_records() {
    init_logging();
    let state = opened_with(vec![company(0, "Acme", "1 Main St")]);
    let (state, _) = update(state, Msg::DropClicked);
    let (mut state, _) = update(
        state,
        Msg::RecordsCleared(Err(RequestError::new(ErrorKind::Server(500), "boom"))),
    );

    assert_eq!(state.view().rows.len(), 1);
    assert_eq!(state.take_notices()[0].level, NoticeLevel::Error);
}

#[test]
fn disconnect_mid_run_warns() {
    init_logging();
    let state = opened_with(Vec::new());
    let (mut state, _) = apply_all(
        state,
        vec![
            Msg::ScrapeClicked,
            Msg::ScrapeTriggered(Ok(())),
            Msg::Channel(ChannelStatus::Disconnected),
        ],
    );

    let notices = state.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert_eq!(state.job().phase, Phase::Running);
}

#[test]
fn closing_unsubscribes() {
    init_logging();
    let (_state, effects) = update(opened_with(Vec::new()), Msg::Closed);
    assert_eq!(effects, vec![Effect::UnsubscribeProgress]);
}
