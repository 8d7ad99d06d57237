use crate::{Record, RequestError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Dashboard view became active: load records and subscribe to progress.
    Opened,
    /// Dashboard view is going away.
    Closed,
    /// User clicked Scrape.
    ScrapeClicked,
    /// User clicked Drop database.
    DropClicked,
    /// User asked for a manual reload of the record list.
    RefreshClicked,
    /// User edited the search box.
    QueryChanged(String),
    /// User clicked Search.
    SearchSubmitted,
    /// Result of a `FetchRecords` effect.
    RecordsLoaded(Result<Vec<Record>, RequestError>),
    /// Result of a `TriggerScrape` effect.
    ScrapeTriggered(Result<(), RequestError>),
    /// Result of a `ClearRecords` effect.
    RecordsCleared(Result<(), RequestError>),
    /// Progress notification from the push channel, in arrival order.
    Progress(u8),
    /// Transport-level status of the progress channel.
    Channel(ChannelStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Connected,
    Disconnected,
}
