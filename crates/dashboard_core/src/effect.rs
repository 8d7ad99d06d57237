/// Side effects requested by `update`; executed by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// GET the current record batch.
    FetchRecords,
    /// POST a scrape request.
    TriggerScrape,
    /// DELETE all stored records.
    ClearRecords,
    /// Open the progress subscription.
    SubscribeProgress,
    /// Tear down the progress subscription.
    UnsubscribeProgress,
}
