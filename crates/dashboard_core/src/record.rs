/// Row identifier: the position of a record within the batch it arrived in.
///
/// Reassigned on every refresh. Never use it to correlate rows across batches.
pub type RecordId = usize;

/// One scraped company.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    pub phone: String,
    pub fax: String,
    pub website: String,
    pub address: String,
    pub activity: String,
    pub manager: String,
}
