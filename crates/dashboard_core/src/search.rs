use crate::Record;

/// Returns the records whose title or address contains `query`, ignoring case.
///
/// Input order is preserved. The query is used as typed: surrounding
/// whitespace is significant. An empty query keeps every record.
pub fn filter(records: &[Record], query: &str) -> Vec<Record> {
    if query.is_empty() {
        return records.to_vec();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| matches(record, &needle))
        .cloned()
        .collect()
}

fn matches(record: &Record, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle) || record.address.to_lowercase().contains(needle)
}
