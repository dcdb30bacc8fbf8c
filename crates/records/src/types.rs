use serde::Serialize;

/// A tracked folder path.
pub type Record = String;

/// Ordered, duplicate-free list of folder paths, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordList(Vec<Record>);

impl RecordList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Moves `folder` to the front, inserting it if absent, then caps the length.
    pub fn touch(&mut self, folder: &str, max_records: usize) {
        self.0.retain(|existing| existing != folder);
        self.0.insert(0, folder.to_string());
        self.truncate(max_records);
    }

    /// Drops the oldest entries beyond `max_records`.
    pub fn truncate(&mut self, max_records: usize) {
        self.0.truncate(max_records);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Record> {
        self.0
    }
}

impl From<Vec<Record>> for RecordList {
    /// Keeps the first occurrence of each path.
    fn from(records: Vec<Record>) -> Self {
        let mut seen = std::collections::HashSet::new();
        Self(records.into_iter().filter(|r| seen.insert(r.clone())).collect())
    }
}

impl<'a> IntoIterator for &'a RecordList {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> RecordList {
        RecordList::from(items.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn touch_moves_existing_to_front() {
        let mut records = RecordList::new();
        records.touch("A", 50);
        records.touch("B", 50);
        records.touch("A", 50);
        assert_eq!(records, list(&["A", "B"]));
    }

    #[test]
    fn touch_twice_is_idempotent() {
        let mut once = RecordList::new();
        once.touch("X", 50);
        let mut twice = once.clone();
        twice.touch("X", 50);
        assert_eq!(once, twice);
    }

    #[test]
    fn touch_evicts_oldest_past_cap() {
        let mut records = RecordList::new();
        for name in ["1", "2", "3", "4", "5"] {
            records.touch(name, 3);
        }
        assert_eq!(records, list(&["5", "4", "3"]));
    }

    #[test]
    fn from_vec_drops_later_duplicates() {
        let records = RecordList::from(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(records.as_slice(), ["a", "b"]);
    }
}
