use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Slot of a record in the [`RecordStore`]; the unit stored in posting lists.
pub type Position = usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub year: String,
    pub director: String,
    /// The catalog "type" column (movie, series, ...).
    pub kind: String,
    /// File the record was read from; descriptions are re-read from here on demand.
    pub source_path: PathBuf,
}

/// Append-only sequence of records. A record's position never changes.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, record: Record) -> Position {
        let pos = self.records.len();
        self.records.push(record);
        pos
    }

    pub fn get(&self, pos: Position) -> Option<&Record> { self.records.get(pos) }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Record> { self.records.iter() }
}

/// Normalized key -> positions, in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Position>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Appends `pos` to the posting list of `key`, creating it if missing.
    pub fn insert(&mut self, key: String, pos: Position) {
        self.postings.entry(key).or_default().push(pos);
    }

    pub fn postings(&self, key: &str) -> Option<&[Position]> {
        self.postings.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool { self.postings.contains_key(key) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Position])> {
        self.postings.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    /// Largest position referenced by any posting list.
    pub fn max_position(&self) -> Option<Position> {
        self.postings.values().flatten().copied().max()
    }
}

/// Everything a search needs, built or loaded once and read-only afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogIndex {
    pub store: RecordStore,
    pub titles: InvertedIndex,
    pub directors: InvertedIndex,
    pub descriptions: InvertedIndex,
}

impl CatalogIndex {
    pub fn new() -> Self { Self::default() }

    /// True when every posting in every index points inside the store.
    pub fn postings_in_range(&self) -> bool {
        let len = self.store.len();
        [&self.titles, &self.directors, &self.descriptions]
            .iter()
            .all(|idx| idx.max_position().map_or(true, |p| p < len))
    }
}
