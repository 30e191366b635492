use crate::build::split_id_description;
use crate::error::Result;
use crate::tokenizer::{normalize, tokenize};
use crate::{CatalogIndex, InvertedIndex, Position, Record, RecordStore};
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};

const OR: &str = "OR";
const AND: &str = "AND";

/// How a description query is resolved. Terms are already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// `a OR b OR c`
    ExplicitOr(Vec<String>),
    /// `a AND b AND c`
    ExplicitAnd(Vec<String>),
    /// Anything else: every word is a term.
    ImplicitOr(Vec<String>),
}

/// True when there is at least one connector slot and all of them hold `connector`.
fn alternates_with(words: &[String], connector: &str) -> bool {
    words.len() > 1 && words.iter().skip(1).step_by(2).all(|w| w == connector)
}

fn even_terms(words: &[String]) -> Vec<String> {
    words.iter().step_by(2).map(|w| normalize(w)).collect()
}

/// Classify a description query by its literal connector tokens. OR wins over AND.
pub fn classify(query: &str) -> QueryPlan {
    let words = tokenize(query);
    if alternates_with(&words, OR) {
        QueryPlan::ExplicitOr(even_terms(&words))
    } else if alternates_with(&words, AND) {
        QueryPlan::ExplicitAnd(even_terms(&words))
    } else {
        QueryPlan::ImplicitOr(words.iter().map(|w| normalize(w)).collect())
    }
}

fn records_at<'a, I>(positions: I, store: &'a RecordStore) -> Vec<&'a Record>
where
    I: IntoIterator<Item = Position>,
{
    positions.into_iter().filter_map(|p| store.get(p)).collect()
}

/// Exact match of the normalized `term` against `index`, in posting-list order.
pub fn lookup_exact<'a>(term: &str, index: &InvertedIndex, store: &'a RecordStore) -> Vec<&'a Record> {
    match index.postings(&normalize(term)) {
        Some(plist) => records_at(plist.iter().copied(), store),
        None => Vec::new(),
    }
}

fn union(terms: &[String], index: &InvertedIndex) -> BTreeSet<Position> {
    terms
        .iter()
        .filter_map(|t| index.postings(t))
        .flat_map(|plist| plist.iter().copied())
        .collect()
}

fn intersection(terms: &[String], index: &InvertedIndex) -> BTreeSet<Position> {
    let Some((first, rest)) = terms.split_first() else { return BTreeSet::new() };
    let mut survivors: BTreeSet<Position> = match index.postings(first) {
        Some(plist) => plist.iter().copied().collect(),
        None => return BTreeSet::new(),
    };
    for term in rest {
        let Some(plist) = index.postings(term) else { return BTreeSet::new() };
        let hits: HashSet<Position> = plist.iter().copied().collect();
        survivors.retain(|p| hits.contains(p));
    }
    survivors
}

/// Resolve an already classified plan to a deduplicated set of positions.
pub fn resolve(plan: &QueryPlan, index: &InvertedIndex) -> BTreeSet<Position> {
    match plan {
        QueryPlan::ExplicitOr(terms) | QueryPlan::ImplicitOr(terms) => union(terms, index),
        QueryPlan::ExplicitAnd(terms) => intersection(terms, index),
    }
}

/// Boolean description search. Each matching record appears once, in position order.
pub fn lookup_boolean<'a>(query: &str, index: &InvertedIndex, store: &'a RecordStore) -> Vec<&'a Record> {
    let plan = classify(query);
    let hits = resolve(&plan, index);
    tracing::debug!(?plan, hits = hits.len(), "description query");
    records_at(hits, store)
}

/// Distinct directors as written in the catalog, sorted.
/// Each normalized director key is shown with the spelling of its first record.
pub fn directors(bundle: &CatalogIndex) -> Vec<&str> {
    let mut names: Vec<&str> = bundle
        .directors
        .iter()
        .filter_map(|(_, plist)| plist.first())
        .filter_map(|&p| bundle.store.get(p))
        .map(|r| r.director.as_str())
        .collect();
    names.sort_unstable();
    names
}

/// Full description of `record`, read back from its source file.
pub fn read_description(record: &Record) -> Result<Option<String>> {
    let reader = BufReader::new(File::open(&record.source_path)?);
    for line in reader.lines() {
        let line = line?;
        if let Some((id, description)) = split_id_description(&line) {
            if id == record.id {
                return Ok(Some(description.to_string()));
            }
        }
    }
    Ok(None)
}

impl CatalogIndex {
    pub fn search_title(&self, term: &str) -> Vec<&Record> { lookup_exact(term, &self.titles, &self.store) }

    pub fn search_director(&self, term: &str) -> Vec<&Record> { lookup_exact(term, &self.directors, &self.store) }

    pub fn search_description(&self, query: &str) -> Vec<&Record> {
        lookup_boolean(query, &self.descriptions, &self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(ws: &[&str]) -> Vec<String> { ws.iter().map(|w| w.to_string()).collect() }

    #[test]
    fn classify_explicit_or() {
        assert_eq!(classify("Cat OR dog OR Bird"), QueryPlan::ExplicitOr(words(&["cat", "dog", "bird"])));
    }

    #[test]
    fn classify_explicit_and() {
        assert_eq!(classify("cat AND Perro"), QueryPlan::ExplicitAnd(words(&["cat", "perro"])));
    }

    #[test]
    fn classify_falls_back_to_implicit_or() {
        assert_eq!(classify("cat"), QueryPlan::ImplicitOr(words(&["cat"])));
        assert_eq!(classify("cat and dog"), QueryPlan::ImplicitOr(words(&["cat", "and", "dog"])));
        assert_eq!(classify("cat AND dog OR bird"), QueryPlan::ImplicitOr(words(&["cat", "and", "dog", "or", "bird"])));
        assert_eq!(classify("¿?"), QueryPlan::ImplicitOr(vec![]));
    }

    #[test]
    fn trailing_connector_still_explicit() {
        assert_eq!(classify("cat OR"), QueryPlan::ExplicitOr(words(&["cat"])));
        assert_eq!(classify("cat AND"), QueryPlan::ExplicitAnd(words(&["cat"])));
    }

    #[test]
    fn intersection_short_circuits_on_unknown_term() {
        let mut idx = InvertedIndex::new();
        idx.insert("cat".into(), 0);
        idx.insert("cat".into(), 2);
        idx.insert("dog".into(), 2);
        assert_eq!(intersection(&words(&["cat", "dog"]), &idx), BTreeSet::from([2]));
        assert!(intersection(&words(&["cat", "zzz", "dog"]), &idx).is_empty());
        assert!(intersection(&[], &idx).is_empty());
    }

    #[test]
    fn union_ignores_unknown_terms() {
        let mut idx = InvertedIndex::new();
        idx.insert("cat".into(), 1);
        idx.insert("dog".into(), 1);
        idx.insert("dog".into(), 0);
        assert_eq!(union(&words(&["cat", "zzz", "dog"]), &idx), BTreeSet::from([0, 1]));
    }
}
