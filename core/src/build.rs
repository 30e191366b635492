use crate::error::{CatalogError, Result};
use crate::persist::CACHE_DIR;
use crate::tokenizer::{normalize, tokenize};
use crate::{CatalogIndex, Position, Record};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of catalog source files.
pub const SOURCE_EXTENSION: &str = "tsv";

const FIELDS: usize = 6;

/// Source files under `root`, recursively, in file-name order.
pub fn discover_sources(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CatalogError::InvalidPath(root.to_path_buf()));
    }
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() > 0 && e.file_type().is_dir() && e.file_name() == CACHE_DIR));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(CatalogError::InvalidPath(root.to_path_buf())),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable corpus entry");
                continue;
            }
        };
        let p = entry.path();
        if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some(SOURCE_EXTENSION) {
            files.push(p.to_path_buf());
        }
    }
    Ok(files)
}

/// Build all indices from the catalog files under `root`.
pub fn build(root: &Path) -> Result<CatalogIndex> {
    let files = discover_sources(root)?;
    if files.is_empty() {
        return Err(CatalogError::NoCorpusFound(root.to_path_buf()));
    }

    let mut bundle = CatalogIndex::new();
    for file in &files {
        let before = bundle.store.len();
        index_file(file, &mut bundle)?;
        tracing::debug!(file = %file.display(), records = bundle.store.len() - before, "indexed catalog file");
    }

    tracing::info!(
        files = files.len(),
        records = bundle.store.len(),
        titles = bundle.titles.len(),
        directors = bundle.directors.len(),
        terms = bundle.descriptions.len(),
        "index build complete"
    );
    Ok(bundle)
}

fn index_file(file: &Path, bundle: &mut CatalogIndex) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != FIELDS {
            return Err(CatalogError::MalformedRecord { path: file.to_path_buf(), line: n + 1, found: fields.len() });
        }
        ingest_record(&fields, file, bundle);
    }
    Ok(())
}

fn ingest_record(fields: &[&str], file: &Path, bundle: &mut CatalogIndex) {
    let (title, director, description) = (fields[1], fields[3], fields[5]);
    let pos = bundle.store.push(Record {
        id: fields[0].to_string(),
        title: title.to_string(),
        year: fields[2].to_string(),
        director: director.to_string(),
        kind: fields[4].to_string(),
        source_path: file.to_path_buf(),
    });

    bundle.titles.insert(normalize(title), pos);
    bundle.directors.insert(normalize(director), pos);
    index_description(description, pos, bundle);
}

fn index_description(description: &str, pos: Position, bundle: &mut CatalogIndex) {
    let mut seen_in_record: HashSet<String> = HashSet::new();
    for word in tokenize(description) {
        let term = normalize(&word);
        if seen_in_record.insert(term.clone()) {
            bundle.descriptions.insert(term, pos);
        }
    }
}

/// Split one source line into (id, description) if it is well formed.
pub(crate) fn split_id_description(line: &str) -> Option<(&str, &str)> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != FIELDS {
        return None;
    }
    Some((fields[0], fields[5]))
}
