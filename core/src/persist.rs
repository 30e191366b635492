use crate::error::{CatalogError, Result};
use crate::{CatalogIndex, InvertedIndex, RecordStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Reserved subdirectory of the corpus that holds the cache.
pub const CACHE_DIR: &str = "__index";

const TITLES: &str = "indice_titulos.bin";
const DIRECTORS: &str = "indice_directores.bin";
const DESCRIPTIONS: &str = "indice_descripciones.bin";
const RECORDS: &str = "entradas.bin";

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    /// Cache location for the corpus rooted at `corpus`.
    pub fn new<P: AsRef<Path>>(corpus: P) -> Self {
        Self { root: corpus.as_ref().join(CACHE_DIR) }
    }
    pub fn titles(&self) -> PathBuf { self.root.join(TITLES) }
    pub fn directors(&self) -> PathBuf { self.root.join(DIRECTORS) }
    pub fn descriptions(&self) -> PathBuf { self.root.join(DESCRIPTIONS) }
    pub fn records(&self) -> PathBuf { self.root.join(RECORDS) }

    pub fn artifacts(&self) -> [PathBuf; 4] {
        [self.titles(), self.directors(), self.descriptions(), self.records()]
    }
}

/// True only when all four artifacts are present.
pub fn cache_exists<P: AsRef<Path>>(corpus: P) -> bool {
    IndexPaths::new(corpus).artifacts().iter().all(|p| p.is_file())
}

fn tmp_path(path: &Path) -> PathBuf { path.with_extension("bin.tmp") }

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let write_err = |reason: String| CatalogError::CacheWrite { path: path.to_path_buf(), reason };
    let bytes = bincode::serialize(value).map_err(|e| write_err(e.to_string()))?;
    let mut f = File::create(tmp_path(path)).map_err(|e| write_err(e.to_string()))?;
    f.write_all(&bytes).map_err(|e| write_err(e.to_string()))?;
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let corrupt = |reason: String| CatalogError::CacheCorrupt { path: path.to_path_buf(), reason };
    let mut f = File::open(path).map_err(|e| corrupt(e.to_string()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).map_err(|e| corrupt(e.to_string()))?;
    bincode::deserialize(&buf).map_err(|e| corrupt(e.to_string()))
}

/// Best-effort cleanup after a failed save. With `artifacts` set the cache is
/// removed as well, so a half-renamed set is seen as absent.
fn discard(paths: &IndexPaths, artifacts: bool) {
    for path in paths.artifacts() {
        let _ = fs::remove_file(tmp_path(&path));
        if artifacts {
            let _ = fs::remove_file(&path);
        }
    }
}

/// Persist the bundle. Artifacts are written to temporary files first and only
/// renamed into place once all four succeeded.
pub fn save<P: AsRef<Path>>(corpus: P, bundle: &CatalogIndex) -> Result<()> {
    let paths = IndexPaths::new(corpus);
    create_dir_all(&paths.root)
        .map_err(|e| CatalogError::CacheWrite { path: paths.root.clone(), reason: e.to_string() })?;

    let written = write_artifact(&paths.titles(), &bundle.titles)
        .and_then(|_| write_artifact(&paths.directors(), &bundle.directors))
        .and_then(|_| write_artifact(&paths.descriptions(), &bundle.descriptions))
        .and_then(|_| write_artifact(&paths.records(), &bundle.store));
    if let Err(e) = written {
        discard(&paths, false);
        return Err(e);
    }

    for path in paths.artifacts() {
        if let Err(e) = fs::rename(tmp_path(&path), &path) {
            discard(&paths, true);
            return Err(CatalogError::CacheWrite { path, reason: e.to_string() });
        }
    }
    tracing::info!(cache = %paths.root.display(), records = bundle.store.len(), "saved index cache");
    Ok(())
}

/// Load the bundle from the cache. Any missing, undecodable or inconsistent
/// artifact is an error; there is no partial recovery.
pub fn load<P: AsRef<Path>>(corpus: P) -> Result<CatalogIndex> {
    let paths = IndexPaths::new(corpus);
    let titles: InvertedIndex = read_artifact(&paths.titles())?;
    let directors: InvertedIndex = read_artifact(&paths.directors())?;
    let descriptions: InvertedIndex = read_artifact(&paths.descriptions())?;
    let store: RecordStore = read_artifact(&paths.records())?;

    let bundle = CatalogIndex { store, titles, directors, descriptions };
    if !bundle.postings_in_range() {
        return Err(CatalogError::CacheCorrupt {
            path: paths.root,
            reason: format!("postings reference records beyond the {} stored", bundle.store.len()),
        });
    }
    tracing::info!(cache = %paths.root.display(), records = bundle.store.len(), "loaded index cache");
    Ok(bundle)
}
