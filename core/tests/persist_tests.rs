use catalog_core::persist::{cache_exists, load, save, IndexPaths};
use catalog_core::{build, CatalogError};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_corpus(dir: &Path) {
    fs::write(
        dir.join("catalog.tsv"),
        "1\tMatrix\t1999\tWachowski\tmovie\tcat dog\n\
         2\tMatrix Reloaded\t2003\tWachowski\tmovie\tcat\n\
         3\tAmélie\t2001\tJeunet\tmovie\tParís, café y gnomos\n",
    )
    .unwrap();
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let built = build(dir.path()).unwrap();

    assert!(!cache_exists(dir.path()));
    save(dir.path(), &built).unwrap();
    assert!(cache_exists(dir.path()));

    let loaded = load(dir.path()).unwrap();
    assert_eq!(loaded, built);
    assert_eq!(loaded.descriptions.postings("cat"), Some(&[0, 1][..]));
    assert_eq!(loaded.search_title("amelie")[0].id, "3");
}

#[test]
fn missing_artifact_invalidates_cache() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let built = build(dir.path()).unwrap();
    let paths = IndexPaths::new(dir.path());

    for artifact in paths.artifacts() {
        save(dir.path(), &built).unwrap();
        assert!(cache_exists(dir.path()));
        fs::remove_file(&artifact).unwrap();
        assert!(!cache_exists(dir.path()), "{} removed", artifact.display());
        assert!(matches!(load(dir.path()), Err(CatalogError::CacheCorrupt { .. })));
    }
}

#[test]
fn corrupt_artifact_fails_load() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    save(dir.path(), &build(dir.path()).unwrap()).unwrap();

    fs::write(IndexPaths::new(dir.path()).records(), b"\xff\xff\xff").unwrap();
    assert!(cache_exists(dir.path()));
    assert!(matches!(load(dir.path()), Err(CatalogError::CacheCorrupt { .. })));
}

#[test]
fn cache_dir_is_not_indexed() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let built = build(dir.path()).unwrap();
    save(dir.path(), &built).unwrap();
    fs::write(IndexPaths::new(dir.path()).root.join("stray.tsv"), "x\ty").unwrap();

    assert_eq!(build(dir.path()).unwrap(), built);
}

#[test]
fn save_leaves_no_temporary_files() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    save(dir.path(), &build(dir.path()).unwrap()).unwrap();

    let mut names: Vec<String> = fs::read_dir(IndexPaths::new(dir.path()).root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["entradas.bin", "indice_descripciones.bin", "indice_directores.bin", "indice_titulos.bin"]
    );
}

#[test]
fn failed_rename_leaves_no_cache() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let built = build(dir.path()).unwrap();
    let paths = IndexPaths::new(dir.path());
    save(dir.path(), &built).unwrap();

    // A non-empty directory in place of the director index cannot be renamed over.
    fs::remove_file(paths.directors()).unwrap();
    fs::create_dir_all(paths.directors().join("blocker")).unwrap();

    assert!(matches!(save(dir.path(), &built), Err(CatalogError::CacheWrite { .. })));
    assert!(!cache_exists(dir.path()));
    assert!(!paths.titles().exists());
    assert!(!paths.records().exists());
    let leftovers: Vec<_> = fs::read_dir(&paths.root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}
