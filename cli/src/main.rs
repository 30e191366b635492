use anyhow::{Context, Result};
use catalog_core::persist::{cache_exists, load, save};
use catalog_core::{build, CatalogError, CatalogIndex};
use clap::error::ErrorKind;
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

mod menu;

use menu::Menu;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Index a directory of TSV catalog files and search it interactively", long_about = None)]
struct Args {
    /// Directory holding the .tsv catalog files (searched recursively)
    directory: PathBuf,
    /// Ignore any cached index and rebuild it from the source files
    #[arg(long, default_value_t = false)]
    rebuild: bool,
    /// Results shown per page
    #[arg(long, default_value_t = 20)]
    page_size: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = usage_exit_code(&e);
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let index = open_index(&args.directory, args.rebuild)?;

    let stdin = io::stdin();
    let mut menu = Menu::new(&index, stdin.lock(), io::stdout(), args.page_size);
    menu.run().context("terminal I/O failed")?;
    Ok(())
}

/// Help output is a success; every other argument error shares the failure status.
fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Load the cached index for `dir`, or build it from sources and try to cache it.
fn open_index(dir: &Path, rebuild: bool) -> Result<CatalogIndex> {
    if !dir.is_dir() {
        return Err(CatalogError::InvalidPath(dir.to_path_buf()).into());
    }

    if !rebuild && cache_exists(dir) {
        return load(dir).context("cached index is unusable; run again with --rebuild");
    }

    let index = build(dir)?;
    if let Err(e) = save(dir, &index) {
        tracing::warn!(error = %e, "index cache not saved; continuing with the in-memory index");
    }
    Ok(index)
}
