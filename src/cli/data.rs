//! Output directory maintenance: `list` and `cleanup`

use hirecrew_core::{Config, OutputStore};
use std::path::PathBuf;

/// Resolve the output directory without requiring API keys. `list` and
/// `cleanup` never touch the network, so a missing key must not stop them.
fn output_store() -> OutputStore {
    let dir = match Config::from_env() {
        Ok(config) => config.output_dir,
        Err(_) => std::env::var("HIRECREW_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("output")),
    };
    OutputStore::new(dir)
}

/// Print saved postings, newest first.
pub fn list() -> anyhow::Result<()> {
    let store = output_store();
    let entries = store.list()?;

    if entries.is_empty() {
        println!("No postings found in {}", store.dir().display());
        return Ok(());
    }

    println!("Postings in {}:\n", store.dir().display());
    for entry in &entries {
        println!(
            "  {}  {:>8} bytes  {}",
            entry.modified.format("%Y-%m-%d %H:%M:%S"),
            entry.size,
            entry.name
        );
    }
    println!("\n{} posting(s)", entries.len());
    Ok(())
}

/// Remove postings older than `days` days.
pub fn cleanup(days: u64) -> anyhow::Result<()> {
    let store = output_store();
    let removed = store.cleanup(days)?;

    if removed == 0 {
        println!("Nothing older than {} day(s) in {}", days, store.dir().display());
    } else {
        println!("Removed {} file(s) older than {} day(s)", removed, days);
    }
    Ok(())
}
