use anyhow::{Context, Result};
use std::str::FromStr;

use mnemo::config::MnemoConfig;
use mnemo::memory::types::MemoryType;
use mnemo::memory::MemoryEngine;

/// Incrementally index one file.
pub async fn run(config: &MnemoConfig, path: &str, item_type: &str) -> Result<()> {
    let item_type = MemoryType::from_str(item_type).map_err(|e| anyhow::anyhow!(e))?;
    anyhow::ensure!(
        item_type != MemoryType::Journal,
        "journal entries are logged, not indexed from files — use `mnemo log`"
    );

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {path}"))?;

    let engine = MemoryEngine::open(config)?;
    let count = engine.index_file(path, &content, item_type).await?;

    println!("Indexed {count} item(s) from {path}.");
    Ok(())
}
