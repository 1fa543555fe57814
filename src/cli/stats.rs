use anyhow::Result;

use mnemo::config::MnemoConfig;
use mnemo::memory::MemoryEngine;

/// Display index statistics in the terminal.
pub fn run(config: &MnemoConfig) -> Result<()> {
    let engine = MemoryEngine::open(config)?;
    let stats = engine.stats()?;

    println!("Index Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total items:         {}", stats.item_count);
    println!();

    println!("By Type:");
    for t in &["journal", "state", "project", "person", "meeting", "topic"] {
        let count = stats.by_type.get(*t).copied().unwrap_or(0);
        println!("  {:<12} {}", t, count);
    }
    println!();

    println!("Index size:            {} bytes", stats.store_size_bytes);
    Ok(())
}
