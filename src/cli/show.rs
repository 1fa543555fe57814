use anyhow::Result;

use mnemo::config::MnemoConfig;
use mnemo::memory::MemoryEngine;

/// Show one indexed item and its associative neighborhood.
pub async fn run(config: &MnemoConfig, id: &str) -> Result<()> {
    let engine = MemoryEngine::open(config)?;

    let Some(found) = engine.entry_with_related(id).await? else {
        println!("No item with id {id}.");
        return Ok(());
    };

    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(())
}
