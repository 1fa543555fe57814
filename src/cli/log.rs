use anyhow::Result;

use mnemo::config::MnemoConfig;
use mnemo::memory::MemoryEngine;

/// Append a journal entry, index it, and surface its related context.
pub async fn run(
    config: &MnemoConfig,
    topic: &str,
    content: &str,
    intent: Option<String>,
) -> Result<()> {
    let engine = MemoryEngine::open(config)?;
    let (entry, related) = engine.log(topic, content, intent).await?;

    println!("Logged [{}] at {}.", entry.topic, entry.timestamp.to_rfc3339());
    if !related.is_empty() {
        println!("Related:");
        for item in &related {
            println!("  ~ [{}] {} ({:.4}) {}", item.item_type, item.id, item.score, item.snippet);
        }
    }
    Ok(())
}
