use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use mnemo::config::MnemoConfig;
use mnemo::memory::MemoryEngine;

/// Wipe and rebuild the whole index. Slow by design — bounded by embedding
/// latency times item count — and only ever user-triggered.
pub async fn run(config: &MnemoConfig) -> Result<()> {
    let engine = MemoryEngine::open(config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .expect("valid template"),
    );
    pb.set_message("rebuilding index...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let count = engine.rebuild().await?;

    pb.finish_and_clear();
    println!("Rebuilt index: {count} item(s).");
    Ok(())
}
