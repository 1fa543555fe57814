use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;

use mnemo::config::MnemoConfig;
use mnemo::memory::search::SearchOptions;
use mnemo::memory::types::MemoryType;
use mnemo::memory::MemoryEngine;

/// Run a search from the terminal.
pub async fn run(
    config: &MnemoConfig,
    query: &str,
    limit: Option<usize>,
    item_type: Option<&str>,
    since: Option<&str>,
    no_related: bool,
) -> Result<()> {
    let options = SearchOptions {
        limit: limit.unwrap_or(config.search.default_limit),
        item_type: item_type
            .map(|t| MemoryType::from_str(t).map_err(|e| anyhow::anyhow!(e)))
            .transpose()?,
        since: since.map(parse_since).transpose()?,
        include_related: !no_related,
    };

    let engine = MemoryEngine::open(config)?;
    let results = engine.search(query, &options).await?;

    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", results.len());
    for (i, result) in results.iter().enumerate() {
        let preview = if result.content.len() > 120 {
            let end = result
                .content
                .char_indices()
                .take_while(|(ix, _)| *ix < 120)
                .last()
                .map(|(ix, c)| ix + c.len_utf8())
                .unwrap_or(0);
            format!("{}...", &result.content[..end])
        } else {
            result.content.clone()
        };

        println!(
            "  {}. [{}] {} (score: {:.4})",
            i + 1,
            result.item_type,
            result.id,
            result.score,
        );
        println!("     {preview}");
        for related in &result.related {
            println!(
                "       ~ [{}] {} ({:.4}) {}",
                related.item_type, related.id, related.score, related.snippet
            );
        }
        println!();
    }

    Ok(())
}

/// Accept an RFC 3339 instant or a bare date (midnight UTC).
fn parse_since(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid --since value: {s} (expected RFC 3339 or YYYY-MM-DD)"))?;
    Ok(date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is valid")
        .and_utc())
}
