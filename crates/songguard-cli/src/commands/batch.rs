use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::sync::Semaphore;

use super::truncate;
use songguard_core::{config::Config, pipeline::Pipeline};

pub async fn run(input: &Path, parallel: usize, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let parallel = parallel.max(1);

    // Read URLs from file
    let content = fs::read_to_string(input)
        .await
        .context("Failed to read input file")?;

    let urls: Vec<String> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect();

    if urls.is_empty() {
        println!("No URLs found in input file");
        return Ok(());
    }

    let pipeline = Arc::new(
        Pipeline::from_config(&config).context("Failed to build moderation pipeline")?,
    );

    let total_urls = urls.len();
    println!("Checking {} URLs with {} parallel workers\n", total_urls, parallel);

    let semaphore = Arc::new(Semaphore::new(parallel));
    let multi = MultiProgress::new();

    let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {msg}")?.tick_chars("=>-");

    let results: Vec<_> = stream::iter(urls.into_iter().enumerate())
        .map(|(idx, url)| {
            let sem = semaphore.clone();
            let pipeline = pipeline.clone();
            let pb = multi.add(ProgressBar::new_spinner());
            pb.set_style(spinner_style.clone());

            async move {
                let _permit = sem.acquire().await.ok();
                pb.set_message(format!("[{}/{}] {}", idx + 1, total_urls, truncate(&url, 50)));
                pb.enable_steady_tick(Duration::from_millis(100));

                let outcome = pipeline.run(&url).await;

                let label = match outcome.error_message() {
                    Some(reason) => format!("{} ({})", outcome.code(), reason),
                    None => outcome.code().to_string(),
                };
                pb.finish_with_message(format!(
                    "[{}/{}] {} -> {}",
                    idx + 1,
                    total_urls,
                    truncate(&url, 50),
                    label
                ));

                (url, outcome)
            }
        })
        .buffer_unordered(parallel)
        .collect()
        .await;

    // Summary
    let mut counts = [0usize; 3];
    for (_, outcome) in &results {
        counts[usize::from(outcome.code()).min(2)] += 1;
    }
    let unavailable: Vec<_> = results
        .iter()
        .filter(|(_, outcome)| outcome.is_service_failure())
        .collect();

    println!("\n=== Batch Complete ===");
    println!("Accepted (0): {}", counts[0]);
    println!("Review   (1): {}", counts[1]);
    println!("Rejected (2): {}", counts[2]);

    if !unavailable.is_empty() {
        println!("\nSentiment service unavailable for:");
        for (url, _) in &unavailable {
            println!("  {}", url);
        }
    }

    Ok(())
}
