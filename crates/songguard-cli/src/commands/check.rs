use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::sync::mpsc;

use super::truncate;
use songguard_core::{
    config::Config,
    pipeline::{Outcome, Pipeline, PipelineStage},
};

pub async fn run(url: &str, details: bool, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let pipeline = Pipeline::from_config(&config).context("Failed to build moderation pipeline")?;

    // Create progress channel
    let (tx, mut rx) = mpsc::channel(32);

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("=>-"),
    );

    // Spawn progress handler
    let progress_handle = tokio::spawn(async move {
        while let Some(stage) = rx.recv().await {
            match stage {
                PipelineStage::ResolvingVideo => {
                    pb.set_position(5);
                    pb.set_message("Resolving video page...");
                }
                PipelineStage::VideoResolved { title } => {
                    pb.set_position(15);
                    pb.set_message(format!("Title: {}", truncate(&title, 40)));
                }
                PipelineStage::FetchingTranscript => {
                    pb.set_position(25);
                    pb.set_message("Fetching transcript...");
                }
                PipelineStage::SearchingLyrics => {
                    pb.set_position(40);
                    pb.set_message("Searching lyrics sites...");
                }
                PipelineStage::LyricsFound { source } => {
                    pb.set_position(60);
                    pb.set_message(format!("Lyrics from {}", source));
                }
                PipelineStage::CheckingProfanity => {
                    pb.set_position(70);
                    pb.set_message("Checking profanity...");
                }
                PipelineStage::ClassifyingSentiment => {
                    pb.set_position(85);
                    pb.set_message("Classifying sentiment...");
                }
                PipelineStage::Complete { code, duration } => {
                    pb.set_position(100);
                    pb.finish_with_message(format!(
                        "Done: code {} ({:.1}s)",
                        code,
                        duration.as_secs_f32()
                    ));
                }
                PipelineStage::Failed { stage, error } => {
                    pb.set_message(format!("{}: {}", stage, error));
                }
            }
        }
    });

    let outcome = pipeline.run_with_progress(url, &tx).await;
    drop(tx);

    // Wait for progress handler
    progress_handle.await?;

    println!();
    match &outcome {
        Outcome::Classified { verdict, source } => {
            println!("Sentiment: {} ({})", verdict.sentiment, verdict.sentiment.code());
            println!("Lyrics source: {}", source);
            if details {
                println!("{}", serde_json::to_string_pretty(verdict)?);
            }
        }
        Outcome::TooManyProfanity { report } if details => {
            println!("Result: {} ({})", outcome.code(), outcome.error_message().unwrap_or_default());
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        _ => {
            println!(
                "Result: {} ({})",
                outcome.code(),
                outcome.error_message().unwrap_or_default()
            );
        }
    }

    if outcome.is_service_failure() {
        anyhow::bail!("Sentiment service unavailable");
    }
    Ok(())
}
