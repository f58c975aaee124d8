//! CLI binary for cv-coach.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `GatewayConfig`, runs the review sequence, and keeps the last result in
//! a local store file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cv_coach::{CacheUpdate, CvStore, GatewayConfig, Reviewer, UploadPayload};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

#[derive(Parser)]
#[command(
    name = "cvcoach",
    version,
    about = "Review a CV with the Gemini API and keep the last result locally"
)]
struct Cli {
    /// Path of the local store file holding the last result.
    #[arg(long, global = true, default_value = "cvcoach.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a PDF, request feedback and structured data, persist both.
    Review {
        /// Path to the CV as a PDF file.
        file: PathBuf,

        /// API key (falls back to the GEMINI_API_KEY environment variable).
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Model identifier.
        #[arg(long)]
        model: Option<String>,

        /// Base URL of the generation API (useful against a local fixture).
        #[arg(long)]
        api_base: Option<String>,
    },

    /// Print the cached feedback and structured record.
    Show,

    /// Remove the local store file.
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut store = CvStore::open(&cli.store);

    match cli.command {
        Command::Review {
            file,
            api_key,
            model,
            api_base,
        } => {
            let mut builder = GatewayConfig::builder(api_key);
            if let Some(model) = model {
                builder = builder.model(model);
            }
            if let Some(base) = api_base {
                builder = builder.api_base(base);
            }
            let config = builder.build()?;

            let bytes = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;

            eprintln!("{} {}", cyan("◆"), bold("Reviewing CV…"));
            let reviewer = Reviewer::with_config(config);
            let output = reviewer
                .review(&UploadPayload::pdf(bytes))
                .await
                .context("review failed — please try again later")?;

            store
                .update(CacheUpdate::feedback(output.feedback.clone()).with_cv_data(output.cv.clone()))
                .await?;

            println!("{}", output.feedback);
            if output.cv.is_empty() {
                eprintln!("{}", dim("(structured extraction unavailable this run)"));
            } else {
                eprintln!(
                    "{}",
                    dim(&format!(
                        "extracted: {} — {} ({} roles, {} skills)",
                        output.cv.name,
                        output.cv.title,
                        output.cv.experience.len(),
                        output.cv.skills.len()
                    ))
                );
            }
            eprintln!("{}", dim(&format!("saved to {}", cli.store.display())));
        }

        Command::Show => {
            let record = store.read().await;
            if record.feedback.is_empty() && record.cv_data.is_none() {
                eprintln!("No cached review. Run `cvcoach review <file.pdf>` first.");
                return Ok(());
            }
            println!("{}", bold("── Feedback ──"));
            println!("{}", record.feedback);
            if let Some(cv) = record.cv_data {
                println!("\n{}", bold("── Structured record ──"));
                println!("{}", serde_json::to_string_pretty(&cv)?);
            }
        }

        Command::Clear => {
            store.clear().await?;
            eprintln!("Cleared {}", cli.store.display());
        }
    }

    Ok(())
}
