//! Run a summary pipeline on a local file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trim_models::SummaryVariant;
use trim_pipeline::{PipelineConfig, SummaryPipeline};

#[derive(Debug, Parser)]
#[command(name = "trim-cli", version, about = "Build a short summary clip from a video")]
struct Args {
    /// Selector to use: interval or scene
    variant: SummaryVariant,

    /// Source video
    input: PathBuf,

    /// Copy the summary here instead of leaving it in the output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the selected segments without extracting anything
    #[arg(long)]
    select_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trim=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();

    let args = Args::parse();
    let pipeline = SummaryPipeline::from_config(PipelineConfig::from_env());

    let source = pipeline
        .acquire(&args.input)
        .await
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    if args.select_only {
        let segments = pipeline.select(args.variant, &source).await?;
        println!("{}", serde_json::to_string_pretty(&segments)?);
        return Ok(());
    }

    let mut report = pipeline.run(args.variant, &source).await?;

    if let Some(output) = args.output {
        tokio::fs::copy(&report.output_path, &output)
            .await
            .with_context(|| format!("failed to write {}", output.display()))?;
        report.output_path = output;
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
