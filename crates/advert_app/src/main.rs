mod cli;
mod input;

use std::process::ExitCode;
use std::sync::Arc;

use advert_engine::{BatchDriver, LogProgressSink};
use advert_logging::{scrape_error, scrape_info};
use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    advert_logging::initialize(args.log_destination(), args.log_level());

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            scrape_error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    scrape_info!("Loading jobs from {}", args.input.display());
    let rows = input::load_rows(&args.input, &args.url_column, &args.title_column)?;
    scrape_info!("Loaded {} rows", rows.len());

    let config = args.scraper_config();
    let driver = BatchDriver::new(&config, Arc::new(LogProgressSink))
        .with_context(|| format!("cannot prepare output in {}", config.output_dir.display()))?;
    driver
        .run(&rows, &args.batch_options())
        .await
        .context("scrape run failed")?;
    Ok(())
}
