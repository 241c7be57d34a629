mod cli;
mod config;
mod progress;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dialoguer::{Confirm, Input};
use grabber_core::{classify, Layout, Target};
use grabber_engine::{ArchiveOutcome, Orchestrator, RunError, RunSummary};
use grabber_logging::{grab_error, grab_info, grab_warn, LevelFilter};

use crate::cli::Cli;
use crate::progress::IndicatifSink;

enum Completion {
    Finished(Result<RunSummary, RunError>),
    Interrupted,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    grabber_logging::initialize(&cli.log.destination(), level);

    let file_config = config::load(cli.config.as_deref())?;
    let settings = config::build_settings(file_config, &cli);

    grab_info!("--- Pixiv Grabber ---");
    if settings.session_id.is_none() {
        grab_warn!(
            "No PHPSESSID set. Restricted content and rate limits may fail; pass --phpsessid or set PIXIV_PHPSESSID."
        );
    }
    grab_info!("Press Ctrl+C at any time to stop and archive what has been downloaded.");

    let url = match cli.url.clone() {
        Some(url) => url,
        None => prompt_url()?,
    };
    let target = match classify(&url) {
        Ok(target) => target,
        Err(err) => {
            grab_error!(
                "{err}. Provide an artwork URL (https://www.pixiv.net/artworks/...) or a user profile URL (https://www.pixiv.net/users/...)."
            );
            return Ok(());
        }
    };
    let layout = match (&target, cli.layout) {
        (_, Some(layout)) => layout.into(),
        (Target::Profile(_), None) => prompt_layout()?,
        (Target::Post(_), None) => Layout::default(),
    };

    let sink = Arc::new(IndicatifSink::new());
    let orchestrator =
        Orchestrator::new(settings, sink.clone()).context("failed to set up the downloader")?;

    let completion = tokio::select! {
        result = orchestrator.run(&target, layout) => Completion::Finished(result),
        Ok(()) = tokio::signal::ctrl_c() => Completion::Interrupted,
    };
    sink.finish();

    match completion {
        Completion::Finished(result) => {
            let summary = result.context("download failed")?;
            report(&summary);
        }
        Completion::Interrupted => {
            grab_warn!("Download interrupted by user (Ctrl+C)");
            if let Some(outcome) = orchestrator.finish_interrupted().await {
                report_archive(&outcome);
            }
        }
    }
    Ok(())
}

fn prompt_url() -> anyhow::Result<String> {
    let url: String = Input::new()
        .with_prompt("Enter Pixiv link (artwork post or user profile)")
        .interact_text()
        .context("failed to read the link")?;
    Ok(url.trim().to_string())
}

fn prompt_layout() -> anyhow::Result<Layout> {
    let nested = Confirm::new()
        .with_prompt("Download into separate folders for each post?")
        .default(true)
        .interact()
        .context("failed to read the layout choice")?;
    Ok(if nested { Layout::Nested } else { Layout::Flat })
}

fn report(summary: &RunSummary) {
    grab_info!(
        "Posts: {} processed, {} skipped",
        summary.posts_total,
        summary.posts_skipped
    );
    grab_info!(
        "Images: {} downloaded, {} failed",
        summary.images_downloaded,
        summary.images_failed
    );
    match (&summary.archive, &summary.output) {
        (Some(outcome), _) => report_archive(outcome),
        (None, Some(output)) => grab_info!("Files left in {:?}", output),
        (None, None) => {}
    }
}

fn report_archive(outcome: &ArchiveOutcome) {
    match outcome {
        ArchiveOutcome::Archived { archive, files } => {
            grab_info!("Archived {} file(s) into {:?}", files, archive)
        }
        ArchiveOutcome::RemovedEmpty { dir } => {
            grab_info!("Nothing was downloaded, removed empty folder {:?}", dir)
        }
        ArchiveOutcome::Missing { dir } => grab_warn!("Folder {:?} was not found", dir),
    }
}
