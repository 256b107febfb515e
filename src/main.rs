mod analyzer;
mod cli;
mod config;
mod export;
mod extractor;
mod matcher;
mod model;
mod notifier;
mod parser;
mod pipeline;
mod report;
mod scraper;
mod storage;
mod utils;

use crate::analyzer::summarize;
use crate::cli::Cli;
use crate::config::{load_notifier_config, resolve, AppConfig, EnvArgs};
use crate::notifier::TelegramNotifier;
use crate::pipeline::RunOutcome;
use crate::scraper::BazosFetcher;
use crate::storage::{RunRecord, SqliteStorage};
use clap::Parser;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Base pause between search result pages; a random jitter is added on top.
const PAGE_PAUSE: Duration = Duration::from_millis(800);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match resolve(Cli::parse(), &EnvArgs::from_env()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config error: {}", e);
            std::process::exit(2);
        }
    };
    info!("Running with following parameters: {:?}", config);

    let fetcher = match BazosFetcher::new(REQUEST_TIMEOUT) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = pipeline::scrape(&fetcher, &config, PAGE_PAUSE).await;
    info!("{} Macbooks Air found", outcome.airs.len());
    info!("{} Macbooks Pro found", outcome.pros.len());

    persist(&config, &outcome);

    if let Err(e) = export::export_all(&config.data_dir, &outcome.all, &outcome.airs, &outcome.pros) {
        error!("Failed to write result tables to {}: {}", config.data_dir.display(), e);
    } else {
        info!("Result tables written to {}", config.data_dir.display());
    }

    if config.send_report {
        send_report(&config, &outcome).await;
    }
}

/// Stores the listings and the run summary. Storage problems are logged only.
fn persist(config: &AppConfig, outcome: &RunOutcome) {
    let storage = match SqliteStorage::new(&config.db_path) {
        Ok(s) => s,
        Err(e) => {
            warn!("Failed to open storage {}: {}", config.db_path.display(), e);
            return;
        }
    };

    if let Ok(Some(prev)) = storage.last_run() {
        info!(
            "Previous run {}: {} listings, {} Air, {} Pro",
            prev.finished_at, prev.total, prev.airs, prev.pros
        );
    }

    let mut new_count = 0;
    for listing in &outcome.all {
        match storage.save_listing(listing) {
            Ok(true) => new_count += 1,
            Ok(false) => {}
            Err(e) => warn!("DB save error for {}: {}", listing.url(), e),
        }
    }
    info!("{} listings not seen in earlier runs", new_count);

    let seen: Vec<String> = outcome.all.iter().map(|l| l.url().to_string()).collect();
    match storage.delete_missing_listings(&seen) {
        Ok(deleted) => info!("Removed {} listings that disappeared", deleted),
        Err(e) => warn!("Delete missing error: {}", e),
    }
    if let Ok(stored) = storage.count_listings() {
        info!("{} listings stored in {}", stored, config.db_path.display());
    }

    let run = RunRecord {
        finished_at: chrono::Utc::now(),
        total: outcome.all.len(),
        airs: outcome.airs.len(),
        pros: outcome.pros.len(),
    };
    if let Err(e) = storage.record_run(&run) {
        warn!("Failed to record run: {}", e);
    }
}

async fn send_report(config: &AppConfig, outcome: &RunOutcome) {
    let creds = match load_notifier_config(&config.notifier_config) {
        Ok(c) => c,
        Err(e) => {
            error!("Notifier config {} unusable: {}", config.notifier_config.display(), e);
            return;
        }
    };
    let template = match report::load_template(config.template.as_deref()) {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to read report template: {}", e);
            return;
        }
    };

    let notifier = match TelegramNotifier::new(creds.telegram_bot_token, creds.telegram_chat_id) {
        Ok(n) => n,
        Err(e) => {
            error!("Failed to create notifier: {}", e);
            return;
        }
    };

    let summary = format!(
        "Macbooks from Bazos\nAir: {}\nPro: {}",
        summarize(&outcome.airs),
        summarize(&outcome.pros)
    );
    let html = report::render_report(&template, &outcome.airs, &outcome.pros);

    let sent = if outcome.airs.is_empty() && outcome.pros.is_empty() {
        notifier.notify_text(&summary).await
    } else {
        notifier.send_report(&summary, html).await
    };
    match sent {
        Ok(()) => info!("Report successfully sent"),
        Err(e) => error!("Failed to send report: {}", e),
    }
}
