mod classify;
mod config;
mod extract;
mod gmail_source;
mod normalize;
mod pipeline;
mod records;
mod store;
mod tracker;
mod traits;

use clap::Parser;
use config::{AppConfig, DEFAULT_CHECK_INTERVAL_SECONDS, TrackerConfig};
use gmail_source::GmailSource;
use log::{error, info, warn};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use store::{JsonFileStore, StdoutStore};
use tokio::signal;
use tokio::sync::broadcast;
use tracker::{effective_max_results, run_tracker_cycle};
use traits::{MessageSource, RecordStore};

struct MultiWriter {
    writers: Vec<Box<dyn Write + Send + 'static>>,
}

impl Write for MultiWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        for w in &mut self.writers {
            let _ = w.write(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        for w in &mut self.writers {
            let _ = w.flush();
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    config: Option<String>,

    /// Run a single scan per tracker and exit instead of polling
    #[arg(long)]
    once: bool,
}

fn initialize_logger(config: &AppConfig) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();

    if let Some(level) = &config.log_level {
        builder.parse_filters(level);
    } else if let Ok(env_level) = std::env::var("RUST_LOG") {
        builder.parse_filters(&env_level);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }

    if let Some(log_file) = &config.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", log_file, e))?;

        if config.quiet {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        } else {
            let multi_writer = MultiWriter {
                writers: vec![Box::new(file), Box::new(std::io::stderr())],
            };
            builder.target(env_logger::Target::Pipe(Box::new(multi_writer)));
        }
    } else if config.quiet {
        builder.target(env_logger::Target::Pipe(Box::new(std::io::sink())));
    }

    builder.init();
    Ok(())
}

fn create_store(tracker_config: &TrackerConfig) -> Arc<dyn RecordStore> {
    match &tracker_config.output_file {
        Some(path) => Arc::new(JsonFileStore::new(path.clone())),
        None => Arc::new(StdoutStore),
    }
}

async fn run_tracker_task(
    tracker_config: TrackerConfig,
    source: Arc<dyn MessageSource>,
    max_results: u32,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let category = tracker_config.category.clone();
    let interval_seconds = tracker_config
        .check_interval_seconds
        .unwrap_or(DEFAULT_CHECK_INTERVAL_SECONDS)
        .max(10);

    info!(
        "Starting {} tracker - Interval: {}s - Batch size: {}",
        category, interval_seconds, max_results
    );

    let store = create_store(&tracker_config);

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds));

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("[{}] Received shutdown signal. Stopping task...", category);
                break;
            }
            _ = ticker.tick() => {}
        }

        if let Err(e) = run_tracker_cycle(&source, &store, &tracker_config, max_results).await {
            error!("[{}] Scan failed: {:?}", category, e);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match args.config {
        Some(path) => AppConfig::new_from_file(&path),
        None => AppConfig::new(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Failed to load config: {:?}", e);
        if let Ok(path) = std::env::current_dir() {
            eprintln!("Current search path: {:?}", path);
        }
        eprintln!("Please create a `config.toml` or set APP_... environment variables, or specify a config file with --config.");
        std::process::exit(1);
    });

    initialize_logger(&config)?;

    info!("Starting Inbox Tracker...");
    info!("Configured trackers: {}", config.trackers.len());

    let source: Arc<dyn MessageSource> = Arc::new(GmailSource::new(&config.gmail));
    let max_results = effective_max_results(config.gmail.max_results);

    if args.once {
        for tracker_config in &config.trackers {
            let store = create_store(tracker_config);
            if let Err(e) = run_tracker_cycle(&source, &store, tracker_config, max_results).await {
                error!("[{}] Scan failed: {:?}", tracker_config.category, e);
            }
        }
        return Ok(());
    }

    let (shutdown_tx, _) = broadcast::channel(1);
    let mut handles = vec![];

    for tracker_config in config.trackers {
        let source = source.clone();
        let shutdown_rx = shutdown_tx.subscribe();

        let handle = tokio::spawn(async move {
            run_tracker_task(tracker_config, source, max_results, shutdown_rx).await;
        });

        handles.push(handle);
    }

    match signal::ctrl_c().await {
        Ok(()) => warn!("Shutdown signal received (Ctrl+C). Notifying tasks..."),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }

    let _ = shutdown_tx.send(());

    info!("Waiting for {} tasks to finish...", handles.len());
    for handle in handles {
        let _ = handle.await;
    }

    info!("All tasks stopped. Goodbye!");
    Ok(())
}
