//! Lending batch engine
//!
//! Runs the daily and monthly jobs on their cron schedule until Ctrl-C, or
//! a single job once with `--run-now <JOB>`.

use adapter_notify::{EmailSender, QueuedSender};
use anyhow::Context;
use batch_jobs::JobName;
use clap::Parser;
use infra_config::BatchConfig;
use infra_store::{Gateways, InMemoryStore};
use service_scheduler::{App, RunOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Lending batch engine - scheduled interest, delinquency and tier jobs
#[derive(Parser, Debug)]
#[command(name = "lending-batch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE", env = "BATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "BATCH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Run one job for today and exit
    #[arg(long, value_name = "JOB")]
    run_now: Option<String>,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = BatchConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    init_tracing(args.log_level.as_deref().unwrap_or(&config.log_level));

    info!("Lending batch engine v{}", service_scheduler::VERSION);
    info!(
        timezone = %config.timezone,
        max_run_secs = config.runner.max_run_secs,
        max_concurrency = config.runner.max_concurrency,
        queue_capacity = config.notification.queue_capacity,
        "Configuration loaded"
    );

    let store = Arc::new(InMemoryStore::new());
    let email = EmailSender::new(
        &config.notification.smtp_server,
        &config.notification.from_address,
    );
    info!(
        smtp_server = email.smtp_server(),
        from = email.from_address(),
        "Email sender ready"
    );
    let (queue, delivery) = QueuedSender::spawn(Arc::new(email), config.notification.queue_capacity);

    let app = App::build(&config, Gateways::in_memory(store), Arc::new(queue.clone()))
        .context("Failed to build batch engine")?;

    match args.run_now {
        Some(job) => {
            let name: JobName = job.parse()?;
            let record = app.run_job(name, app.today()).await?;
            info!(
                job = %record.job,
                business_date = %record.business_date,
                outcome = record.outcome.label(),
                "Manual run complete"
            );
            if let RunOutcome::Succeeded(report) = &record.outcome {
                for error in &report.errors {
                    info!(job = %record.job, %error, "Entity failure");
                }
            }
        }
        None => {
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let scheduler = tokio::spawn(app.scheduler().run(shutdown_rx));

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
            info!("Shutdown requested, waiting for running jobs");
            let _ = shutdown_tx.send(true);
            scheduler.await?;
        }
    }

    info!(pending = queue.pending(), "Closing notification queue");
    queue.close();
    let delivered = delivery.await?;
    let stats = app.notifier().stats();
    info!(delivered, accepted = stats.sent, rejected = stats.failed, "Notification queue drained");

    Ok(())
}
