//! # Nudge — natural-language reminders, delivered on time
//!
//! Bootstraps the whole pipeline: config, providers, scheduler, sweep loop,
//! extraction client, and the HTTP gateway. Everything is wired here with
//! explicit constructor injection — no global registries.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nudge_core::NudgeConfig;
use nudge_core::traits::NotificationScheduler;
use nudge_extractor::ExtractionClient;
use nudge_gateway::AppState;
use nudge_notify::{
    ConsoleProvider, EmailProvider, NotificationOrchestrator, ProviderRegistry, WebhookProvider,
};
use nudge_reminders::ReminderPipeline;
use nudge_scheduler::{InMemoryScheduler, spawn_sweeper};

#[derive(Parser)]
#[command(
    name = "nudge",
    version,
    about = "⏰ Nudge — natural-language reminders, delivered on time"
)]
struct Cli {
    /// Gateway port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to config file (default: ~/.nudge/config.toml)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "nudge=debug,tower_http=debug"
    } else {
        "nudge=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => NudgeConfig::load_from(path)?,
        None => NudgeConfig::load()?,
    };

    // Delivery providers, in selection-preference order.
    let mut registry = ProviderRegistry::new();
    if config.notify.console.enabled {
        registry.register(Arc::new(ConsoleProvider::new()));
    }
    if let Some(webhook) = &config.notify.webhook
        && webhook.enabled
    {
        registry.register(Arc::new(WebhookProvider::new(webhook.clone())));
    }
    if let Some(email) = &config.notify.email
        && email.enabled
    {
        registry.register(Arc::new(EmailProvider::new(email.clone())?));
    }

    let scheduler: Arc<dyn NotificationScheduler> = Arc::new(InMemoryScheduler::new());
    let orchestrator =
        Arc::new(NotificationOrchestrator::new(registry).with_scheduler(scheduler.clone()));

    // Background sweep: claim due notifications and dispatch them.
    let dispatcher = orchestrator.clone();
    spawn_sweeper(
        scheduler.clone(),
        move |payload| {
            let orchestrator = dispatcher.clone();
            async move { orchestrator.dispatch(&payload).await }
        },
        config.scheduler.sweep_interval_secs,
    );

    let extractor = ExtractionClient::new(&config.extractor)?;
    let pipeline = Arc::new(ReminderPipeline::new(extractor, orchestrator.clone()));

    let state = AppState {
        pipeline,
        orchestrator,
        start_time: std::time::Instant::now(),
    };
    let port = cli.port.unwrap_or(config.gateway.port);
    nudge_gateway::serve(state, &config.gateway.host, port).await?;
    Ok(())
}
