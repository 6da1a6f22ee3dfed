use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use levelwatch::{
    run_command_loop, CommandHandler, CycleOutcome, Monitor, Scheduler, Settings, StateStore,
};
use levelwatch_adapters::discord::{DiscordClient, DiscordCommandSource, DiscordNotifier};
use levelwatch_adapters::listing::OnlineListAdapter;

#[derive(Parser, Debug)]
#[command(name = "levelwatch")]
#[command(about = "Announce character level-ups from an online list on Discord")]
struct Args {
    /// Config file (JSON, TOML or YAML); defaults to levelwatch.json if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file, overrides `state_path` from the config
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Run a single check and exit
    #[arg(long)]
    once: bool,

    /// Log filter (e.g. "debug", "levelwatch=trace"); RUST_LOG is used otherwise
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(level) => EnvFilter::try_new(level).context("Invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(state) = args.state {
        settings.state_path = state;
    }
    info!("Loaded settings: {:?}", settings);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(settings, args.once))
}

async fn run(settings: Settings, once: bool) -> Result<()> {
    let schedule = settings.check_schedule()?;

    let store = StateStore::open(&settings.state_path, &settings.seed())
        .with_context(|| format!("Failed to open {}", settings.state_path.display()))?
        .shared();

    let listing = OnlineListAdapter::builder()
        .url(&settings.listing_url)
        .timeout(settings.request_timeout())
        .build();

    let client = DiscordClient::builder()
        .api_base(&settings.discord_api_base)
        .token(&settings.discord_token)
        .timeout(settings.request_timeout())
        .build();
    let notifier = Arc::new(DiscordNotifier::new(
        client.clone(),
        &settings.broadcast_channel_id,
        &settings.command_channel_id,
    ));

    let monitor = Arc::new(Monitor::new(Arc::new(listing), store.clone(), notifier.clone()));

    if once {
        if let CycleOutcome::Completed(report) = monitor.run_cycle().await {
            info!("{:?}", report);
        }
        return Ok(());
    }

    let scheduler = Scheduler::new(monitor, schedule).spawn();

    let (stop_tx, stop_rx) = watch::channel(false);
    let commands = tokio::spawn(run_command_loop(
        DiscordCommandSource::new(client, &settings.command_channel_id),
        CommandHandler::new(store, notifier, &settings.command_channel_id),
        settings.command_poll_interval(),
        stop_rx,
    ));

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");

    let _ = stop_tx.send(true);
    scheduler.stop().await;
    let _ = commands.await;

    Ok(())
}
