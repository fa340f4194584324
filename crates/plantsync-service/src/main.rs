//! Plantsync service - background plant telemetry synchronization.
//!
//! Run with: `cargo run -p plantsync-service`

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use plantsync_core::{CloudClient, RetryConfig, SyncEngine, authenticate};
use plantsync_service::{AppState, Config, EntityRegistry, HostBridge, Orchestrator, Scheduler};
use plantsync_store::Store;

/// Plantsync service - keeps local plant sensor entities in sync with
/// the remote telemetry API.
#[derive(Parser, Debug)]
#[command(name = "plantsync-service")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Remote API base URL (overrides config).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Data directory (overrides config).
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the sync service in the foreground (default behavior).
    Run,

    /// Validate credentials against the remote API and store them.
    Login {
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("plantsync_service=info".parse()?)
                .add_directive("plantsync_core=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    match args.command {
        Some(Command::Login { email, password }) => login(&config, &email, &password).await,
        Some(Command::Run) | None => run(&config).await,
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(base_url) = &args.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(dir) = &args.data_dir {
        config.storage.dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn build_client(config: &Config) -> anyhow::Result<CloudClient> {
    Ok(CloudClient::with_timeouts(
        &config.api.base_url,
        config.api.request_timeout(),
        config.api.probe_timeout(),
    )?)
}

async fn login(config: &Config, email: &str, password: &str) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let session = authenticate(&client, email, password).await?;

    let store = Store::open(&config.storage.dir)?;
    store.save_session(&session)?;
    println!("Logged in as {email} (account {})", session.id);
    Ok(())
}

async fn run(config: &Config) -> anyhow::Result<()> {
    let store = Store::open(&config.storage.dir)?;
    let Some(session) = store.load_session()? else {
        anyhow::bail!(
            "no stored credentials; run `plantsync-service login <email> <password>` first"
        );
    };

    // Persisted entities come up before any network activity.
    let entities = store.load_entities()?;
    info!("loaded {} persisted entities", entities.len());

    let api = Arc::new(build_client(config)?);
    let engine = SyncEngine::new(Arc::clone(&api), session, config.sync.retry(), entities);
    let state = AppState::new(engine, store);
    let host = Arc::new(EntityRegistry::new()) as Arc<dyn HostBridge>;

    let cancel = CancellationToken::new();
    let orchestrator = Orchestrator::new(Arc::clone(&state), host, cancel.clone());
    orchestrator.startup().await;

    let scheduler = Scheduler::new(orchestrator, config.sync.interval(), cancel.clone());
    let handle = scheduler.spawn();

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    cancel.cancel();
    handle.await?;
    Ok(())
}
