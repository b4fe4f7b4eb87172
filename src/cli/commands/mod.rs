
use crate::bus::EventQueue;
use crate::config::{Config, DEFAULT_CONFIG_FILE, load_config};
use crate::gateway::{self, GatewayState};
use crate::mirror::MirrorEngine;
use crate::mirror::stage::{prepare_temp_dir, remove_temp_dir};
use crate::transport::{HttpBridge, Transport};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "groupsync")]
#[command(about = "Mirror one WhatsApp group into many, keeping edits and deletes in sync")]
#[command(version = crate::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror the trigger group until interrupted
    Run {
        #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
    /// Validate a config file and exit
    Check {
        #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            run_mirror(&config).await?;
        }
        Commands::Check { config } => {
            println!("{}", check_config(&config)?);
        }
    }

    Ok(())
}

fn check_config(path: &Path) -> Result<String> {
    let config = load_config(path)?;
    Ok(describe(&config))
}

fn describe(config: &Config) -> String {
    format!(
        "config OK: trigger {} -> {} target group(s), ingress {}:{}, bridge {}",
        config.trigger_group_id,
        config.target_group_ids.len(),
        config.gateway.host,
        config.gateway.port,
        config.bridge.base_url
    )
}

async fn run_mirror(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    info!("{}", describe(&config));

    let temp_dir = config.media.temp_dir.clone();
    prepare_temp_dir(&temp_dir).context("failed to create temp directory")?;

    let result = serve(&config).await;

    remove_temp_dir(&temp_dir).await;
    result
}

async fn serve(config: &Config) -> Result<()> {
    let transport: Arc<dyn Transport> = Arc::new(HttpBridge::new(&config.bridge));

    let mut queue = EventQueue::new(config.queue_capacity);
    let rx = queue
        .take_receiver()
        .context("event queue receiver already taken")?;
    let ingress = gateway::start(
        &config.gateway.host,
        config.gateway.port,
        GatewayState::new(queue.publisher(), config.gateway.secret.clone()),
    )
    .await?;

    let engine = MirrorEngine::new(config, transport);
    let engine_task = tokio::spawn(engine.run(rx));
    // The ingress holds its own publisher; dropping ours lets the engine
    // stop once the ingress is gone.
    drop(queue);

    info!("groupsync running, press Ctrl+C to stop");
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                error!("failed to listen for shutdown signal: {}", e);
            }
            info!("shutting down");
        }
        _ = ingress => {
            error!("event ingress stopped unexpectedly");
        }
        _ = engine_task => {
            error!("mirror engine stopped unexpectedly");
        }
    }

    Ok(())
}
