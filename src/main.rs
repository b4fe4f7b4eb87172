use anyhow::Result;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper=warn,reqwest=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = groupsync::cli::run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
