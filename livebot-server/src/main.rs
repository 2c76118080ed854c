use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod context;
mod server;

#[derive(Parser, Debug, Clone)]
#[command(name = "livebot")]
#[command(author, version, about = "livebot - Twitch chat commands and live notifications")]
pub struct Args {
    /// Path to the TOML config file.
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    /// Overrides `bind_addr` from the config (EventSub webhook listener).
    #[arg(long)]
    pub bind_addr: Option<String>,

    /// Overrides `database_url` from the config.
    #[arg(long)]
    pub database_url: Option<String>,
}

fn init_tracing() {
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("log bridge already installed: {}", e);
    }
    let filter = EnvFilter::from_default_env()
        .add_directive("livebot=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    info!("livebot starting. config={}", args.config);

    if let Err(e) = server::run_server(args).await {
        error!("Server error: {:#}", e);
        return Err(e);
    }
    info!("Main finished. Goodbye!");
    Ok(())
}
