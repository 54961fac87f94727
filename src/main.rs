use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use workforce_compliance::api::{AppState, create_router};
use workforce_compliance::config::SettingsLoader;
use workforce_compliance::store::DatasetLoader;

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(
    name = "workforce-compliance",
    about = "Serve workforce composition and nationalization compliance reports",
    version
)]
struct Cli {
    /// Directory holding the YAML record files
    #[arg(long, default_value = "data/demo")]
    data_dir: PathBuf,
    /// Engine settings file
    #[arg(long, default_value = "config/settings.yaml")]
    settings: PathBuf,
    /// Address the HTTP server binds to
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: SocketAddr,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) -> Result<(), BoxError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
}

async fn run(cli: Cli) -> Result<(), BoxError> {
    init_tracing(&cli.log_level)?;

    let settings = SettingsLoader::load(&cli.settings)?.into_settings();
    let store = DatasetLoader::load(&cli.data_dir)?;
    let app = create_router(AppState::new(store, settings));

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    info!(address = %cli.bind, "Listening for report requests");
    axum::serve(listener, app).await?;
    Ok(())
}
