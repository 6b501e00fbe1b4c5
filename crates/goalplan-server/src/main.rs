use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use goalplan_db::Db;
use goalplan_planner::{Planner, PlannerConfig, Provider};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "goalplan-server", about = "Goal breakdown planner API")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "GOALPLAN_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on
    #[arg(long, env = "GOALPLAN_PORT", default_value = "3720")]
    port: u16,

    /// SQLite database file. Defaults to $XDG_DATA_HOME/goalplan/goalplan.db.
    #[arg(long, env = "GOALPLAN_DB_PATH")]
    db_path: Option<PathBuf>,

    #[command(flatten)]
    planner: PlannerConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("goalplan-server starting");

    let db = match &cli.db_path {
        Some(path) => Db::open(path)?,
        None => Db::open_default()?,
    };

    let provider = Provider::connect(&cli.planner).await;
    info!("planner: {}", provider.describe());
    let planner = Arc::new(Planner::new(provider, &cli.planner));

    let addr = SocketAddr::new(cli.bind.parse()?, cli.port);
    let listener = TcpListener::bind(addr).await?;
    info!("goalplan-server listening on http://{addr}");

    goalplan_server::serve(listener, db, planner).await?;
    Ok(())
}
