//! Creates an administrator account and prints its access code.
//!
//! ```
//! cargo run --bin seed-admin -- --name "Office"
//! ```

use anyhow::Context as _;
use clap::Parser;
use fleetdocs::config::PoolConfig;
use fleetdocs::application::drivers::access_code::issue_unique_code;
use fleetdocs::domain::drivers::{DriverProfile, DriverRepository, NewDriver, Role};
use fleetdocs::infrastructure::db;
use fleetdocs::infrastructure::repositories::drivers::PostgresDriverRepository;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Create a fleetdocs administrator")]
struct Cli {
    /// Display name of the administrator.
    #[arg(short, long, default_value = "Administrator")]
    name: String,

    /// Optional e-mail address shown in the profile.
    #[arg(short, long)]
    email: Option<String>,

    /// Database to connect to; falls back to `DATABASE_URL`.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let pool = db::create_pool(&cli.database_url, &PoolConfig::default())
        .await
        .context("connecting to the database")?;
    db::run_migrations(&pool).await.context("running migrations")?;

    let repo: Arc<dyn DriverRepository> = Arc::new(PostgresDriverRepository::new(pool));
    let access_code = issue_unique_code(&repo)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let admin = repo
        .create(NewDriver {
            access_code,
            role: Role::Admin,
            profile: DriverProfile {
                full_name: cli.name.trim().to_string(),
                email: cli.email.map(|e| e.trim().to_lowercase()),
                ..DriverProfile::default()
            },
        })
        .await?;

    tracing::info!(account_id = admin.id, "administrator created");
    println!("{}", admin.access_code);
    Ok(())
}
