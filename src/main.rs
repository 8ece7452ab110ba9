use fleetdocs::config::AppConfig;
use fleetdocs::domain::artifacts::{ArtifactStore, ContractRenderer};
use fleetdocs::domain::auth::AuthService;
use fleetdocs::domain::clock::{CivilClock, Clock};
use fleetdocs::domain::contracts::ContractRepository;
use fleetdocs::domain::drivers::DriverRepository;
use fleetdocs::domain::notifications::NotificationDispatcher;
use fleetdocs::infrastructure;
use fleetdocs::infrastructure::auth::JwtAuthService;
use fleetdocs::infrastructure::mailer::{DisabledDispatcher, SmtpDispatcher};
use fleetdocs::infrastructure::pdf::generator::ContractPdfGenerator;
use fleetdocs::infrastructure::repositories::contracts::PostgresContractRepository;
use fleetdocs::infrastructure::repositories::drivers::PostgresDriverRepository;
use fleetdocs::infrastructure::state::{AppState, Services, Settings};
use fleetdocs::infrastructure::storage::{CloudinaryUploader, LocalArtifactStore};
use fleetdocs::presentation;
use fleetdocs::presentation::middleware::cors::cors_layer;

use std::env;
use std::future::Future;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    run(config, wait_for_shutdown_signal()).await
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn run<F>(config: AppConfig, shutdown_signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    // Ignored: tests may initialise the subscriber more than once
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "fleetdocs=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    let (listener, app, state) = bootstrap(&config).await?;

    if state.settings.scheduler_enabled {
        state.scheduler.start();
        tracing::info!(
            next_run = %state.scheduler.next_run_time(),
            "alert scheduler started"
        );
    } else {
        tracing::info!("alert scheduler disabled");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    state.scheduler.stop().await;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn bootstrap(
    config: &AppConfig,
) -> anyhow::Result<(tokio::net::TcpListener, axum::Router, AppState)> {
    let pool = infrastructure::db::create_pool(&config.database_url, &config.pool).await?;
    infrastructure::db::run_migrations(&pool).await?;

    let renderer: Arc<dyn ContractRenderer> = Arc::new(ContractPdfGenerator::load(
        &config.pdf.template_path,
        config.pdf.flatten,
    )?);

    let remote = match config.cloudinary.clone() {
        Some(cloudinary) => Some(CloudinaryUploader::new(cloudinary)?),
        None => {
            tracing::info!("remote document mirror not configured");
            None
        }
    };
    let artifacts: Arc<dyn ArtifactStore> =
        Arc::new(LocalArtifactStore::new(config.pdf.output_dir.clone(), remote));

    let dispatcher: Arc<dyn NotificationDispatcher> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpDispatcher::new(smtp, &config.company.name)?),
        None => {
            tracing::warn!("SMTP credentials missing; e-mail notifications are disabled");
            Arc::new(DisabledDispatcher)
        }
    };

    let auth_service: Arc<dyn AuthService> = Arc::new(JwtAuthService::new(
        config.auth.session_secret.as_bytes(),
        config.auth.session_ttl_secs,
    )?);
    let drivers: Arc<dyn DriverRepository> = Arc::new(PostgresDriverRepository::new(pool.clone()));
    let contracts: Arc<dyn ContractRepository> = Arc::new(PostgresContractRepository::new(
        pool.clone(),
        config.civil_offset,
    ));
    let clock: Arc<dyn Clock> = Arc::new(CivilClock::new(config.civil_offset));

    let state = AppState::new(
        Services {
            pool,
            auth_service,
            drivers,
            contracts,
            clock,
            renderer,
            artifacts,
            dispatcher,
        },
        Settings::from_config(config)?,
    );

    let app = presentation::router::app(state.clone())
        .layer(cors_layer(&config.server.cors_allowed_origins)?);

    let addr = config.server.socket_addr()?;
    tracing::debug!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    Ok((listener, app, state))
}
