use crate::application::alerts::run::RunAlertsUseCase;
use crate::config::{AppConfig, CompanyConfig};
use crate::domain::artifacts::{ArtifactStore, ContractRenderer};
use crate::domain::auth::AuthService;
use crate::domain::clock::Clock;
use crate::domain::contracts::ContractRepository;
use crate::domain::documents::DocumentPolicy;
use crate::domain::drivers::DriverRepository;
use crate::domain::notifications::NotificationDispatcher;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::scheduler::AlertScheduler;
use std::sync::Arc;
use std::time::Duration;
use time::Time;

/// Business settings the use cases read on every request.
#[derive(Debug, Clone)]
pub struct Settings {
    pub policy: DocumentPolicy,
    pub company: CompanyConfig,
    pub dispatch_timeout: Duration,
    pub dispatch_concurrency: usize,
    /// Shared secret for the external alert trigger; `None` closes the endpoint.
    pub trigger_token: Option<String>,
    pub scheduler_enabled: bool,
    pub alert_time: Time,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let alert_time = Time::from_hms(config.alerts.hour, config.alerts.minute, 0)?;
        Ok(Self {
            policy: config.documents.clone(),
            company: config.company.clone(),
            dispatch_timeout: config.alerts.dispatch_timeout,
            dispatch_concurrency: config.alerts.dispatch_concurrency,
            trigger_token: config.auth.trigger_token.clone(),
            scheduler_enabled: config.alerts.scheduler_enabled,
            alert_time,
        })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub auth_service: Arc<dyn AuthService>,
    pub drivers: Arc<dyn DriverRepository>,
    pub contracts: Arc<dyn ContractRepository>,
    pub clock: Arc<dyn Clock>,
    pub renderer: Arc<dyn ContractRenderer>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub dispatcher: Arc<dyn NotificationDispatcher>,
    pub scheduler: Arc<AlertScheduler>,
    pub settings: Arc<Settings>,
}

/// Services the state is assembled from; the scheduler is derived from them.
pub struct Services {
    pub pool: DbPool,
    pub auth_service: Arc<dyn AuthService>,
    pub drivers: Arc<dyn DriverRepository>,
    pub contracts: Arc<dyn ContractRepository>,
    pub clock: Arc<dyn Clock>,
    pub renderer: Arc<dyn ContractRenderer>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub dispatcher: Arc<dyn NotificationDispatcher>,
}

impl AppState {
    pub fn new(services: Services, settings: Settings) -> Self {
        let runner = RunAlertsUseCase::new(
            services.drivers.clone(),
            services.dispatcher.clone(),
            services.clock.clone(),
            settings.policy.clone(),
            settings.company.clone(),
            settings.dispatch_timeout,
            settings.dispatch_concurrency,
        );
        let scheduler = Arc::new(AlertScheduler::new(
            Arc::new(runner),
            services.clock.clone(),
            settings.alert_time,
        ));

        Self {
            pool: services.pool,
            auth_service: services.auth_service,
            drivers: services.drivers,
            contracts: services.contracts,
            clock: services.clock,
            renderer: services.renderer,
            artifacts: services.artifacts,
            dispatcher: services.dispatcher,
            scheduler,
            settings: Arc::new(settings),
        }
    }
}
