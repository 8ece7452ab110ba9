use crate::application::alerts::compose::contract_emails;
use crate::application::alerts::run::deliver;
use crate::application::contracts::artifact_file_name;
use crate::application::drivers::find_driver;
use crate::config::CompanyConfig;
use crate::domain::artifacts::{ArtifactStore, ContractRenderer, RenderInput};
use crate::domain::clock::Clock;
use crate::domain::contracts::{
    Contract, ContractRepository, NewContract, ServiceType, ServiceWindow, is_valid_clock_time,
};
use crate::domain::documents::{DocumentPolicy, evaluate};
use crate::domain::drivers::DriverRepository;
use crate::domain::notifications::NotificationDispatcher;
use crate::domain::signature::validate_signature_uri;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use time::Date;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateContractRequest {
    pub service_type: ServiceType,
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    #[schema(example = "Medellín")]
    pub city: String,
    /// Required for `by_day`.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub service_date: Option<Date>,
    /// `HH:MM`, required for `by_hour`.
    #[serde(default)]
    #[schema(example = "08:00")]
    pub start_time: Option<String>,
    #[serde(default)]
    #[schema(example = "12:00")]
    pub end_time: Option<String>,
    /// `data:image/png;base64,...` captured from the signature pad.
    #[validate(length(min = 1, message = "Signature is required"))]
    pub signature: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "Landlord name is too long"))]
    pub landlord_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20, message = "Landlord id is too long"))]
    pub landlord_id: Option<String>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CreateContractRequest {
    /// A service date or an hour range, matching `service_type`; never both.
    pub fn service_window(&self) -> Result<ServiceWindow, AppError> {
        let start = blank_to_none(self.start_time.clone());
        let end = blank_to_none(self.end_time.clone());

        match self.service_type {
            ServiceType::ByDay => {
                if start.is_some() || end.is_some() {
                    return Err(AppError::ValidationError(
                        "By-day contracts do not take start or end times".to_string(),
                    ));
                }
                let date = self.service_date.ok_or_else(|| {
                    AppError::ValidationError("Service date is required".to_string())
                })?;
                Ok(ServiceWindow::ByDay { date })
            }
            ServiceType::ByHour => {
                if self.service_date.is_some() {
                    return Err(AppError::ValidationError(
                        "By-hour contracts do not take a service date".to_string(),
                    ));
                }
                let (Some(start), Some(end)) = (start, end) else {
                    return Err(AppError::ValidationError(
                        "Start and end times are required".to_string(),
                    ));
                };
                if !is_valid_clock_time(&start) || !is_valid_clock_time(&end) {
                    return Err(AppError::ValidationError(
                        "Times must use the HH:MM format".to_string(),
                    ));
                }
                Ok(ServiceWindow::ByHour { start, end })
            }
        }
    }
}

/// Creates a contract for the signed-in driver, renders and stores its document,
/// then mails copies in the background.
pub struct CreateContractUseCase {
    drivers: Arc<dyn DriverRepository>,
    contracts: Arc<dyn ContractRepository>,
    renderer: Arc<dyn ContractRenderer>,
    artifacts: Arc<dyn ArtifactStore>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    policy: DocumentPolicy,
    company: CompanyConfig,
    dispatch_timeout: Duration,
}

impl CreateContractUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        drivers: Arc<dyn DriverRepository>,
        contracts: Arc<dyn ContractRepository>,
        renderer: Arc<dyn ContractRenderer>,
        artifacts: Arc<dyn ArtifactStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        policy: DocumentPolicy,
        company: CompanyConfig,
        dispatch_timeout: Duration,
    ) -> Self {
        Self {
            drivers,
            contracts,
            renderer,
            artifacts,
            dispatcher,
            clock,
            policy,
            company,
            dispatch_timeout,
        }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(
        &self,
        driver_id: i64,
        req: CreateContractRequest,
    ) -> Result<Contract, AppError> {
        let driver = find_driver(&self.drivers, driver_id).await?;

        if driver.plate().is_none() {
            return Err(AppError::ValidationError(
                "No vehicle is assigned to this driver".to_string(),
            ));
        }
        validate_signature_uri(&req.signature)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        let service = req.service_window()?;

        let now = self.clock.now();
        if evaluate(&driver, now.date(), &self.policy).blocked {
            tracing::info!(driver_id, "contract refused, documents blocking");
            return Err(AppError::ValidationError(
                "Documents are missing or expired; contract generation is blocked".to_string(),
            ));
        }

        let contract = self
            .contracts
            .create_numbered(NewContract {
                driver_id,
                service,
                city: req.city.trim().to_string(),
                landlord_name: blank_to_none(req.landlord_name),
                landlord_id: blank_to_none(req.landlord_id),
                signature: req.signature,
                created_at: now,
            })
            .await?;
        tracing::info!(
            contract_id = contract.id,
            number = %contract.contract_number,
            "contract created"
        );

        let input = RenderInput {
            contract: contract.clone(),
            driver: driver.clone(),
            today: self.clock.today(),
            lessee: self.company.name.clone(),
        };
        let renderer = self.renderer.clone();
        let pdf = tokio::task::spawn_blocking(move || renderer.render(&input))
            .await
            .map_err(anyhow::Error::from)??;

        let artifact = self
            .artifacts
            .store(&artifact_file_name(&contract), pdf.clone())
            .await?;
        let contract = self
            .contracts
            .attach_artifact(contract.id, &artifact)
            .await?
            .ok_or(AppError::NotFound)?;

        let emails = contract_emails(&contract, &driver, &pdf, &self.company);
        if !emails.is_empty() {
            let dispatcher = self.dispatcher.clone();
            let timeout = self.dispatch_timeout;
            tokio::spawn(async move {
                for email in emails {
                    deliver(dispatcher.as_ref(), email, timeout).await;
                }
            });
        }

        Ok(contract)
    }
}
