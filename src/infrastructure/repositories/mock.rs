use crate::domain::artifacts::{ArtifactRef, ArtifactStore, ContractRenderer, RenderInput};
use crate::domain::contracts::{
    Contract, ContractFilter, ContractListing, ContractRepository, NewContract, next_number,
};
use crate::domain::drivers::{
    Driver, DriverCounts, DriverProfile, DriverRepository, NewDriver, Role,
};
use crate::domain::notifications::{NotificationDispatcher, OutboundEmail};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use time::OffsetDateTime;

#[derive(Default)]
struct DriverTable {
    rows: Vec<Driver>,
    last_id: i64,
}

#[derive(Clone, Default)]
pub struct MockDriverRepository {
    table: Arc<Mutex<DriverTable>>,
}

impl MockDriverRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully-formed driver, assigning the next id.
    pub fn insert(&self, mut driver: Driver) -> Driver {
        let mut table = self.table.lock().unwrap();
        table.last_id += 1;
        driver.id = table.last_id;
        table.rows.push(driver.clone());
        driver
    }

    pub fn get(&self, id: i64) -> Option<Driver> {
        let table = self.table.lock().unwrap();
        table.rows.iter().find(|d| d.id == id).cloned()
    }

    fn update<F>(&self, id: i64, apply: F) -> Option<Driver>
    where
        F: FnOnce(&mut Driver),
    {
        let mut table = self.table.lock().unwrap();
        let driver = table.rows.iter_mut().find(|d| d.id == id)?;
        apply(driver);
        driver.updated_at = OffsetDateTime::now_utc();
        Some(driver.clone())
    }
}

#[async_trait]
impl DriverRepository for MockDriverRepository {
    async fn create(&self, new_driver: NewDriver) -> Result<Driver, anyhow::Error> {
        if self.access_code_exists(&new_driver.access_code).await? {
            anyhow::bail!("duplicate access code");
        }
        let now = OffsetDateTime::now_utc();
        Ok(self.insert(Driver {
            id: 0,
            access_code: new_driver.access_code,
            role: new_driver.role,
            is_active: true,
            profile: new_driver.profile,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Driver>, anyhow::Error> {
        Ok(self.get(id))
    }

    async fn find_by_access_code(&self, code: &str) -> Result<Option<Driver>, anyhow::Error> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|d| d.access_code == code).cloned())
    }

    async fn access_code_exists(&self, code: &str) -> Result<bool, anyhow::Error> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().any(|d| d.access_code == code))
    }

    async fn list_drivers(&self) -> Result<Vec<Driver>, anyhow::Error> {
        let table = self.table.lock().unwrap();
        let mut drivers: Vec<Driver> = table
            .rows
            .iter()
            .filter(|d| d.role == Role::Driver)
            .cloned()
            .collect();
        drivers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(drivers)
    }

    async fn list_active_drivers(&self) -> Result<Vec<Driver>, anyhow::Error> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .filter(|d| d.role == Role::Driver && d.is_active)
            .cloned()
            .collect())
    }

    async fn count_drivers(&self) -> Result<DriverCounts, anyhow::Error> {
        let table = self.table.lock().unwrap();
        let drivers = table.rows.iter().filter(|d| d.role == Role::Driver);
        let (total, active) = drivers.fold((0, 0), |(total, active), d| {
            (total + 1, active + i64::from(d.is_active))
        });
        Ok(DriverCounts { total, active })
    }

    async fn update_profile(
        &self,
        id: i64,
        profile: DriverProfile,
    ) -> Result<Option<Driver>, anyhow::Error> {
        Ok(self.update(id, |d| d.profile = profile))
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Option<Driver>, anyhow::Error> {
        Ok(self.update(id, |d| d.is_active = active))
    }

    async fn set_access_code(&self, id: i64, code: &str) -> Result<Option<Driver>, anyhow::Error> {
        Ok(self.update(id, |d| d.access_code = code.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<bool, anyhow::Error> {
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|d| !(d.id == id && d.role == Role::Driver));
        Ok(table.rows.len() < before)
    }
}

#[derive(Default)]
struct ContractTable {
    rows: Vec<Contract>,
    /// Never decreases, so deleted numbers are not handed out again.
    last_id: i64,
}

#[derive(Clone)]
pub struct MockContractRepository {
    table: Arc<Mutex<ContractTable>>,
    drivers: MockDriverRepository,
}

impl MockContractRepository {
    /// Listings join against `drivers` for the name and plate.
    pub fn new(drivers: MockDriverRepository) -> Self {
        Self {
            table: Arc::new(Mutex::new(ContractTable::default())),
            drivers,
        }
    }

    pub fn all(&self) -> Vec<Contract> {
        self.table.lock().unwrap().rows.clone()
    }

    fn listing(&self, contract: Contract) -> ContractListing {
        let driver = self.drivers.get(contract.driver_id);
        ContractListing {
            driver_name: driver
                .as_ref()
                .map(|d| d.full_name().to_string())
                .unwrap_or_default(),
            plate: driver.and_then(|d| d.plate().map(str::to_string)),
            contract,
        }
    }

    fn newest_first(mut contracts: Vec<Contract>) -> Vec<Contract> {
        contracts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        contracts
    }

    fn filtered(&self, filter: &ContractFilter) -> Vec<ContractListing> {
        let rows = self.table.lock().unwrap().rows.clone();
        Self::newest_first(rows)
            .into_iter()
            .map(|c| self.listing(c))
            .filter(|l| filter.matches(l))
            .collect()
    }
}

#[async_trait]
impl ContractRepository for MockContractRepository {
    async fn create_numbered(&self, new_contract: NewContract) -> Result<Contract, anyhow::Error> {
        if self.drivers.get(new_contract.driver_id).is_none() {
            anyhow::bail!("driver {} does not exist", new_contract.driver_id);
        }

        let mut table = self.table.lock().unwrap();
        let contract = Contract {
            id: table.last_id + 1,
            contract_number: next_number(table.last_id),
            driver_id: new_contract.driver_id,
            service: new_contract.service,
            city: new_contract.city,
            landlord_name: new_contract.landlord_name,
            landlord_id: new_contract.landlord_id,
            signature: new_contract.signature,
            artifact: ArtifactRef::default(),
            created_at: new_contract.created_at,
        };
        table.last_id = contract.id;
        table.rows.push(contract.clone());
        Ok(contract)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Contract>, anyhow::Error> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_number(&self, number: &str) -> Result<Option<Contract>, anyhow::Error> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .find(|c| c.contract_number == number)
            .cloned())
    }

    async fn list_by_driver(
        &self,
        driver_id: i64,
        limit: i64,
    ) -> Result<Vec<Contract>, anyhow::Error> {
        let rows = self.table.lock().unwrap().rows.clone();
        Ok(Self::newest_first(rows)
            .into_iter()
            .filter(|c| c.driver_id == driver_id)
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn search(
        &self,
        filter: &ContractFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContractListing>, anyhow::Error> {
        Ok(self
            .filtered(filter)
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn count(&self, filter: &ContractFilter) -> Result<i64, anyhow::Error> {
        Ok(self.filtered(filter).len() as i64)
    }

    async fn count_by_driver(&self, driver_id: i64) -> Result<i64, anyhow::Error> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().filter(|c| c.driver_id == driver_id).count() as i64)
    }

    async fn attach_artifact(
        &self,
        id: i64,
        artifact: &ArtifactRef,
    ) -> Result<Option<Contract>, anyhow::Error> {
        let mut table = self.table.lock().unwrap();
        Ok(table.rows.iter_mut().find(|c| c.id == id).map(|c| {
            c.artifact = artifact.clone();
            c.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, anyhow::Error> {
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|c| c.id != id);
        Ok(table.rows.len() < before)
    }
}

/// Records every message; selected recipients fail or stall.
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    delay: Arc<Mutex<Option<(String, Duration)>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, address: &str) {
        self.failing.lock().unwrap().insert(address.to_string());
    }

    /// Delivery to `address` takes `delay` before succeeding.
    pub fn stall_for(&self, address: &str, delay: Duration) {
        *self.delay.lock().unwrap() = Some((address.to_string(), delay));
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, email: OutboundEmail) -> Result<(), anyhow::Error> {
        let stall = self
            .delay
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(address, _)| *address == email.to)
            .map(|(_, delay)| *delay);
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(&email.to) {
            anyhow::bail!("mailbox unavailable: {}", email.to);
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Keeps artifacts in memory under `memory://<name>`.
#[derive(Clone, Default)]
pub struct InMemoryArtifactStore {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn store(&self, name: &str, bytes: Vec<u8>) -> Result<ArtifactRef, anyhow::Error> {
        let path = format!("memory://{}", name);
        self.files.lock().unwrap().insert(path.clone(), bytes);
        Ok(ArtifactRef {
            local_path: Some(path),
            remote_url: None,
        })
    }

    async fn read_local(&self, path: &str) -> Result<Option<Vec<u8>>, anyhow::Error> {
        Ok(self.files.lock().unwrap().get(path).cloned())
    }
}

/// Renders a short marker document instead of a real PDF.
#[derive(Clone, Default)]
pub struct StubRenderer {
    fail: bool,
    rendered: Arc<Mutex<Vec<RenderInput>>>,
}

impl StubRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn rendered(&self) -> Vec<RenderInput> {
        self.rendered.lock().unwrap().clone()
    }
}

impl ContractRenderer for StubRenderer {
    fn render(&self, input: &RenderInput) -> Result<Vec<u8>, anyhow::Error> {
        if self.fail {
            anyhow::bail!("template could not be filled");
        }
        self.rendered.lock().unwrap().push(input.clone());
        Ok(format!("%PDF-stub {}", input.contract.contract_number).into_bytes())
    }
}
