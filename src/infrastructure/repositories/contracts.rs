use crate::domain::artifacts::ArtifactRef;
use crate::domain::contracts::{
    Contract, ContractFilter, ContractListing, ContractRepository, NewContract, next_number,
};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::contracts::{
    CONTRACT_COLUMNS, ContractDbModel, ContractListingDbModel,
};
use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::{Date, OffsetDateTime, UtcOffset};

#[derive(Clone)]
pub struct PostgresContractRepository {
    pool: DbPool,
    civil_offset: UtcOffset,
}

impl PostgresContractRepository {
    /// `civil_offset` decides which calendar day a creation instant falls on.
    pub fn new(pool: DbPool, civil_offset: UtcOffset) -> Self {
        Self { pool, civil_offset }
    }

    fn start_of(&self, date: Date) -> OffsetDateTime {
        date.midnight().assume_offset(self.civil_offset)
    }

    /// Appends the WHERE clause for `filter`. Expects `c` (contracts) joined with `d` (drivers).
    fn push_filter(&self, builder: &mut QueryBuilder<'_, Postgres>, filter: &ContractFilter) {
        builder.push(" WHERE TRUE");

        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", escape_like(q));
            builder
                .push(" AND (c.contract_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR d.full_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR d.vehicle_plate ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.city ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(service_type) = filter.service_type {
            builder
                .push(" AND c.service_type = ")
                .push_bind(service_type.as_str());
        }

        if let Some(from) = filter.created_from {
            builder
                .push(" AND c.created_at >= ")
                .push_bind(self.start_of(from));
        }
        if let Some(next) = filter.created_to.and_then(Date::next_day) {
            builder
                .push(" AND c.created_at < ")
                .push_bind(self.start_of(next));
        }
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl ContractRepository for PostgresContractRepository {
    async fn create_numbered(&self, new_contract: NewContract) -> Result<Contract, anyhow::Error> {
        let mut tx = self.pool.begin().await?;

        // the reserved sequence value doubles as the contract number
        let id: i64 = sqlx::query_scalar("SELECT nextval(pg_get_serial_sequence('contracts', 'id'))")
            .fetch_one(&mut *tx)
            .await?;
        let number = next_number(id - 1);

        let (service_date, hours) = (
            new_contract.service.service_date(),
            new_contract.service.hours(),
        );
        let sql = format!(
            r#"
            INSERT INTO contracts AS c (
                id, contract_number, driver_id, service_type, service_date, start_time, end_time,
                city, landlord_name, landlord_id, signature, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            CONTRACT_COLUMNS
        );
        let row = sqlx::query_as::<_, ContractDbModel>(&sql)
            .bind(id)
            .bind(&number)
            .bind(new_contract.driver_id)
            .bind(new_contract.service.service_type().as_str())
            .bind(service_date)
            .bind(hours.map(|(start, _)| start.to_string()))
            .bind(hours.map(|(_, end)| end.to_string()))
            .bind(&new_contract.city)
            .bind(&new_contract.landlord_name)
            .bind(&new_contract.landlord_id)
            .bind(&new_contract.signature)
            .bind(new_contract.created_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(contract_number = %number, "contract inserted");

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Contract>, anyhow::Error> {
        let sql = format!("SELECT {} FROM contracts c WHERE c.id = $1", CONTRACT_COLUMNS);
        sqlx::query_as::<_, ContractDbModel>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Contract::try_from)
            .transpose()
    }

    async fn find_by_number(&self, number: &str) -> Result<Option<Contract>, anyhow::Error> {
        let sql = format!(
            "SELECT {} FROM contracts c WHERE c.contract_number = $1",
            CONTRACT_COLUMNS
        );
        sqlx::query_as::<_, ContractDbModel>(&sql)
            .bind(number)
            .fetch_optional(&self.pool)
            .await?
            .map(Contract::try_from)
            .transpose()
    }

    async fn list_by_driver(
        &self,
        driver_id: i64,
        limit: i64,
    ) -> Result<Vec<Contract>, anyhow::Error> {
        let sql = format!(
            "SELECT {} FROM contracts c WHERE c.driver_id = $1 \
             ORDER BY c.created_at DESC, c.id DESC LIMIT $2",
            CONTRACT_COLUMNS
        );
        sqlx::query_as::<_, ContractDbModel>(&sql)
            .bind(driver_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Contract::try_from)
            .collect()
    }

    async fn search(
        &self,
        filter: &ContractFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContractListing>, anyhow::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {}, d.full_name AS driver_name, d.vehicle_plate \
             FROM contracts c JOIN drivers d ON d.id = c.driver_id",
            CONTRACT_COLUMNS
        ));
        self.push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY c.created_at DESC, c.id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        builder
            .build_query_as::<ContractListingDbModel>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ContractListing::try_from)
            .collect()
    }

    async fn count(&self, filter: &ContractFilter) -> Result<i64, anyhow::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM contracts c JOIN drivers d ON d.id = c.driver_id",
        );
        self.push_filter(&mut builder, filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_driver(&self, driver_id: i64) -> Result<i64, anyhow::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contracts WHERE driver_id = $1")
            .bind(driver_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn attach_artifact(
        &self,
        id: i64,
        artifact: &ArtifactRef,
    ) -> Result<Option<Contract>, anyhow::Error> {
        let sql = format!(
            "UPDATE contracts AS c SET artifact_path = $2, artifact_url = $3 \
             WHERE c.id = $1 RETURNING {}",
            CONTRACT_COLUMNS
        );
        sqlx::query_as::<_, ContractDbModel>(&sql)
            .bind(id)
            .bind(&artifact.local_path)
            .bind(&artifact.remote_url)
            .fetch_optional(&self.pool)
            .await?
            .map(Contract::try_from)
            .transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
