use crate::domain::drivers::{
    Driver, DriverCounts, DriverProfile, DriverRepository, NewDriver, Role,
};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::drivers::{DRIVER_COLUMNS, DriverDbModel};
use async_trait::async_trait;

#[derive(Clone)]
pub struct PostgresDriverRepository {
    pool: DbPool,
}

impl PostgresDriverRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch_optional(
        &self,
        sql: &str,
        id: i64,
    ) -> Result<Option<Driver>, anyhow::Error> {
        sqlx::query_as::<_, DriverDbModel>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Driver::try_from)
            .transpose()
    }
}

fn month_column(month: Option<u8>) -> Option<i16> {
    month.map(i16::from)
}

#[async_trait]
impl DriverRepository for PostgresDriverRepository {
    async fn create(&self, new_driver: NewDriver) -> Result<Driver, anyhow::Error> {
        let sql = format!(
            r#"
            INSERT INTO drivers (
                access_code, role, full_name, national_id, phone, email,
                license_issued_on, license_category, license_restrictions,
                license_expires_on, license_service_class,
                vehicle_plate, vehicle_make, vehicle_model, vehicle_color,
                soat_expires_on, inspection_expires_on,
                policy_active, policy_month, policy_year,
                admin_fee_active, admin_fee_month, admin_fee_year
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23
            )
            RETURNING {}
            "#,
            DRIVER_COLUMNS
        );
        let profile = new_driver.profile;
        let row = sqlx::query_as::<_, DriverDbModel>(&sql)
            .bind(new_driver.access_code)
            .bind(new_driver.role.as_str())
            .bind(profile.full_name)
            .bind(profile.national_id)
            .bind(profile.phone)
            .bind(profile.email)
            .bind(profile.license.issued_on)
            .bind(profile.license.category)
            .bind(profile.license.restrictions)
            .bind(profile.license.expires_on)
            .bind(profile.license.service_class)
            .bind(profile.vehicle.plate)
            .bind(profile.vehicle.make)
            .bind(profile.vehicle.model)
            .bind(profile.vehicle.color)
            .bind(profile.soat_expires_on)
            .bind(profile.inspection_expires_on)
            .bind(profile.policy.active)
            .bind(month_column(profile.policy.month))
            .bind(profile.policy.year)
            .bind(profile.admin_fee.active)
            .bind(month_column(profile.admin_fee.month))
            .bind(profile.admin_fee.year)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Driver>, anyhow::Error> {
        let sql = format!("SELECT {} FROM drivers WHERE id = $1", DRIVER_COLUMNS);
        self.fetch_optional(&sql, id).await
    }

    async fn find_by_access_code(&self, code: &str) -> Result<Option<Driver>, anyhow::Error> {
        let sql = format!(
            "SELECT {} FROM drivers WHERE access_code = $1",
            DRIVER_COLUMNS
        );
        sqlx::query_as::<_, DriverDbModel>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?
            .map(Driver::try_from)
            .transpose()
    }

    async fn access_code_exists(&self, code: &str) -> Result<bool, anyhow::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM drivers WHERE access_code = $1)")
                .bind(code)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn list_drivers(&self) -> Result<Vec<Driver>, anyhow::Error> {
        let sql = format!(
            "SELECT {} FROM drivers WHERE role = 'driver' ORDER BY created_at DESC, id DESC",
            DRIVER_COLUMNS
        );
        sqlx::query_as::<_, DriverDbModel>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Driver::try_from)
            .collect()
    }

    async fn list_active_drivers(&self) -> Result<Vec<Driver>, anyhow::Error> {
        let sql = format!(
            "SELECT {} FROM drivers WHERE role = 'driver' AND is_active ORDER BY id",
            DRIVER_COLUMNS
        );
        sqlx::query_as::<_, DriverDbModel>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Driver::try_from)
            .collect()
    }

    async fn count_drivers(&self) -> Result<DriverCounts, anyhow::Error> {
        let (total, active): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active)
            FROM drivers
            WHERE role = 'driver'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DriverCounts { total, active })
    }

    async fn update_profile(
        &self,
        id: i64,
        profile: DriverProfile,
    ) -> Result<Option<Driver>, anyhow::Error> {
        let sql = format!(
            r#"
            UPDATE drivers SET
                full_name = $2, national_id = $3, phone = $4, email = $5,
                license_issued_on = $6, license_category = $7, license_restrictions = $8,
                license_expires_on = $9, license_service_class = $10,
                vehicle_plate = $11, vehicle_make = $12, vehicle_model = $13, vehicle_color = $14,
                soat_expires_on = $15, inspection_expires_on = $16,
                policy_active = $17, policy_month = $18, policy_year = $19,
                admin_fee_active = $20, admin_fee_month = $21, admin_fee_year = $22,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            DRIVER_COLUMNS
        );

        sqlx::query_as::<_, DriverDbModel>(&sql)
            .bind(id)
            .bind(profile.full_name)
            .bind(profile.national_id)
            .bind(profile.phone)
            .bind(profile.email)
            .bind(profile.license.issued_on)
            .bind(profile.license.category)
            .bind(profile.license.restrictions)
            .bind(profile.license.expires_on)
            .bind(profile.license.service_class)
            .bind(profile.vehicle.plate)
            .bind(profile.vehicle.make)
            .bind(profile.vehicle.model)
            .bind(profile.vehicle.color)
            .bind(profile.soat_expires_on)
            .bind(profile.inspection_expires_on)
            .bind(profile.policy.active)
            .bind(month_column(profile.policy.month))
            .bind(profile.policy.year)
            .bind(profile.admin_fee.active)
            .bind(month_column(profile.admin_fee.month))
            .bind(profile.admin_fee.year)
            .fetch_optional(&self.pool)
            .await?
            .map(Driver::try_from)
            .transpose()
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Option<Driver>, anyhow::Error> {
        let sql = format!(
            "UPDATE drivers SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            DRIVER_COLUMNS
        );
        sqlx::query_as::<_, DriverDbModel>(&sql)
            .bind(id)
            .bind(active)
            .fetch_optional(&self.pool)
            .await?
            .map(Driver::try_from)
            .transpose()
    }

    async fn set_access_code(&self, id: i64, code: &str) -> Result<Option<Driver>, anyhow::Error> {
        let sql = format!(
            "UPDATE drivers SET access_code = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            DRIVER_COLUMNS
        );
        sqlx::query_as::<_, DriverDbModel>(&sql)
            .bind(id)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?
            .map(Driver::try_from)
            .transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1 AND role = $2")
            .bind(id)
            .bind(Role::Driver.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
