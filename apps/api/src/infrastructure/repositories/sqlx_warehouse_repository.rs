use super::{is_unique_violation, parse_column};
use crate::domain::{
    shared::errors::DomainError,
    warehouse::{
        entity::{NewWarehouse, Warehouse, WarehouseChanges},
        repository::WarehouseRepository,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{error, info, instrument};

const COLUMNS: &str = "id, name, zone, city, is_active, created_at, updated_at";

#[derive(FromRow)]
struct WarehouseRow {
    id: String,
    name: String,
    zone: String,
    city: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<WarehouseRow> for Warehouse {
    type Error = DomainError;

    fn try_from(r: WarehouseRow) -> Result<Self, Self::Error> {
        Ok(Warehouse {
            zone: parse_column("zone", &r.zone)?,
            id: r.id,
            name: r.name,
            city: r.city,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

pub struct SqlxWarehouseRepository {
    pub pool: PgPool,
}

impl SqlxWarehouseRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxWarehouseRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl WarehouseRepository for SqlxWarehouseRepository {
    #[instrument(skip(self))]
    async fn list(&self, active_only: bool) -> Result<Vec<Warehouse>, DomainError> {
        let sql = format!(
            "SELECT {} FROM warehouses WHERE ($1 = FALSE OR is_active) ORDER BY id",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, WarehouseRow>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        rows.into_iter().map(Warehouse::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Warehouse>, DomainError> {
        let sql = format!("SELECT {} FROM warehouses WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, WarehouseRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?
            .map(Warehouse::try_from)
            .transpose()
    }

    async fn count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM warehouses")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))
    }

    #[instrument(skip(self, warehouse), fields(warehouse_id = %warehouse.id))]
    async fn create(&self, warehouse: &NewWarehouse) -> Result<Warehouse, DomainError> {
        let sql = format!(
            "INSERT INTO warehouses (id, name, zone, city, is_active) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, WarehouseRow>(&sql)
            .bind(&warehouse.id)
            .bind(&warehouse.name)
            .bind(warehouse.zone.as_str())
            .bind(&warehouse.city)
            .bind(warehouse.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Conflict(format!("Warehouse {} already exists", warehouse.id))
                } else {
                    error!("Failed to create warehouse: {}", e);
                    DomainError::InfrastructureError(e.to_string())
                }
            })?;
        row.try_into()
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: &str, changes: &WarehouseChanges) -> Result<Option<Warehouse>, DomainError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE warehouses SET updated_at = NOW()");
        if let Some(name) = &changes.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(zone) = changes.zone {
            qb.push(", zone = ").push_bind(zone.as_str());
        }
        if let Some(city) = &changes.city {
            qb.push(", city = ").push_bind(city);
        }
        if let Some(is_active) = changes.is_active {
            qb.push(", is_active = ").push_bind(is_active);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ").push(COLUMNS);

        qb.build_query_as::<WarehouseRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?
            .map(Warehouse::try_from)
            .transpose()
    }

    #[instrument(skip(self, warehouse), fields(warehouse_id = %warehouse.id))]
    async fn upsert(&self, warehouse: &NewWarehouse) -> Result<Warehouse, DomainError> {
        let sql = format!(
            "INSERT INTO warehouses (id, name, zone, city, is_active) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
                name = EXCLUDED.name, zone = EXCLUDED.zone, city = EXCLUDED.city, \
                is_active = EXCLUDED.is_active, updated_at = NOW() \
             RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, WarehouseRow>(&sql)
            .bind(&warehouse.id)
            .bind(&warehouse.name)
            .bind(warehouse.zone.as_str())
            .bind(&warehouse.city)
            .bind(warehouse.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        row.try_into()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(())
    }
}
