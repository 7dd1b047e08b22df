use super::parse_column;
use crate::domain::{
    metrics::{definition::MetricDefinition, repository::MetricDefinitionRepository},
    shared::errors::DomainError,
};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

#[derive(FromRow)]
struct DefinitionRow {
    metric_id: String,
    name: String,
    parent_id: Option<String>,
    impact_weight: f64,
    threshold_warn: f64,
    threshold_crit: f64,
    unit: String,
}

impl TryFrom<DefinitionRow> for MetricDefinition {
    type Error = DomainError;

    fn try_from(r: DefinitionRow) -> Result<Self, Self::Error> {
        Ok(MetricDefinition {
            unit: parse_column("unit", &r.unit)?,
            metric_id: r.metric_id,
            name: r.name,
            parent_id: r.parent_id,
            impact_weight: r.impact_weight,
            threshold_warn: r.threshold_warn,
            threshold_crit: r.threshold_crit,
        })
    }
}

pub struct SqlxMetricDefinitionRepository {
    pub pool: PgPool,
}

impl SqlxMetricDefinitionRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxMetricDefinitionRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl MetricDefinitionRepository for SqlxMetricDefinitionRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<MetricDefinition>, DomainError> {
        let rows = sqlx::query_as::<_, DefinitionRow>(
            "SELECT metric_id, name, parent_id, impact_weight, threshold_warn, threshold_crit, unit \
             FROM metric_definitions ORDER BY parent_id NULLS FIRST, impact_weight DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        rows.into_iter().map(MetricDefinition::try_from).collect()
    }

    #[instrument(skip(self, definitions), fields(count = definitions.len()))]
    async fn upsert_many(&self, definitions: &[MetricDefinition]) -> Result<(), DomainError> {
        if definitions.is_empty() {
            return Ok(());
        }

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO metric_definitions \
             (metric_id, name, parent_id, impact_weight, threshold_warn, threshold_crit, unit) ",
        );
        qb.push_values(definitions, |mut row, d| {
            row.push_bind(&d.metric_id)
                .push_bind(&d.name)
                .push_bind(&d.parent_id)
                .push_bind(d.impact_weight)
                .push_bind(d.threshold_warn)
                .push_bind(d.threshold_crit)
                .push_bind(d.unit.as_str());
        });
        qb.push(
            " ON CONFLICT (metric_id) DO UPDATE SET \
             name = EXCLUDED.name, parent_id = EXCLUDED.parent_id, \
             impact_weight = EXCLUDED.impact_weight, threshold_warn = EXCLUDED.threshold_warn, \
             threshold_crit = EXCLUDED.threshold_crit, unit = EXCLUDED.unit",
        );

        qb.build()
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(())
    }
}
