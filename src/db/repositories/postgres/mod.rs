//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution at startup
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tokio::task;

use crate::api::{
    Mission, MissionId, Planet, PlanetId, Scientist, ScientistChanges, ScientistId,
};
use crate::db::repository::{
    ErrorContext, MissionRepository, PlanetRepository, RepositoryError, RepositoryResult,
    ScientistRepository,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables (see module docs).
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient
    /// failures (connection errors, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics for monitoring.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn row_to_scientist(row: ScientistRow) -> Scientist {
    Scientist {
        id: Some(ScientistId::new(row.id)),
        name: row.name,
        field_of_study: row.field_of_study,
    }
}

fn row_to_planet(row: PlanetRow) -> Planet {
    Planet {
        id: Some(PlanetId::new(row.id)),
        name: row.name,
        distance_from_earth: row.distance_from_earth,
        nearest_star: row.nearest_star,
    }
}

fn row_to_mission(row: MissionRow) -> Mission {
    Mission {
        id: Some(MissionId::new(row.id)),
        name: row.name,
        scientist_id: ScientistId::new(row.scientist_id),
        planet_id: row.planet_id.map(PlanetId::new),
    }
}

#[async_trait]
impl ScientistRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn insert_scientist(&self, record: &Scientist) -> RepositoryResult<Scientist> {
        let new_row = NewScientistRow {
            name: record.name.clone(),
            field_of_study: record.field_of_study.clone(),
        };

        self.with_conn(move |conn| {
            let inserted: ScientistRow = diesel::insert_into(scientists::table)
                .values(&new_row)
                .returning(ScientistRow::as_returning())
                .get_result(conn)
                .map_err(|e| map_diesel_error(e).with_operation("insert_scientist"))?;

            Ok(row_to_scientist(inserted))
        })
        .await
    }

    async fn list_scientists(&self) -> RepositoryResult<Vec<Scientist>> {
        self.with_conn(|conn| {
            let rows = scientists::table
                .order(scientists::id.asc())
                .select(ScientistRow::as_select())
                .load::<ScientistRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(row_to_scientist).collect())
        })
        .await
    }

    async fn get_scientist(&self, id: ScientistId) -> RepositoryResult<Scientist> {
        self.with_conn(move |conn| {
            let row = scientists::table
                .filter(scientists::id.eq(id.value()))
                .select(ScientistRow::as_select())
                .first::<ScientistRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        "Scientist not found",
                        ErrorContext::new("get_scientist")
                            .with_entity("scientist")
                            .with_entity_id(id),
                    )
                })?;

            Ok(row_to_scientist(row))
        })
        .await
    }

    async fn update_scientist(
        &self,
        id: ScientistId,
        changes: &ScientistChanges,
    ) -> RepositoryResult<Scientist> {
        let changeset = ScientistChangesetRow {
            name: changes.name.clone(),
            field_of_study: changes.field_of_study.clone(),
        };

        self.with_conn(move |conn| {
            let updated = diesel::update(scientists::table.filter(scientists::id.eq(id.value())))
                .set(&changeset)
                .returning(ScientistRow::as_returning())
                .get_result::<ScientistRow>(conn)
                .optional()
                .map_err(|e| map_diesel_error(e).with_operation("update_scientist"))?
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        "Scientist not found",
                        ErrorContext::new("update_scientist")
                            .with_entity("scientist")
                            .with_entity_id(id),
                    )
                })?;

            Ok(row_to_scientist(updated))
        })
        .await
    }

    async fn delete_scientist(&self, id: ScientistId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            // Dependent missions go with the scientist via ON DELETE CASCADE.
            let deleted = diesel::delete(scientists::table.filter(scientists::id.eq(id.value())))
                .execute(conn)
                .map_err(|e| map_diesel_error(e).with_operation("delete_scientist"))?;

            if deleted == 0 {
                return Err(RepositoryError::not_found_with_context(
                    "Scientist not found",
                    ErrorContext::new("delete_scientist")
                        .with_entity("scientist")
                        .with_entity_id(id),
                ));
            }
            Ok(())
        })
        .await
    }

    async fn missions_for_scientist(&self, id: ScientistId) -> RepositoryResult<Vec<Mission>> {
        self.with_conn(move |conn| {
            let rows = missions::table
                .filter(missions::scientist_id.eq(id.value()))
                .order(missions::id.asc())
                .select(MissionRow::as_select())
                .load::<MissionRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(row_to_mission).collect())
        })
        .await
    }
}

#[async_trait]
impl PlanetRepository for PostgresRepository {
    async fn insert_planet(&self, record: &Planet) -> RepositoryResult<Planet> {
        let new_row = NewPlanetRow {
            name: record.name.clone(),
            distance_from_earth: record.distance_from_earth,
            nearest_star: record.nearest_star.clone(),
        };

        self.with_conn(move |conn| {
            let inserted: PlanetRow = diesel::insert_into(planets::table)
                .values(&new_row)
                .returning(PlanetRow::as_returning())
                .get_result(conn)
                .map_err(|e| map_diesel_error(e).with_operation("insert_planet"))?;

            Ok(row_to_planet(inserted))
        })
        .await
    }

    async fn list_planets(&self) -> RepositoryResult<Vec<Planet>> {
        self.with_conn(|conn| {
            let rows = planets::table
                .order(planets::id.asc())
                .select(PlanetRow::as_select())
                .load::<PlanetRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(row_to_planet).collect())
        })
        .await
    }

    async fn get_planet(&self, id: PlanetId) -> RepositoryResult<Planet> {
        self.with_conn(move |conn| {
            let row = planets::table
                .filter(planets::id.eq(id.value()))
                .select(PlanetRow::as_select())
                .first::<PlanetRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        "Planet not found",
                        ErrorContext::new("get_planet")
                            .with_entity("planet")
                            .with_entity_id(id),
                    )
                })?;

            Ok(row_to_planet(row))
        })
        .await
    }
}

#[async_trait]
impl MissionRepository for PostgresRepository {
    async fn insert_mission(&self, record: &Mission) -> RepositoryResult<Mission> {
        let new_row = NewMissionRow {
            name: record.name.clone(),
            scientist_id: record.scientist_id.value(),
            planet_id: record.planet_id.map(|p| p.value()),
        };

        self.with_conn(move |conn| {
            // Foreign key violations surface as validation errors through
            // the diesel error conversion.
            let inserted: MissionRow = diesel::insert_into(missions::table)
                .values(&new_row)
                .returning(MissionRow::as_returning())
                .get_result(conn)
                .map_err(|e| map_diesel_error(e).with_operation("insert_mission"))?;

            Ok(row_to_mission(inserted))
        })
        .await
    }

    async fn list_missions(&self) -> RepositoryResult<Vec<Mission>> {
        self.with_conn(|conn| {
            let rows = missions::table
                .order(missions::id.asc())
                .select(MissionRow::as_select())
                .load::<MissionRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(row_to_mission).collect())
        })
        .await
    }

    async fn get_mission(&self, id: MissionId) -> RepositoryResult<Mission> {
        self.with_conn(move |conn| {
            let row = missions::table
                .filter(missions::id.eq(id.value()))
                .select(MissionRow::as_select())
                .first::<MissionRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        "Mission not found",
                        ErrorContext::new("get_mission")
                            .with_entity("mission")
                            .with_entity_id(id),
                    )
                })?;

            Ok(row_to_mission(row))
        })
        .await
    }
}
