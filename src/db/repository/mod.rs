//! Abstract repository interface for the mission store.
//!
//! One trait per entity keeps the surface small enough that a backend can
//! be read top to bottom; `FullRepository` is the combination every backend
//! must provide and the only type the rest of the crate depends on.

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::{
    Mission, MissionId, Planet, PlanetId, Scientist, ScientistChanges, ScientistId,
};

/// Storage operations for scientists.
#[async_trait]
pub trait ScientistRepository: Send + Sync {
    /// Verify the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert a new scientist and return the stored record with its
    /// generated id.
    async fn insert_scientist(&self, record: &Scientist) -> RepositoryResult<Scientist>;

    /// List all scientists ordered by id.
    async fn list_scientists(&self) -> RepositoryResult<Vec<Scientist>>;

    /// Fetch a single scientist by id.
    async fn get_scientist(&self, id: ScientistId) -> RepositoryResult<Scientist>;

    /// Apply a partial update and return the updated record.
    ///
    /// Callers must not pass an empty change set; fetch instead.
    async fn update_scientist(
        &self,
        id: ScientistId,
        changes: &ScientistChanges,
    ) -> RepositoryResult<Scientist>;

    /// Delete a scientist. Dependent missions are deleted with it.
    async fn delete_scientist(&self, id: ScientistId) -> RepositoryResult<()>;

    /// List the missions referencing a scientist, ordered by id.
    async fn missions_for_scientist(&self, id: ScientistId) -> RepositoryResult<Vec<Mission>>;
}

/// Storage operations for planets.
#[async_trait]
pub trait PlanetRepository: Send + Sync {
    /// Insert a new planet and return the stored record with its id.
    async fn insert_planet(&self, record: &Planet) -> RepositoryResult<Planet>;

    /// List all planets ordered by id.
    async fn list_planets(&self) -> RepositoryResult<Vec<Planet>>;

    /// Fetch a single planet by id.
    async fn get_planet(&self, id: PlanetId) -> RepositoryResult<Planet>;
}

/// Storage operations for missions.
#[async_trait]
pub trait MissionRepository: Send + Sync {
    /// Insert a new mission and return the stored record with its id.
    ///
    /// The referenced scientist (and planet, when given) must exist;
    /// backends reject the insert with a validation error otherwise.
    async fn insert_mission(&self, record: &Mission) -> RepositoryResult<Mission>;

    /// List all missions ordered by id.
    async fn list_missions(&self) -> RepositoryResult<Vec<Mission>>;

    /// Fetch a single mission by id.
    async fn get_mission(&self, id: MissionId) -> RepositoryResult<Mission>;
}

/// Combined interface implemented by every storage backend.
pub trait FullRepository: ScientistRepository + PlanetRepository + MissionRepository {}

impl<T> FullRepository for T where
    T: ScientistRepository + PlanetRepository + MissionRepository
{
}
