//! In-memory repository for unit testing and local development.
//!
//! Tables are `BTreeMap`s keyed by id so listings come back in insertion
//! order, matching the id-ordered listings of the Postgres backend. Ids are
//! generated from per-table counters and never reused within a process.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{
    Mission, MissionId, Planet, PlanetId, Scientist, ScientistChanges, ScientistId,
};
use crate::db::repository::{
    ErrorContext, MissionRepository, PlanetRepository, RepositoryError, RepositoryResult,
    ScientistRepository,
};

#[derive(Default)]
struct Tables {
    scientists: BTreeMap<i64, Scientist>,
    planets: BTreeMap<i64, Planet>,
    missions: BTreeMap<i64, Mission>,
    next_scientist_id: i64,
    next_planet_id: i64,
    next_mission_id: i64,
}

/// In-memory implementation of the repository traits.
pub struct LocalRepository {
    tables: RwLock<Tables>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn scientist_not_found(operation: &str, id: ScientistId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        "Scientist not found",
        ErrorContext::new(operation)
            .with_entity("scientist")
            .with_entity_id(id),
    )
}

#[async_trait]
impl ScientistRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn insert_scientist(&self, record: &Scientist) -> RepositoryResult<Scientist> {
        let mut tables = self.tables.write();
        tables.next_scientist_id += 1;
        let id = tables.next_scientist_id;

        let mut stored = record.clone();
        stored.id = Some(ScientistId::new(id));
        tables.scientists.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_scientists(&self) -> RepositoryResult<Vec<Scientist>> {
        let tables = self.tables.read();
        Ok(tables.scientists.values().cloned().collect())
    }

    async fn get_scientist(&self, id: ScientistId) -> RepositoryResult<Scientist> {
        let tables = self.tables.read();
        tables
            .scientists
            .get(&id.value())
            .cloned()
            .ok_or_else(|| scientist_not_found("get_scientist", id))
    }

    async fn update_scientist(
        &self,
        id: ScientistId,
        changes: &ScientistChanges,
    ) -> RepositoryResult<Scientist> {
        let mut tables = self.tables.write();
        let record = tables
            .scientists
            .get_mut(&id.value())
            .ok_or_else(|| scientist_not_found("update_scientist", id))?;

        if let Some(name) = &changes.name {
            record.name = name.clone();
        }
        if let Some(field_of_study) = &changes.field_of_study {
            record.field_of_study = field_of_study.clone();
        }
        Ok(record.clone())
    }

    async fn delete_scientist(&self, id: ScientistId) -> RepositoryResult<()> {
        let mut tables = self.tables.write();
        if tables.scientists.remove(&id.value()).is_none() {
            return Err(scientist_not_found("delete_scientist", id));
        }
        // Cascade: missions never outlive their scientist.
        tables.missions.retain(|_, m| m.scientist_id != id);
        Ok(())
    }

    async fn missions_for_scientist(&self, id: ScientistId) -> RepositoryResult<Vec<Mission>> {
        let tables = self.tables.read();
        Ok(tables
            .missions
            .values()
            .filter(|m| m.scientist_id == id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PlanetRepository for LocalRepository {
    async fn insert_planet(&self, record: &Planet) -> RepositoryResult<Planet> {
        let mut tables = self.tables.write();
        tables.next_planet_id += 1;
        let id = tables.next_planet_id;

        let mut stored = record.clone();
        stored.id = Some(PlanetId::new(id));
        tables.planets.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_planets(&self) -> RepositoryResult<Vec<Planet>> {
        let tables = self.tables.read();
        Ok(tables.planets.values().cloned().collect())
    }

    async fn get_planet(&self, id: PlanetId) -> RepositoryResult<Planet> {
        let tables = self.tables.read();
        tables.planets.get(&id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "Planet not found",
                ErrorContext::new("get_planet")
                    .with_entity("planet")
                    .with_entity_id(id),
            )
        })
    }
}

#[async_trait]
impl MissionRepository for LocalRepository {
    async fn insert_mission(&self, record: &Mission) -> RepositoryResult<Mission> {
        let mut tables = self.tables.write();

        // Same rejection the Postgres foreign keys produce.
        if !tables.scientists.contains_key(&record.scientist_id.value()) {
            return Err(RepositoryError::validation_with_context(
                "scientist_id does not reference a stored scientist",
                ErrorContext::new("insert_mission")
                    .with_entity("mission")
                    .with_details(format!("scientist_id={}", record.scientist_id)),
            ));
        }
        if let Some(planet_id) = record.planet_id {
            if !tables.planets.contains_key(&planet_id.value()) {
                return Err(RepositoryError::validation_with_context(
                    "planet_id does not reference a stored planet",
                    ErrorContext::new("insert_mission")
                        .with_entity("mission")
                        .with_details(format!("planet_id={}", planet_id)),
                ));
            }
        }

        tables.next_mission_id += 1;
        let id = tables.next_mission_id;

        let mut stored = record.clone();
        stored.id = Some(MissionId::new(id));
        tables.missions.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_missions(&self) -> RepositoryResult<Vec<Mission>> {
        let tables = self.tables.read();
        Ok(tables.missions.values().cloned().collect())
    }

    async fn get_mission(&self, id: MissionId) -> RepositoryResult<Mission> {
        let tables = self.tables.read();
        tables.missions.get(&id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "Mission not found",
                ErrorContext::new("get_mission")
                    .with_entity("mission")
                    .with_entity_id(id),
            )
        })
    }
}
