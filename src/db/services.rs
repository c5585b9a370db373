//! High-level persistence operations.
//!
//! Handlers (and the seed binary) go through these functions rather than the
//! repository traits directly. Each write validates its record first and
//! only then touches the store; each read that returns a nested view
//! composes the tree here, one level deep, following the directional
//! serialization rules in [`crate::api`].

use log::debug;

use crate::api::{
    FieldViolation, Mission, MissionDetail, Planet, PlanetId, PlanetSummary, Scientist,
    ScientistChanges, ScientistDetail, ScientistId, ScientistMission, ScientistSummary,
};
use crate::db::repository::{
    ErrorContext, FullRepository, RepositoryError, RepositoryResult,
};

fn violations_to_error(
    operation: &str,
    entity: &str,
    violations: Vec<FieldViolation>,
) -> RepositoryError {
    let message = violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    RepositoryError::validation_with_context(
        message,
        ErrorContext::new(operation).with_entity(entity),
    )
}

fn missing_id_error(operation: &str, entity: &str) -> RepositoryError {
    // A committed record without a generated id means the insert never
    // actually happened.
    RepositoryError::validation_with_context(
        format!("{entity} was not assigned an id"),
        ErrorContext::new(operation).with_entity(entity),
    )
}

fn scientist_summary(record: &Scientist) -> RepositoryResult<ScientistSummary> {
    let id = record
        .id
        .ok_or_else(|| missing_id_error("scientist_summary", "scientist"))?;
    Ok(ScientistSummary {
        id,
        name: record.name.clone(),
        field_of_study: record.field_of_study.clone(),
    })
}

fn planet_summary(record: &Planet) -> RepositoryResult<PlanetSummary> {
    let id = record
        .id
        .ok_or_else(|| missing_id_error("planet_summary", "planet"))?;
    Ok(PlanetSummary {
        id,
        name: record.name.clone(),
        distance_from_earth: record.distance_from_earth,
        nearest_star: record.nearest_star.clone(),
    })
}

async fn expand_planet(
    repo: &dyn FullRepository,
    planet_id: Option<PlanetId>,
) -> RepositoryResult<Option<PlanetSummary>> {
    match planet_id {
        Some(id) => {
            let planet = repo.get_planet(id).await?;
            Ok(Some(planet_summary(&planet)?))
        }
        None => Ok(None),
    }
}

/// Build the scientist tree: the record plus its missions, each mission
/// carrying its planet but never its scientist.
async fn scientist_detail(
    repo: &dyn FullRepository,
    record: &Scientist,
) -> RepositoryResult<ScientistDetail> {
    let summary = scientist_summary(record)?;
    let missions = repo.missions_for_scientist(summary.id).await?;

    let mut entries = Vec::with_capacity(missions.len());
    for mission in &missions {
        let mission_id = mission
            .id
            .ok_or_else(|| missing_id_error("scientist_detail", "mission"))?;
        entries.push(ScientistMission {
            id: mission_id,
            name: mission.name.clone(),
            scientist_id: mission.scientist_id,
            planet_id: mission.planet_id,
            planet: expand_planet(repo, mission.planet_id).await?,
        });
    }

    Ok(ScientistDetail {
        id: summary.id,
        name: summary.name,
        field_of_study: summary.field_of_study,
        missions: entries,
    })
}

/// Build the mission tree: the record plus flat summaries of its scientist
/// and planet.
async fn mission_detail(
    repo: &dyn FullRepository,
    record: &Mission,
) -> RepositoryResult<MissionDetail> {
    let id = record
        .id
        .ok_or_else(|| missing_id_error("mission_detail", "mission"))?;
    let scientist = repo.get_scientist(record.scientist_id).await?;

    Ok(MissionDetail {
        id,
        name: record.name.clone(),
        scientist_id: record.scientist_id,
        planet_id: record.planet_id,
        scientist: scientist_summary(&scientist)?,
        planet: expand_planet(repo, record.planet_id).await?,
    })
}

/// Verify the backend is reachable.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Validate and store a new scientist, returning its nested view.
pub async fn create_scientist(
    repo: &dyn FullRepository,
    record: Scientist,
) -> RepositoryResult<ScientistDetail> {
    record
        .validate()
        .map_err(|v| violations_to_error("create_scientist", "scientist", v))?;

    let stored = repo.insert_scientist(&record).await?;
    debug!("stored scientist id={:?}", stored.id);
    scientist_detail(repo, &stored).await
}

/// List all scientists as flat summaries.
pub async fn list_scientists(
    repo: &dyn FullRepository,
) -> RepositoryResult<Vec<ScientistSummary>> {
    let records = repo.list_scientists().await?;
    records.iter().map(scientist_summary).collect()
}

/// Fetch a scientist and its missions.
pub async fn get_scientist(
    repo: &dyn FullRepository,
    id: ScientistId,
) -> RepositoryResult<ScientistDetail> {
    let record = repo.get_scientist(id).await?;
    scientist_detail(repo, &record).await
}

/// Validate and apply a partial update, returning the updated nested view.
///
/// An empty change set is a no-op read; the store is never asked to write
/// zero fields.
pub async fn update_scientist(
    repo: &dyn FullRepository,
    id: ScientistId,
    changes: ScientistChanges,
) -> RepositoryResult<ScientistDetail> {
    changes
        .validate()
        .map_err(|v| violations_to_error("update_scientist", "scientist", v))?;

    let stored = if changes.is_empty() {
        repo.get_scientist(id).await?
    } else {
        repo.update_scientist(id, &changes).await?
    };
    scientist_detail(repo, &stored).await
}

/// Delete a scientist; its missions are deleted with it.
pub async fn delete_scientist(
    repo: &dyn FullRepository,
    id: ScientistId,
) -> RepositoryResult<()> {
    repo.delete_scientist(id).await?;
    debug!("deleted scientist id={}", id);
    Ok(())
}

/// Store a new planet, returning its flat summary.
pub async fn create_planet(
    repo: &dyn FullRepository,
    record: Planet,
) -> RepositoryResult<PlanetSummary> {
    let stored = repo.insert_planet(&record).await?;
    planet_summary(&stored)
}

/// List all planets as flat summaries.
pub async fn list_planets(repo: &dyn FullRepository) -> RepositoryResult<Vec<PlanetSummary>> {
    let records = repo.list_planets().await?;
    records.iter().map(planet_summary).collect()
}

/// Validate and store a new mission, returning its nested view.
pub async fn create_mission(
    repo: &dyn FullRepository,
    record: Mission,
) -> RepositoryResult<MissionDetail> {
    record
        .validate()
        .map_err(|v| violations_to_error("create_mission", "mission", v))?;

    let stored = repo.insert_mission(&record).await?;
    debug!("stored mission id={:?}", stored.id);
    mission_detail(repo, &stored).await
}

/// List all missions as nested views.
pub async fn list_missions(repo: &dyn FullRepository) -> RepositoryResult<Vec<MissionDetail>> {
    let records = repo.list_missions().await?;

    let mut details = Vec::with_capacity(records.len());
    for record in &records {
        details.push(mission_detail(repo, record).await?);
    }
    Ok(details)
}
