//! Unit tests for the service layer against the in-memory backend.

use super::repositories::LocalRepository;
use super::repository::RepositoryError;
use super::services;
use crate::api::{Mission, Planet, Scientist, ScientistChanges, ScientistId};

fn planet(name: &str, distance: i64, star: &str) -> Planet {
    Planet {
        id: None,
        name: Some(name.to_string()),
        distance_from_earth: Some(distance),
        nearest_star: Some(star.to_string()),
    }
}

#[tokio::test]
async fn create_scientist_rejects_empty_fields_without_persisting() {
    let repo = LocalRepository::new();

    let err = services::create_scientist(&repo, Scientist::new("Ada", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));

    let all = services::list_scientists(&repo).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn create_scientist_assigns_id_and_empty_mission_list() {
    let repo = LocalRepository::new();

    let detail = services::create_scientist(&repo, Scientist::new("Ada", "Physics"))
        .await
        .unwrap();
    assert_eq!(detail.name, "Ada");
    assert_eq!(detail.field_of_study, "Physics");
    assert!(detail.missions.is_empty());
    assert!(detail.id.value() > 0);
}

#[tokio::test]
async fn update_scientist_with_empty_changes_is_a_noop_read() {
    let repo = LocalRepository::new();
    let created = services::create_scientist(&repo, Scientist::new("Ada", "Physics"))
        .await
        .unwrap();

    let detail = services::update_scientist(&repo, created.id, ScientistChanges::default())
        .await
        .unwrap();
    assert_eq!(detail.name, "Ada");
    assert_eq!(detail.field_of_study, "Physics");
}

#[tokio::test]
async fn update_scientist_rejects_empty_value_and_leaves_record_unchanged() {
    let repo = LocalRepository::new();
    let created = services::create_scientist(&repo, Scientist::new("Ada", "Physics"))
        .await
        .unwrap();

    let changes = ScientistChanges {
        name: Some(String::new()),
        field_of_study: Some("Chemistry".to_string()),
    };
    let err = services::update_scientist(&repo, created.id, changes)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));

    let detail = services::get_scientist(&repo, created.id).await.unwrap();
    assert_eq!(detail.name, "Ada");
    assert_eq!(detail.field_of_study, "Physics");
}

#[tokio::test]
async fn deleting_a_scientist_removes_its_missions() {
    let repo = LocalRepository::new();
    let ada = services::create_scientist(&repo, Scientist::new("Ada", "Physics"))
        .await
        .unwrap();
    let mars = services::create_planet(&repo, planet("Mars", 225_000_000, "Sol"))
        .await
        .unwrap();
    services::create_mission(&repo, Mission::new("Ares I", ada.id, Some(mars.id)))
        .await
        .unwrap();

    services::delete_scientist(&repo, ada.id).await.unwrap();

    let err = services::get_scientist(&repo, ada.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
    assert!(services::list_missions(&repo).await.unwrap().is_empty());
}

#[tokio::test]
async fn mission_detail_expands_both_ends_without_back_references() {
    let repo = LocalRepository::new();
    let ada = services::create_scientist(&repo, Scientist::new("Ada", "Physics"))
        .await
        .unwrap();
    let mars = services::create_planet(&repo, planet("Mars", 225_000_000, "Sol"))
        .await
        .unwrap();

    let detail = services::create_mission(&repo, Mission::new("Ares I", ada.id, Some(mars.id)))
        .await
        .unwrap();
    assert_eq!(detail.scientist.id, ada.id);
    assert_eq!(detail.planet.as_ref().unwrap().id, mars.id);

    // The nested scientist is a flat summary: serializing it must not
    // produce a mission list.
    let value = serde_json::to_value(&detail).unwrap();
    assert!(value["scientist"].get("missions").is_none());
    assert!(value["planet"].get("missions").is_none());
}

#[tokio::test]
async fn scientist_detail_lists_missions_with_planets() {
    let repo = LocalRepository::new();
    let ada = services::create_scientist(&repo, Scientist::new("Ada", "Physics"))
        .await
        .unwrap();
    let mars = services::create_planet(&repo, planet("Mars", 225_000_000, "Sol"))
        .await
        .unwrap();
    services::create_mission(&repo, Mission::new("Ares I", ada.id, Some(mars.id)))
        .await
        .unwrap();
    services::create_mission(&repo, Mission::new("Ares II", ada.id, None))
        .await
        .unwrap();

    let detail = services::get_scientist(&repo, ada.id).await.unwrap();
    assert_eq!(detail.missions.len(), 2);
    assert_eq!(detail.missions[0].planet.as_ref().unwrap().id, mars.id);
    assert!(detail.missions[1].planet.is_none());

    let value = serde_json::to_value(&detail).unwrap();
    assert!(value["missions"][0].get("scientist").is_none());
}

#[tokio::test]
async fn mission_creation_fails_for_unknown_scientist() {
    let repo = LocalRepository::new();
    let err = services::create_mission(
        &repo,
        Mission::new("Orphan", ScientistId::new(404), None),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
    assert!(services::list_missions(&repo).await.unwrap().is_empty());
}
