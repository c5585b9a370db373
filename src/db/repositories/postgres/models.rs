use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{missions, planets, scientists};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = scientists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // created_at is a storage-only column
pub struct ScientistRow {
    pub id: i64,
    pub name: String,
    pub field_of_study: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scientists)]
pub struct NewScientistRow {
    pub name: String,
    pub field_of_study: String,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = scientists)]
pub struct ScientistChangesetRow {
    pub name: Option<String>,
    pub field_of_study: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = planets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // created_at is a storage-only column
pub struct PlanetRow {
    pub id: i64,
    pub name: Option<String>,
    pub distance_from_earth: Option<i64>,
    pub nearest_star: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = planets)]
pub struct NewPlanetRow {
    pub name: Option<String>,
    pub distance_from_earth: Option<i64>,
    pub nearest_star: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = missions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // created_at is a storage-only column
pub struct MissionRow {
    pub id: i64,
    pub name: String,
    pub scientist_id: i64,
    pub planet_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = missions)]
pub struct NewMissionRow {
    pub name: String,
    pub scientist_id: i64,
    pub planet_id: Option<i64>,
}
