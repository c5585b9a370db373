//! Public record types for the mission backend.
//!
//! This file consolidates the domain records, their typed identifiers, the
//! field validators applied before any write commit, and the serialization
//! views returned by the HTTP API. All types derive Serialize/Deserialize
//! for JSON serialization.
//!
//! Relationships between records are plain id references. The nested view
//! types at the bottom of this file are the only way a record is expanded
//! into its relations, and each one carries an explicit allow-list of
//! fields per direction so that a serialized tree can never recurse back
//! into the record it started from.

use serde::{Deserialize, Serialize};

/// Scientist identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScientistId(pub i64);

/// Planet identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanetId(pub i64);

/// Mission identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MissionId(pub i64);

impl ScientistId {
    pub fn new(value: i64) -> Self {
        ScientistId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl PlanetId {
    pub fn new(value: i64) -> Self {
        PlanetId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl MissionId {
    pub fn new(value: i64) -> Self {
        MissionId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ScientistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for PlanetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for MissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ScientistId> for i64 {
    fn from(id: ScientistId) -> Self {
        id.0
    }
}
impl From<PlanetId> for i64 {
    fn from(id: PlanetId) -> Self {
        id.0
    }
}
impl From<MissionId> for i64 {
    fn from(id: MissionId) -> Self {
        id.0
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Name of the offending field
    pub field: &'static str,
    /// Human-readable message
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A researcher who can be assigned to missions.
///
/// `id` is `None` until the record has been committed; the store generates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scientist {
    pub id: Option<ScientistId>,
    pub name: String,
    pub field_of_study: String,
}

impl Scientist {
    pub fn new(name: impl Into<String>, field_of_study: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            field_of_study: field_of_study.into(),
        }
    }

    /// Validate the record before a write commit.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();
        if self.name.is_empty() {
            violations.push(FieldViolation::new("name", "name cannot be empty"));
        }
        if self.field_of_study.is_empty() {
            violations.push(FieldViolation::new(
                "field_of_study",
                "field_of_study cannot be empty",
            ));
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Partial update for a scientist. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScientistChanges {
    pub name: Option<String>,
    pub field_of_study: Option<String>,
}

impl ScientistChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.field_of_study.is_none()
    }

    /// Validate the changed fields before a write commit.
    ///
    /// A field that is present but empty aborts the whole update.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();
        if matches!(self.name.as_deref(), Some("")) {
            violations.push(FieldViolation::new("name", "name cannot be empty"));
        }
        if matches!(self.field_of_study.as_deref(), Some("")) {
            violations.push(FieldViolation::new(
                "field_of_study",
                "field_of_study cannot be empty",
            ));
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// A destination planet. All descriptive fields are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub id: Option<PlanetId>,
    pub name: Option<String>,
    pub distance_from_earth: Option<i64>,
    pub nearest_star: Option<String>,
}

/// A mission joining one scientist to at most one planet.
///
/// `scientist_id` must reference a stored scientist at creation time;
/// `planet_id` is optional at the storage level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: Option<MissionId>,
    pub name: String,
    pub scientist_id: ScientistId,
    pub planet_id: Option<PlanetId>,
}

impl Mission {
    pub fn new(
        name: impl Into<String>,
        scientist_id: ScientistId,
        planet_id: Option<PlanetId>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            scientist_id,
            planet_id,
        }
    }

    /// Validate the record before a write commit.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();
        if self.name.is_empty() {
            violations.push(FieldViolation::new("name", "name cannot be empty"));
        }
        if self.scientist_id.value() <= 0 {
            violations.push(FieldViolation::new(
                "scientist_id",
                "scientist_id cannot be empty",
            ));
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

// ==================== Serialization views ====================
//
// Each view lists exactly the fields it exposes; back-references are simply
// not representable. A mission seen from its scientist has no `scientist`
// field, and a nested scientist or planet never carries a mission list.

/// Flat scientist representation used in list responses and as the
/// `scientist` field of a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScientistSummary {
    pub id: ScientistId,
    pub name: String,
    pub field_of_study: String,
}

/// Flat planet representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetSummary {
    pub id: PlanetId,
    pub name: Option<String>,
    pub distance_from_earth: Option<i64>,
    pub nearest_star: Option<String>,
}

/// A mission as seen from its scientist: the planet is expanded, the
/// scientist back-reference is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScientistMission {
    pub id: MissionId,
    pub name: String,
    pub scientist_id: ScientistId,
    pub planet_id: Option<PlanetId>,
    pub planet: Option<PlanetSummary>,
}

/// A scientist with its missions expanded one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScientistDetail {
    pub id: ScientistId,
    pub name: String,
    pub field_of_study: String,
    pub missions: Vec<ScientistMission>,
}

/// A mission with both ends of the join expanded to their flat summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionDetail {
    pub id: MissionId,
    pub name: String,
    pub scientist_id: ScientistId,
    pub planet_id: Option<PlanetId>,
    pub scientist: ScientistSummary,
    pub planet: Option<PlanetSummary>,
}
