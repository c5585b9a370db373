//! Data Transfer Objects for the HTTP API.
//!
//! Response payloads are the view types from [`crate::api`]; only request
//! bodies and the health response live here. Request fields are all
//! optional so that presence checks happen in the handlers (with a proper
//! validation response) instead of failing JSON deserialization.

use serde::{Deserialize, Serialize};

/// Request body for creating a scientist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateScientistRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
}

/// Request body for creating a mission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMissionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub scientist_id: Option<i64>,
    #[serde(default)]
    pub planet_id: Option<i64>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the crate
    pub version: String,
    /// Database connection status
    pub database: String,
}
