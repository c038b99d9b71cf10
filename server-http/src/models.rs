use serde::{Deserialize, Serialize};
use uuid::Uuid;

// === Data Operation Models ===

#[derive(Deserialize)]
pub struct StoreRequest {
    /// Optional on create; a fresh UUID is generated when absent
    #[serde(default)]
    pub id: Option<Uuid>,
    pub payload: String,
}

#[derive(Serialize)]
pub struct RetrieveResponse {
    pub id: Uuid,
    pub payload: String,
}

#[derive(Serialize)]
pub struct StoreResponse {
    pub id: Uuid,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
}
