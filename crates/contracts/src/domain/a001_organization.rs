use serde::{Deserialize, Serialize};

/// Organization (tenant) record as returned by `GET /organizations`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub parent_id: Option<u64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
