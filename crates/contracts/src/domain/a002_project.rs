use serde::{Deserialize, Serialize};

/// Project belonging to an organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: String,
    pub organization_id: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
