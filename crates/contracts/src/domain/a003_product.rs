use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub code: String,
    pub description: String,
    pub category: String,
    pub unit: String,
    pub project_id: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
