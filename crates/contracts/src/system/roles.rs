use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// JSON document with the permission set, kept verbatim
    pub permissions: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
