use serde::{Deserialize, Serialize};

/// Object class definition scoped to an organization.
///
/// Classes form a tree through `parent_class_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectClass {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub org_id: u64,
    pub parent_class_id: Option<u64>,
    pub created_by: u64,
    pub updated_at: Option<String>,
}
