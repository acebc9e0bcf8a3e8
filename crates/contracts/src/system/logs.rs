use serde::{Deserialize, Serialize};

/// Audit log record (login/logout and resource changes)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    pub id: u64,
    pub user_id: u64,
    pub username: String,
    pub action: String, // "login", "logout", "create", ...
    pub resource: String,
    pub resource_id: u64,
    pub details: String,
    pub ip: String,
    pub timestamp: Option<String>,
    pub created_at: Option<String>,
}
