use serde::{Deserialize, Serialize};

use super::roles::Role;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub is_active: bool,
    pub role: String,
    pub org_id: Option<u64>,
    pub roles: Vec<Role>,
    pub last_login_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_decodes_from_id_only() {
        let users: Vec<User> = serde_json::from_str(r#"[{"id":1}]"#).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 1);
        assert!(users[0].roles.is_empty());
        assert!(users[0].org_id.is_none());
    }

    #[test]
    fn test_user_decodes_nested_roles() {
        let json = r#"{"id":3,"username":"qa","roles":[{"id":2,"name":"inspector"}]}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.roles.len(), 1);
        assert_eq!(user.roles[0].name, "inspector");
    }
}
