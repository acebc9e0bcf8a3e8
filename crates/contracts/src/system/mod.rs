pub mod auth;
pub mod logs;
pub mod roles;
pub mod users;
