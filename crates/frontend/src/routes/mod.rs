pub mod guard;
pub mod history;
pub mod navigator;
pub mod routes;
pub mod table;
