//! REST resources exposed by the back end.
//!
//! Each record type from `contracts` is bound to its collection endpoint.

pub mod api;

use contracts::domain::a001_organization::Organization;
use contracts::domain::a002_project::Project;
use contracts::domain::a003_product::Product;
use contracts::domain::a004_object_class::ObjectClass;
use contracts::system::logs::LogEntry;
use contracts::system::roles::Role;
use contracts::system::users::User;
use serde::de::DeserializeOwned;

pub trait Resource: DeserializeOwned + Clone + 'static {
    /// Collection endpoint, relative to the API base
    const ENDPOINT: &'static str;
    /// Human readable plural, used in logs
    const LABEL: &'static str;
}

impl Resource for Organization {
    const ENDPOINT: &'static str = "/organizations";
    const LABEL: &'static str = "organizations";
}

impl Resource for Project {
    const ENDPOINT: &'static str = "/projects";
    const LABEL: &'static str = "projects";
}

impl Resource for Product {
    const ENDPOINT: &'static str = "/products";
    const LABEL: &'static str = "products";
}

impl Resource for User {
    const ENDPOINT: &'static str = "/users";
    const LABEL: &'static str = "users";
}

impl Resource for Role {
    const ENDPOINT: &'static str = "/roles";
    const LABEL: &'static str = "roles";
}

impl Resource for LogEntry {
    const ENDPOINT: &'static str = "/logs";
    const LABEL: &'static str = "logs";
}

impl Resource for ObjectClass {
    const ENDPOINT: &'static str = "/object-classes";
    const LABEL: &'static str = "object classes";
}
