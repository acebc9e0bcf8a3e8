pub mod a001_organization;
pub mod a002_project;
pub mod a003_product;
pub mod a004_object_class;
