pub mod entity_list;
pub mod home;
pub mod login;
pub mod record_detail;
pub mod register;
