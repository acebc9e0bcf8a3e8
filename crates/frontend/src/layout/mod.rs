pub mod global_context;
pub mod notice_bar;
