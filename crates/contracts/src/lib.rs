//! Wire types shared between the MES console and its REST back end.

pub mod domain;
pub mod system;
