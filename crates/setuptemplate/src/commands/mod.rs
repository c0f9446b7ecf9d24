//! Command implementations

pub mod at;
pub mod install;
