//! Command implementations

pub mod connect;
pub mod disconnect;
pub mod exit;
pub mod prepare;
pub mod profile;
pub mod push;
pub mod status;
pub mod threads;
pub mod version;
