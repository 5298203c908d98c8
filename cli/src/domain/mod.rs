//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod bridge;
pub mod build;
pub mod config;
pub mod error;
pub mod network;
pub mod retry;

pub use build::{BuildCommand, BuildMode, BuildReport, StreamKind};
pub use config::{NetworkProfile, PusherConfig, Settings};
pub use error::{BridgeError, BuildError, Cancelled, ConfigError, NetworkError, ProfileError};
pub use network::{InterfaceAddress, RobotSubnet};
pub use retry::RetryPolicy;
