//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, Wi-Fi
//! tooling, the build supervisor, Gradle discovery and the config file.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod build_supervisor;
pub mod command_runner;
pub mod config;
pub mod gradle;
pub mod wifi;
