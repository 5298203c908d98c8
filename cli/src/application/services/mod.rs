//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod associator;
pub mod bridge;
pub mod deploy;
pub mod network;
pub mod profile_service;
pub mod wait;

#[cfg(test)]
pub(crate) mod test_support;
