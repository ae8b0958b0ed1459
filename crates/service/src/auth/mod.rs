//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Centralizes registration, login, and logout (credential revocation)
//! business logic under the service crate.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
