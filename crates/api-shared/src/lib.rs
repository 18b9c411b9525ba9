//! # API Shared
//!
//! Shared definitions for the ResQ APIs.
//!
//! Contains:
//! - Request/response bodies (`types` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` to serve and by `resq-cli` to decode responses.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
