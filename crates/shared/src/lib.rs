//! Shared configuration for Shearbook.
//!
//! Layered application configuration (files + `SHEARBOOK__*` environment)
//! consumed by the server binaries and the database layer.

pub mod config;

pub use config::AppConfig;
