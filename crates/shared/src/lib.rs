//! Shared types, errors, and configuration for Propledger.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with decimal precision and the engine's rounding policy
//! - Typed IDs for type-safe entity references
//! - Error classification shared by the engine's error facades
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::ErrorClass;
