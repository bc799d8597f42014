//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the photo bridge:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! Other crates depend on this one for the bridge configuration and for the
//! logging conventions used throughout the workspace.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
