//! # bosun-common
//!
//! Shared types for the Bosun service lifecycle layer.
//!
//! This crate provides functionality used across the Bosun crates:
//! - The workspace-wide error type and result alias
//! - Validated service names
//! - Runtime container names and their display form

#![warn(missing_docs)]

pub mod error;
pub mod name;

pub use error::{BosunError, BosunResult};
pub use name::{ContainerName, ServiceName};
