//! SWAPI Mirror Common Library
//!
//! Shared types and utilities for the SWAPI mirror workspace.
//!
//! # Overview
//!
//! - **Types**: the persisted person entity and the per-id fetch outcome
//! - **Logging**: tracing subscriber setup shared by every binary
//!
//! # Example
//!
//! ```no_run
//! use mirror_common::types::{FetchResult, PersonRecord};
//!
//! let record = PersonRecord {
//!     name: "Luke Skywalker".to_string(),
//!     ..Default::default()
//! };
//! let fetched = FetchResult::Found(record);
//! assert!(!fetched.is_not_found());
//! ```
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod logging;
pub mod types;

// Re-export commonly used types
pub use types::{FetchResult, PersonRecord, PersonRow};
