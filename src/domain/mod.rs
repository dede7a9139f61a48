//! Domain layer containing catalog entities and logic.
//!
//! Defines entities, repository interfaces, and the pure formatting of course
//! associations, independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core catalog data structures
//! - [`repositories`] - Data access trait definitions
//! - [`formatting`] - Ordering and year/semester grouping of associations
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business rules live in services (see [`crate::application::services`])

pub mod entities;
pub mod formatting;
pub mod repositories;
