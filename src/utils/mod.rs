//! Utility functions shared across the application.
//!
//! - [`code_generator`] - Access code and course uuid generation

pub mod code_generator;
