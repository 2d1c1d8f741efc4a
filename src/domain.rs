//! Domain models for dependency lookup.
//!
//! This module contains the requirement records read from a manifest, the
//! query patterns supplied by the caller, and the result of matching one
//! against the other.

/// Requirement records declared by a manifest.
pub mod requirement;
pub use requirement::{EmptyFieldError, Requirement};

/// Query patterns and the matching rule.
pub mod pattern;
pub use pattern::Pattern;

mod lookup;
pub use lookup::{Hit, Lookup};
