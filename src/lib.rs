//! Dependency version lookup for Go module manifests
//!
//! Reads a `go.mod` file and reports the versions of the modules it requires,
//! matched by exact path or by a trailing-`*` prefix pattern.

pub mod domain;
pub use domain::{Lookup, Pattern, Requirement};

/// Manifest location, reading and parsing.
pub mod storage;
pub use storage::{load, resolve_path, LoadError, ResolveError, MANIFEST_FILE_NAME};
