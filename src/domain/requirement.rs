use std::fmt;

use non_empty_string::NonEmptyString;

/// A single `require` entry declared by a manifest.
///
/// Requirements are immutable and are produced in the order they appear in
/// the manifest. The version is the literal string written in the manifest;
/// it is never normalised or compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    path: NonEmptyString,
    version: NonEmptyString,
    indirect: bool,
    line: usize,
}

impl Requirement {
    /// Creates a direct requirement with no source location.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyFieldError`] if either the path or the version is empty.
    pub fn new(path: String, version: String) -> Result<Self, EmptyFieldError> {
        let path = NonEmptyString::new(path).map_err(|_| EmptyFieldError::Path)?;
        let version = NonEmptyString::new(version).map_err(|_| EmptyFieldError::Version)?;
        Ok(Self {
            path,
            version,
            indirect: false,
            line: 0,
        })
    }

    /// Marks the requirement as indirect (`// indirect` in the manifest).
    #[must_use]
    pub fn with_indirect(mut self, indirect: bool) -> Self {
        self.indirect = indirect;
        self
    }

    /// Records the 1-based manifest line the requirement was declared on.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// The module path, e.g. `github.com/gorilla/mux`.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// The version string exactly as written in the manifest.
    #[must_use]
    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Whether the manifest marks this requirement as indirect.
    #[must_use]
    pub const fn is_indirect(&self) -> bool {
        self.indirect
    }

    /// The 1-based manifest line, or `0` if the requirement was built by hand.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.path, self.version)
    }
}

/// Error returned when a requirement is built from an empty field.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum EmptyFieldError {
    /// The module path was empty.
    #[error("module path must not be empty")]
    Path,
    /// The version was empty.
    #[error("version must not be empty")]
    Version,
}
