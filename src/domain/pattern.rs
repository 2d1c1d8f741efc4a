use std::{convert::Infallible, fmt, str::FromStr};

/// The marker that turns a pattern into a prefix match when it is the final
/// character.
pub const WILDCARD: char = '*';

/// A query pattern matched against requirement module paths.
///
/// A pattern ending in a single [`WILDCARD`] matches every path that starts
/// with the rest of the pattern. Any other pattern, including one with a
/// wildcard somewhere else, only matches a byte-identical path.
///
/// ```
/// use modwhat::Pattern;
///
/// let pattern: Pattern = "github.com/gorilla/*".parse().unwrap();
/// assert!(pattern.matches("github.com/gorilla/mux"));
/// assert!(!pattern.matches("github.com/gorilla"));
///
/// let exact = Pattern::new("github.com/gorilla/mux");
/// assert!(exact.matches("github.com/gorilla/mux"));
/// assert!(!exact.matches("github.com/gorilla/muxer"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    raw: String,
}

impl Pattern {
    /// Creates a pattern from the caller-supplied string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The pattern exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The prefix a wildcard pattern matches against, or `None` for an exact
    /// pattern.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.raw.strip_suffix(WILDCARD)
    }

    /// Whether this is a prefix (trailing wildcard) pattern.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.prefix().is_some()
    }

    /// Tests the pattern against a module path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        if self.raw == path {
            return true;
        }
        self.prefix().is_some_and(|prefix| path.starts_with(prefix))
    }
}

impl FromStr for Pattern {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for Pattern {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
