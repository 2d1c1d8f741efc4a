//! Locating and loading a manifest from the filesystem.

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{
    domain::Requirement,
    storage::modfile::{self, SyntaxError, MANIFEST_FILE_NAME},
};

/// Errors that can occur when turning a `-modfile` argument into a path.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The argument was empty.
    #[error("manifest path not provided")]
    NotProvided,

    /// The argument could not be inspected on the filesystem.
    #[error("could not stat {}", path.display())]
    CouldNotStat {
        /// The path that was probed.
        path: PathBuf,
        /// The underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// The argument exists but is neither a manifest file nor a directory.
    #[error("invalid manifest {}", path.display())]
    InvalidManifest {
        /// The offending path.
        path: PathBuf,
    },
}

/// Errors that can occur when loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The manifest file could not be read.
    #[error("failed to read manifest file")]
    Read(#[source] io::Error),

    /// The manifest file content is malformed.
    #[error("failed to parse manifest file")]
    Parse(#[source] SyntaxError),
}

/// Resolves a `-modfile` argument to the manifest path to read.
///
/// Arguments whose text ends in [`MANIFEST_FILE_NAME`] are used as given,
/// without touching the filesystem; a missing file is reported later, when
/// it is read. Any other argument must name an existing directory, and the
/// conventional file name is appended to it.
///
/// # Errors
///
/// - [`ResolveError::NotProvided`] if `raw` is empty
/// - [`ResolveError::CouldNotStat`] if `raw` cannot be inspected
/// - [`ResolveError::InvalidManifest`] if `raw` exists but is not a directory
#[instrument(level = "debug")]
pub fn resolve_path(raw: &str) -> Result<PathBuf, ResolveError> {
    if raw.is_empty() {
        return Err(ResolveError::NotProvided);
    }

    let path = PathBuf::from(raw);
    if raw.ends_with(MANIFEST_FILE_NAME) {
        return Ok(path);
    }

    let metadata = std::fs::metadata(&path).map_err(|source| ResolveError::CouldNotStat {
        path: path.clone(),
        source,
    })?;

    if !metadata.is_dir() {
        return Err(ResolveError::InvalidManifest { path });
    }

    let resolved = path.join(MANIFEST_FILE_NAME);
    tracing::debug!(path = %resolved.display(), "resolved manifest directory");
    Ok(resolved)
}

/// Reads and parses the manifest at `path`, returning its requirements in
/// manifest order.
///
/// # Errors
///
/// Returns [`LoadError::Read`] if the file cannot be read and
/// [`LoadError::Parse`] if its content is malformed.
#[instrument(level = "debug")]
pub fn load(path: &Path) -> Result<Vec<Requirement>, LoadError> {
    let data = std::fs::read(path).map_err(LoadError::Read)?;
    let modfile = modfile::parse(&path.display().to_string(), &data).map_err(LoadError::Parse)?;

    tracing::debug!(
        module = modfile.module().unwrap_or_default(),
        go = modfile.go_version().unwrap_or_default(),
        requires = modfile.requires().len(),
        "loaded manifest"
    );

    Ok(modfile.into_requires())
}
