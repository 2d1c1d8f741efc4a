pub mod manifest;
/// `go.mod` parsing on top of `gomod-rs`.
pub mod modfile;

pub use manifest::{load, resolve_path, LoadError, ResolveError};
pub use modfile::{parse, ModFile, SyntaxError, SyntaxErrorKind, MANIFEST_FILE_NAME};
