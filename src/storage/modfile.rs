//! Adapter over the [`gomod_rs`] parser for the `go.mod` manifest format
//!
//! ```text
//! module example.com/app
//!
//! go 1.22
//!
//! require (
//!     github.com/gorilla/mux v1.8.0
//!     golang.org/x/mod v0.17.0 // indirect
//! )
//! ```
//!
//! Only `require` entries are kept as [`Requirement`]s, together with the
//! `module`, `go` and `toolchain` header values. Version strings are never
//! validated.

use gomod_rs::{Context, Directive, Identifier, Location};

use crate::domain::{EmptyFieldError, Requirement};

/// The conventional manifest file name.
pub const MANIFEST_FILE_NAME: &str = "go.mod";

/// The contents of a parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModFile {
    module: Option<String>,
    go: Option<String>,
    toolchain: Option<String>,
    requires: Vec<Requirement>,
}

impl ModFile {
    /// The module path declared by the `module` directive.
    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// The language version declared by the `go` directive.
    #[must_use]
    pub fn go_version(&self) -> Option<&str> {
        self.go.as_deref()
    }

    /// The toolchain declared by the `toolchain` directive.
    #[must_use]
    pub fn toolchain(&self) -> Option<&str> {
        self.toolchain.as_deref()
    }

    /// The `require` entries, in manifest order.
    #[must_use]
    pub fn requires(&self) -> &[Requirement] {
        &self.requires
    }

    /// Consumes the manifest, returning its `require` entries.
    #[must_use]
    pub fn into_requires(self) -> Vec<Requirement> {
        self.requires
    }
}

/// A manifest syntax error, positioned at a line of a named file.
///
/// Renders as `<file>:<line>: <message>`.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{file}:{line}: {kind}")]
pub struct SyntaxError {
    file: String,
    line: usize,
    kind: SyntaxErrorKind,
}

impl SyntaxError {
    fn new(file: &str, line: usize, kind: SyntaxErrorKind) -> Self {
        Self {
            file: file.to_string(),
            line,
            kind,
        }
    }

    /// The file name the error refers to.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The 1-based line number of the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// What went wrong.
    #[must_use]
    pub const fn kind(&self) -> &SyntaxErrorKind {
        &self.kind
    }
}

/// The kinds of syntax error a manifest can contain.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// The file is not valid UTF-8.
    #[error("invalid UTF-8 encoding")]
    InvalidUtf8,

    /// The parser stopped before this line, which is not a well-formed
    /// directive.
    #[error("unexpected input: {0}")]
    Unexpected(String),

    /// A single-instance directive appeared more than once.
    #[error("repeated {0} statement")]
    Repeated(&'static str),

    /// A `require` entry has an empty field.
    #[error("invalid requirement: {0}")]
    Requirement(EmptyFieldError),
}

/// Parses manifest bytes into a [`ModFile`].
///
/// `file` is only used to label errors.
///
/// # Errors
///
/// Returns a [`SyntaxError`] naming the offending line if the content is not
/// a well-formed manifest.
pub fn parse(file: &str, data: &[u8]) -> Result<ModFile, SyntaxError> {
    let text = std::str::from_utf8(data).map_err(|e| {
        let line = line_at(&data[..e.valid_up_to()]);
        SyntaxError::new(file, line, SyntaxErrorKind::InvalidUtf8)
    })?;

    // A manifest with no directives at all fails to parse; that is only an
    // error if something other than comments is left over.
    let directives = gomod_rs::parse_gomod(text).or_else(|err| {
        let offset = match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => e.input.1,
            nom::Err::Incomplete(_) => 0,
        };
        let line_start = text
            .get(..offset)
            .and_then(|before| before.rfind('\n'))
            .map_or(0, |i| i + 1);
        ensure_consumed(file, text, line_start).map(|()| Vec::new())
    })?;

    // The parser stops quietly at the first directive it cannot read.
    let consumed = directives.last().map_or(0, |d| d.range.1.offset);
    ensure_consumed(file, text, consumed)?;

    let mut modfile = ModFile::default();
    for directive in directives {
        let line = line_number(&directive.range.0);
        let error = |kind| SyntaxError::new(file, line, kind);
        match directive.value {
            Directive::Module { module_path } => {
                set_once(&mut modfile.module, "module", module_path).map_err(error)?;
            }
            Directive::Go { version } => {
                set_once(&mut modfile.go, "go", &version).map_err(error)?;
            }
            Directive::Toolchain { name } => {
                set_once(&mut modfile.toolchain, "toolchain", &name).map_err(error)?;
            }
            Directive::Require { specs } => {
                for spec in specs {
                    modfile.requires.push(requirement(file, text, spec)?);
                }
            }
            Directive::Godebug { .. }
            | Directive::Replace { .. }
            | Directive::Exclude { .. }
            | Directive::Retract { .. } => {}
        }
    }

    Ok(modfile)
}

fn requirement(
    file: &str,
    text: &str,
    spec: Context<'_, (&str, Identifier<'_>)>,
) -> Result<Requirement, SyntaxError> {
    let line = line_number(&spec.range.0);
    let indirect = is_indirect(text, &spec);
    let (path, version) = spec.value;

    let requirement = Requirement::new(path.to_string(), version.to_string())
        .map_err(|e| SyntaxError::new(file, line, SyntaxErrorKind::Requirement(e)))?
        .with_indirect(indirect)
        .with_line(line);
    tracing::trace!(%requirement, line, indirect, "parsed requirement");
    Ok(requirement)
}

/// Whether the entry's own trailing comment reads `indirect` or
/// `indirect; ...`. Comments on the lines above the entry do not count.
fn is_indirect(text: &str, spec: &Context<'_, (&str, Identifier<'_>)>) -> bool {
    let source = text
        .get(spec.range.0.offset..spec.range.1.offset)
        .unwrap_or_default()
        .trim_end_matches('\n');
    spec.comments
        .last()
        .filter(|comment| {
            source
                .strip_suffix(**comment)
                .is_some_and(|rest| rest.ends_with("//"))
        })
        .is_some_and(|comment| {
            let comment = comment.trim();
            comment == "indirect" || comment.starts_with("indirect;")
        })
}

/// Fails on the first line from `offset` onwards that is neither blank nor a
/// comment.
fn ensure_consumed(file: &str, text: &str, offset: usize) -> Result<(), SyntaxError> {
    let (before, rest) = text.split_at_checked(offset).unwrap_or((text, ""));
    let first = line_at(before.as_bytes());

    rest.lines()
        .zip(first..)
        .map(|(content, line)| (content.trim(), line))
        .find(|(content, _)| !content.is_empty() && !content.starts_with("//"))
        .map_or(Ok(()), |(content, line)| {
            Err(SyntaxError::new(
                file,
                line,
                SyntaxErrorKind::Unexpected(content.to_string()),
            ))
        })
}

fn line_number(location: &Location) -> usize {
    usize::try_from(location.line).unwrap_or(usize::MAX)
}

/// The 1-based line number of the position just past `before`.
fn line_at(before: &[u8]) -> usize {
    before.iter().filter(|&&b| b == b'\n').count() + 1
}

fn set_once(
    slot: &mut Option<String>,
    name: &'static str,
    value: &str,
) -> Result<(), SyntaxErrorKind> {
    if slot.is_some() {
        return Err(SyntaxErrorKind::Repeated(name));
    }
    *slot = Some(value.to_string());
    Ok(())
}
