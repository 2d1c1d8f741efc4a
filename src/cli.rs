use std::{
    error::Error as _,
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
};

mod output;
mod terminal;

use clap::{ArgAction, CommandFactory, Parser};
use modwhat::{LoadError, Lookup, Pattern, ResolveError};
use output::Format;
use terminal::Painter;
use tracing::instrument;

const HELP_TEMPLATE: &str = "
NAME
  {name} - {about}

SYNOPSIS
  {usage}

OPTIONS
{options}
{after-help}";

const EXAMPLES: &str = "EXAMPLES
  To get the version of a package:
      $ go-mod-what github.com/gorilla/mux
      github.com/gorilla/mux v1.8.0

  To get the version of multiple packages:
      $ go-mod-what github.com/gorilla/mux github.com/gorilla/schema
      github.com/gorilla/mux v1.8.0
      github.com/gorilla/schema v1.2.0

  To get the version of multiple packages with a wildcard:
      $ go-mod-what 'github.com/gorilla/*'
      github.com/gorilla/mux v1.8.0
      github.com/gorilla/schema v1.2.0

  To get the version of a package with a custom go.mod file path:
      $ go-mod-what -modfile ../go.mod github.com/gorilla/mux
      github.com/gorilla/mux v1.8.0

  To get the version of a package with only the version:
      $ go-mod-what -only-version github.com/gorilla/mux
      v1.8.0
";

/// Long flags that may be written Go-style, with a single leading dash.
const LONG_FLAGS: &[&str] = &["modfile", "help", "version", "only-version", "json", "verbose"];

/// Flags that consume the following argument as their value.
const VALUE_FLAGS: &[&str] = &["modfile"];

#[derive(Debug, Parser)]
#[allow(clippy::struct_excessive_bools)]
#[command(
    name = "go-mod-what",
    about = "get the version of a package in a go.mod file",
    override_usage = "go-mod-what [options] <package> [<package> ...]",
    help_template = HELP_TEMPLATE,
    after_help = EXAMPLES,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// path to go.mod file, or the directory containing it
    #[arg(long, default_value = "./go.mod", value_name = "path")]
    modfile: String,

    /// show help
    #[arg(short, long)]
    help: bool,

    /// show version
    #[arg(long)]
    version: bool,

    /// only print the version
    #[arg(long)]
    only_version: bool,

    /// print matches as a JSON array
    #[arg(long)]
    json: bool,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// module paths to look up; a trailing '*' matches by prefix
    #[arg(value_name = "package")]
    packages: Vec<String>,
}

/// What a parsed command line asks for.
#[derive(Debug)]
pub enum Action {
    /// Print the usage text.
    Help,
    /// Print the tool version.
    Version,
    /// Look up packages in a manifest.
    Lookup(Config),
}

/// A validated lookup request.
#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    manifest: PathBuf,
    patterns: Vec<Pattern>,
    only_version: bool,
    format: Format,
}

/// Errors that end an invocation with a failure status.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command line could not be parsed.
    #[error(transparent)]
    Args(#[from] clap::Error),

    /// No package patterns were given.
    #[error("no package provided")]
    NoPackage,

    /// The `-modfile` argument could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The manifest could not be read or parsed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Some patterns matched nothing.
    #[error("{} package(s) not found", .0.len())]
    NotFound(Vec<Pattern>),

    /// Matches could not be written to stdout.
    #[error(transparent)]
    Output(#[from] anyhow::Error),
}

impl Error {
    /// Whether the usage text should follow the message.
    const fn shows_usage(&self) -> bool {
        matches!(self, Self::NoPackage | Self::Resolve(ResolveError::NotProvided))
    }

    /// Writes the error report for this failure to stderr.
    pub fn report(&self) {
        let painter = Painter::stderr();
        // Nothing useful can be done if stderr itself is gone.
        let _ = self.report_to(&mut io::stderr().lock(), &painter);
    }

    fn report_to(&self, w: &mut impl Write, painter: &Painter) -> io::Result<()> {
        match self {
            Self::NotFound(missing) => {
                for pattern in missing {
                    writeln!(w, "{}", painter.warning(&format!("{pattern} not found")))?;
                }
                Ok(())
            }
            Self::Args(err) => write!(w, "{}", err.render()),
            _ => {
                let message = self
                    .source()
                    .map_or_else(|| self.to_string(), |source| format!("{self}: {source}"));
                write!(w, "{}\n\n", painter.error(&message))?;
                if self.shows_usage() {
                    write!(w, "{}", usage())?;
                }
                Ok(())
            }
        }
    }
}

/// Renders the full usage text, including examples.
#[must_use]
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

impl Cli {
    /// Parses command-line arguments, accepting Go-style single-dash long
    /// flags (`-modfile x`, `-only-version`) alongside the usual `--` form.
    ///
    /// Flag parsing stops at the first positional argument, so everything
    /// after it is treated as a package pattern.
    ///
    /// # Errors
    ///
    /// Returns a [`clap::Error`] for unknown flags or missing flag values.
    pub fn try_parse_go_style<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// Runs the invocation.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] for any failure, including patterns that matched
    /// nothing. Matches are written to stdout before that error is returned.
    pub fn run(self) -> Result<(), Error> {
        Self::setup_logging(self.verbose);

        match self.into_action()? {
            Action::Help => print!("{}", usage()),
            Action::Version => println!("v{}", env!("CARGO_PKG_VERSION")),
            Action::Lookup(config) => config.run()?,
        }
        Ok(())
    }

    /// Validates the parsed arguments and resolves the manifest path.
    ///
    /// `-help` and `-version` short-circuit every other check.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolve`] for an empty or unusable `-modfile` and
    /// [`Error::NoPackage`] when no patterns were given.
    pub fn into_action(self) -> Result<Action, Error> {
        if self.help {
            return Ok(Action::Help);
        }
        if self.version {
            return Ok(Action::Version);
        }
        if self.modfile.is_empty() {
            return Err(ResolveError::NotProvided.into());
        }
        if self.packages.is_empty() {
            return Err(Error::NoPackage);
        }

        let manifest = modwhat::resolve_path(&self.modfile)?;

        Ok(Action::Lookup(Config {
            manifest,
            patterns: self.packages.into_iter().map(Pattern::from).collect(),
            only_version: self.only_version,
            format: if self.json { Format::Json } else { Format::Text },
        }))
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout carries the lookup results, so logs go to stderr.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

impl Config {
    #[instrument(skip(self), fields(manifest = %self.manifest.display()))]
    fn run(self) -> Result<(), Error> {
        let requirements = modwhat::load(&self.manifest)?;
        tracing::info!(count = requirements.len(), "loaded requirements");

        let lookup = Lookup::run(&requirements, &self.patterns);
        output::render(
            &mut io::stdout().lock(),
            lookup.hits(),
            self.format,
            self.only_version,
        )?;

        let missing: Vec<Pattern> = lookup.missing().cloned().collect();
        if !missing.is_empty() {
            return Err(Error::NotFound(missing));
        }
        Ok(())
    }
}

/// Rewrites Go-style flags into the form clap expects.
///
/// A single-dash known long flag becomes a double-dash one, and a `--`
/// separator is inserted before the first positional argument so that later
/// arguments are never read as flags.
fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut out: Vec<OsString> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };

        if text == "--" {
            out.push(arg);
            break;
        }
        if text == "-" || !text.starts_with('-') {
            out.push("--".into());
            out.push(arg);
            break;
        }

        let body = text.strip_prefix("--").unwrap_or(&text[1..]);
        let name = body.split_once('=').map_or(body, |(name, _)| name);

        if !LONG_FLAGS.contains(&name) {
            out.push(arg);
            continue;
        }

        let mut flag = OsString::from(format!("--{body}"));
        // A separate value is joined to its flag so that one starting with
        // `-` is never taken for a flag.
        if VALUE_FLAGS.contains(&body) {
            if let Some(value) = args.next() {
                flag.push("=");
                flag.push(value);
            }
        }
        out.push(flag);
    }

    out.extend(args);
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;
    use test_case::test_case;

    use super::*;

    fn normalized(args: &[&str]) -> Vec<String> {
        normalize_args(std::iter::once("go-mod-what").chain(args.iter().copied()))
            .into_iter()
            .skip(1)
            .map(|a| a.into_string().unwrap())
            .collect()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_go_style(std::iter::once("go-mod-what").chain(args.iter().copied()))
            .unwrap()
    }

    fn lookup(args: &[&str]) -> Config {
        match parse(args).into_action().unwrap() {
            Action::Lookup(config) => config,
            other => panic!("expected a lookup, got {other:?}"),
        }
    }

    fn manifest_dir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("go.mod"),
            "module example.com/app\n\nrequire github.com/gorilla/mux v1.8.0\n",
        )
        .unwrap();
        tmp
    }

    #[test_case(&["-modfile", "x/go.mod", "a"], &["--modfile=x/go.mod", "--", "a"]; "single dash with value")]
    #[test_case(&["--modfile", "x/go.mod", "a"], &["--modfile=x/go.mod", "--", "a"]; "double dash with value")]
    #[test_case(&["-modfile", "-dir/go.mod", "a"], &["--modfile=-dir/go.mod", "--", "a"]; "value starting with a dash")]
    #[test_case(&["-modfile", "", "a"], &["--modfile=", "--", "a"]; "empty value")]
    #[test_case(&["-modfile=x/go.mod", "a"], &["--modfile=x/go.mod", "--", "a"]; "inline value")]
    #[test_case(&["-only-version", "a"], &["--only-version", "--", "a"]; "boolean flag")]
    #[test_case(&["-h"], &["-h"]; "short help untouched")]
    #[test_case(&["-vv", "a"], &["-vv", "--", "a"]; "short verbosity untouched")]
    #[test_case(&["a", "-json"], &["--", "a", "-json"]; "flags after a package are packages")]
    #[test_case(&["--", "-json"], &["--", "-json"]; "explicit separator")]
    #[test_case(&["-bogus", "a"], &["-bogus", "--", "a"]; "unknown flag left for clap")]
    fn normalizes_go_style_flags(args: &[&str], expected: &[&str]) {
        assert_eq!(normalized(args), expected);
    }

    #[test]
    fn defaults() {
        let cli = parse(&["github.com/gorilla/mux"]);
        assert_eq!(cli.modfile, "./go.mod");
        assert!(!cli.help);
        assert!(!cli.version);
        assert!(!cli.only_version);
        assert!(!cli.json);
        assert_eq!(cli.packages, ["github.com/gorilla/mux"]);
    }

    #[test]
    fn modfile_value_may_start_with_a_dash() {
        let cli = parse(&["-modfile", "-dir/go.mod", "-json", "a"]);
        assert_eq!(cli.modfile, "-dir/go.mod");
        assert!(cli.json);
        assert_eq!(cli.packages, ["a"]);
    }

    #[test]
    fn help_short_circuits_missing_packages() {
        assert!(matches!(parse(&["-help"]).into_action(), Ok(Action::Help)));
        assert!(matches!(
            parse(&["-modfile", "", "-help"]).into_action(),
            Ok(Action::Help)
        ));
    }

    #[test]
    fn version_short_circuits_missing_packages() {
        assert!(matches!(
            parse(&["-version"]).into_action(),
            Ok(Action::Version)
        ));
    }

    #[test]
    fn empty_modfile_is_a_usage_error() {
        let err = parse(&["-modfile", "", "a"]).into_action().unwrap_err();
        assert!(matches!(err, Error::Resolve(ResolveError::NotProvided)));
        assert!(err.shows_usage());
    }

    #[test]
    fn missing_packages_is_a_usage_error() {
        let err = parse(&["-modfile", "go.mod"]).into_action().unwrap_err();
        assert!(matches!(err, Error::NoPackage));
        assert!(err.shows_usage());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let args = ["go-mod-what", "-bogus", "a"];
        assert!(Cli::try_parse_go_style(args).is_err());
    }

    #[test]
    fn modfile_without_value_is_rejected() {
        let args = ["go-mod-what", "-modfile"];
        assert!(Cli::try_parse_go_style(args).is_err());
    }

    #[test]
    fn lookup_config_collects_patterns_and_flags() {
        let config = lookup(&["-modfile", "a/go.mod", "-only-version", "-json", "x", "y/*"]);
        assert_eq!(
            config,
            Config {
                manifest: PathBuf::from("a/go.mod"),
                patterns: vec![Pattern::new("x"), Pattern::new("y/*")],
                only_version: true,
                format: Format::Json,
            }
        );
    }

    #[test]
    fn directory_modfile_is_resolved() {
        let tmp = manifest_dir();
        let config = lookup(&["-modfile", tmp.path().to_str().unwrap(), "a"]);
        assert_eq!(config.manifest, tmp.path().join("go.mod"));
    }

    #[test]
    fn unstattable_modfile_is_reported() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let err = parse(&["-modfile", missing.to_str().unwrap(), "a"])
            .into_action()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Resolve(ResolveError::CouldNotStat { .. })
        ));
        assert!(!err.shows_usage());
    }

    #[test]
    fn config_run_reports_missing_patterns() {
        let tmp = manifest_dir();
        let config = Config {
            manifest: tmp.path().join("go.mod"),
            patterns: vec![Pattern::new("github.com/gorilla/*"), Pattern::new("nope")],
            only_version: false,
            format: Format::Text,
        };
        let Err(Error::NotFound(missing)) = config.run() else {
            panic!("expected unmatched patterns");
        };
        assert_eq!(missing, [Pattern::new("nope")]);
    }

    fn report(err: &Error) -> String {
        let mut out = Vec::new();
        err.report_to(&mut out, &Painter::plain()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn report_without_source() {
        let text = report(&Error::NoPackage);
        assert!(text.starts_with("no package provided\n\n"));
        assert!(text.contains("NAME"));
        assert!(text.contains("SYNOPSIS"));
        assert!(text.contains("EXAMPLES"));
    }

    #[test]
    fn report_with_source() {
        let err = Error::from(modwhat::load(Path::new("does/not/exist/go.mod")).unwrap_err());
        let text = report(&err);
        assert!(text.starts_with("failed to read manifest file: "));
        assert!(text.ends_with("\n\n"));
        assert!(!text.contains("SYNOPSIS"));
    }

    #[test]
    fn report_for_not_found_lists_each_pattern() {
        let err = Error::NotFound(vec![Pattern::new("a/*"), Pattern::new("b")]);
        assert_eq!(err.to_string(), "2 package(s) not found");
        assert_eq!(report(&err), "a/* not found\nb not found\n");
    }

    #[test]
    fn usage_lists_every_option() {
        let text = usage();
        for flag in ["--modfile", "--help", "--version", "--only-version", "--json", "--verbose"] {
            assert!(text.contains(flag), "usage is missing {flag}");
        }
        assert!(text.contains("go-mod-what [options] <package> [<package> ...]"));
    }
}
