//! Rendering lookup hits to stdout.

use std::io::Write;

use anyhow::Context;
use modwhat::domain::Hit;
use serde::Serialize;

/// How hits are written.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum Format {
    /// One `<path> <version>` line per hit.
    #[default]
    Text,
    /// A single pretty-printed JSON array.
    Json,
}

#[derive(Serialize)]
struct JsonHit<'a> {
    path: &'a str,
    version: &'a str,
    indirect: bool,
}

/// Writes the hits in order.
///
/// With `only_version`, only the version of each hit is written.
pub fn render(
    w: &mut impl Write,
    hits: &[Hit<'_>],
    format: Format,
    only_version: bool,
) -> anyhow::Result<()> {
    match format {
        Format::Text => render_text(w, hits, only_version),
        Format::Json => render_json(w, hits, only_version),
    }
}

fn render_text(w: &mut impl Write, hits: &[Hit<'_>], only_version: bool) -> anyhow::Result<()> {
    for hit in hits {
        let requirement = hit.requirement;
        let written = if only_version {
            writeln!(w, "{}", requirement.version())
        } else {
            writeln!(w, "{requirement}")
        };
        written.context("failed to write match")?;
    }
    Ok(())
}

fn render_json(w: &mut impl Write, hits: &[Hit<'_>], only_version: bool) -> anyhow::Result<()> {
    let written = if only_version {
        let versions: Vec<&str> = hits.iter().map(|hit| hit.requirement.version()).collect();
        serde_json::to_writer_pretty(&mut *w, &versions)
    } else {
        let rows: Vec<JsonHit<'_>> = hits
            .iter()
            .map(|hit| JsonHit {
                path: hit.requirement.path(),
                version: hit.requirement.version(),
                indirect: hit.requirement.is_indirect(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut *w, &rows)
    };
    written.context("failed to render json output")?;
    writeln!(w).context("failed to render json output")?;
    Ok(())
}
