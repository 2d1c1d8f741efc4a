//! Colour support for diagnostics written to stderr

use owo_colors::{colors::css, OwoColorize};

/// Colours diagnostic text when the target stream supports it.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    /// A painter for stderr, enabled only when stderr supports colour.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            enabled: supports_color::on(supports_color::Stream::Stderr).is_some(),
        }
    }

    /// A painter that never colours.
    #[cfg(test)]
    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    /// Colour as error (red)
    #[must_use]
    pub fn error(&self, text: &str) -> String {
        if self.enabled {
            text.fg::<css::Red>().to_string()
        } else {
            text.to_string()
        }
    }

    /// Colour as warning (amber)
    #[must_use]
    pub fn warning(&self, text: &str) -> String {
        if self.enabled {
            text.fg::<css::Orange>().to_string()
        } else {
            text.to_string()
        }
    }
}
