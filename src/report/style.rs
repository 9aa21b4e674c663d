//! Terminal colouring for the report.

const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Whether report fragments are wrapped in ANSI colour codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    color: bool,
}

impl Style {
    /// No escape codes at all.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Always colour.
    pub fn colored() -> Self {
        Self { color: true }
    }

    /// Colour when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        Self {
            color: colored::control::SHOULD_COLORIZE.should_colorize(),
        }
    }

    /// Labels (`Connected to`, `HTTP`).
    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    /// Values and timings.
    pub fn cyan(&self, s: &str) -> String {
        self.paint(CYAN, s)
    }

    /// 256-colour grayscale ramp, `level` in `0..24`.
    pub fn gray(&self, level: u8, s: &str) -> String {
        self.paint(&format!("\x1b[;38;5;{}m", 232 + level.min(23)), s)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}
