//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Command results go to stdout so they can be consumed by scripts (`push`
//! prints `<from> <hash>` pairs). Diagnostics go to stderr through `tracing`,
//! with the level picked by [`Verbosity`].

use std::fmt::Display;

use tracing_subscriber::filter::LevelFilter;

/// Width of a column header in tabular output.
pub const COLUMN_WIDTH: usize = 40;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Warnings and errors only
    Normal,
    /// Progress of each step
    Info,
    /// Every git invocation
    Debug,
    /// Everything, including full error chains
    Trace,
}

impl Verbosity {
    /// Create verbosity from the number of `-v` flags.
    ///
    /// # Example
    ///
    /// ```
    /// use git_ghost::ui::output::Verbosity;
    ///
    /// assert_eq!(Verbosity::from_count(0), Verbosity::Normal);
    /// assert_eq!(Verbosity::from_count(2), Verbosity::Debug);
    /// assert_eq!(Verbosity::from_count(9), Verbosity::Trace);
    /// ```
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Normal,
            1 => Verbosity::Info,
            2 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    /// Log level filter for this verbosity.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Normal => LevelFilter::WARN,
            Verbosity::Info => LevelFilter::INFO,
            Verbosity::Debug => LevelFilter::DEBUG,
            Verbosity::Trace => LevelFilter::TRACE,
        }
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Left-aligned, fixed-width column headers joined by a space.
///
/// # Example
///
/// ```
/// use git_ghost::ui::output::format_header;
///
/// let header = format_header(&["From", "To"]);
/// assert!(header.starts_with("From "));
/// assert_eq!(header.len(), 40 + 1 + 40);
/// ```
pub fn format_header(labels: &[&str]) -> String {
    labels
        .iter()
        .map(|label| format!("{:<width$}", label, width = COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A table row: values joined by a single space.
pub fn format_row<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
