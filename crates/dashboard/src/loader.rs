//! Full-screen busy overlay.

use core::fmt;

/// Stateless overlay signalling that something is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Loader;

impl Loader {
    pub const LABEL: &'static str = "Loading...";

    /// Width of the rendered overlay, in columns.
    pub const WIDTH: usize = 48;
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bar = "#".repeat(Self::WIDTH);
        writeln!(f, "{bar}")?;
        writeln!(f, "#{:^width$}#", Self::LABEL, width = Self::WIDTH - 2)?;
        write!(f, "{bar}")
    }
}
