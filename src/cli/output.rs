//! Colored terminal output.

use colored::Colorize;
use std::io::{self, Write};

/// Writes status lines to stdout and diagnostics to stderr.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

const SYMBOL: &str = "●";

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Informational detail, shown in verbose mode only.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose && !self.quiet {
            writeln!(io::stdout(), "{}", message.dimmed())?;
        }
        Ok(())
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout(), "{} {}", SYMBOL.blue(), message)?;
        }
        Ok(())
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout(), "{} {}", SYMBOL.green(), message)?;
        }
        Ok(())
    }

    /// Warnings are printed even in quiet mode.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        writeln!(io::stderr(), "{} {}", SYMBOL.yellow(), message)
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        writeln!(io::stderr(), "{} {}", SYMBOL.red(), message)
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout(), "  {message}")?;
        }
        Ok(())
    }
}
