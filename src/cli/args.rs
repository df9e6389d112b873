//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation
//! of argument combinations before any configuration is loaded.

use clap::Parser;
use std::path::PathBuf;

/// Package a compiled macOS binary into an application bundle
#[derive(Parser, Debug)]
#[command(
    name = "pakager",
    version,
    about = "Package a compiled macOS binary into an .app bundle, .dmg, .zip, or .tar.gz",
    long_about = "Packages a compiled macOS binary into a distributable application bundle.

Reads the `pakager` section of package.json (or a TOML file), resolves defaults,
validates every field, and builds the requested formats into the output directory.

Usage:
  pakager                         # ./package.json
  pakager path/to/project         # path/to/project/package.json
  pakager pakager.toml --check    # validate and print the resolved configuration

Exit code 0 = configuration valid and every requested artifact created."
)]
pub struct Args {
    /// Config file, or a directory containing package.json
    #[arg(value_name = "CONFIG", default_value = "package.json")]
    pub config: PathBuf,

    /// Directory that relative paths resolve against
    ///
    /// Defaults to the directory containing the config file.
    #[arg(short = 'C', long, value_name = "DIR", env = "PAKAGER_WORKING_DIR")]
    pub working_dir: Option<PathBuf>,

    /// Resolve and validate only; print the resolved configuration as JSON
    #[arg(long)]
    pub check: bool,

    /// Print the config location and version details
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors and warnings
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.config.as_os_str().is_empty() {
            return Err("Config path cannot be empty".to_string());
        }
        if let Some(dir) = &self.working_dir {
            if !dir.is_dir() {
                return Err(format!(
                    "Working directory does not exist: {}",
                    dir.display()
                ));
            }
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print progress message if not in quiet mode
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print indented text if not in quiet mode
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_package_json() {
        let args = Args::try_parse_from(["pakager"]).unwrap();
        assert_eq!(args.config, PathBuf::from("package.json"));
        assert!(!args.check);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["pakager", "-v", "-q"]).is_err());
        let args = Args::try_parse_from(["pakager", "--verbose"]).unwrap();
        assert!(args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn rejects_missing_working_dir() {
        let args =
            Args::try_parse_from(["pakager", "app.json", "-C", "/definitely/not/here"]).unwrap();
        assert!(args.validate().unwrap_err().contains("does not exist"));
    }
}
