//! Command line interface for pakager.
//!
//! Loads the configuration, resolves it, reports every error and warning,
//! and hands valid settings to the bundler.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::Bundler;
use crate::config::{ConfigResolver, ConfigSource, ResolveError, Schema, ViolationReport};
use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await
}

/// Runs the CLI with already-parsed arguments and returns the exit code.
pub async fn execute(args: &Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let runtime = RuntimeConfig::from(args);
    let output = runtime.output();

    runtime.verbose_println(&format!("pakager {}", env!("CARGO_PKG_VERSION")))?;

    let loaded = ConfigSource::File(args.config.clone()).load(args.working_dir.as_deref())?;
    if let Some(origin) = &loaded.origin {
        runtime.verbose_println(&format!("Located config ({})", origin.display()))?;
    }

    let schema = Schema::pakager()?;
    let resolution = match ConfigResolver::new(&schema).resolve(&loaded.raw, &loaded.working_dir)
    {
        Ok(resolution) => resolution,
        Err(ResolveError::Invalid(report)) => {
            output.error(&format!(
                "Invalid config:\n{}",
                ViolationReport::render_list(report.errors())
            ))?;
            if !report.warnings().is_empty() {
                output.warn(&format!(
                    "Warnings:\n{}",
                    ViolationReport::render_list(report.warnings())
                ))?;
            }
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    for warning in &resolution.warnings {
        runtime.warn(&warning.to_string())?;
    }

    if args.check {
        let json = serde_json::to_string_pretty(resolution.config.tree())?;
        println!("{json}");
        return Ok(0);
    }

    let settings = resolution.config.into_settings();
    runtime.progress(&format!(
        "Bundling {} {} ({})",
        settings.real_name, settings.version, settings.app_id
    ))?;

    let artifacts = Bundler::new(settings).bundle().await?;
    for artifact in &artifacts {
        runtime.success(&format!(
            "Created {} ({})",
            artifact.path.display(),
            artifact.format
        ))?;
        runtime.indent(&format!("sha256 {}  {} bytes", artifact.checksum, artifact.size))?;
    }

    Ok(0)
}
