//! Configuration loading and resolution.
//!
//! A raw configuration (usually `package.json`) is loaded by [`ConfigSource`],
//! then resolved against the [`Schema`] by [`ConfigResolver`]. Resolution
//! fills in defaults in dependency order, makes paths absolute against the
//! working directory, checks them on disk, and collects every violation
//! before reporting.
//!
//! ```no_run
//! use pakager::config::{ConfigSource, Schema, resolve};
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loaded = ConfigSource::File(PathBuf::from("package.json")).load(None)?;
//! let schema = Schema::pakager()?;
//! let resolution = resolve(&loaded.raw, &loaded.working_dir, &schema)?;
//! println!("Bundling {}", resolution.config.settings().real_name);
//! # Ok(())
//! # }
//! ```

mod error;
mod field;
mod loader;
mod paths;
mod product;
mod resolver;
mod schema;
mod settings;
mod violation;

pub use error::{LoadError, ResolveError, SchemaError};
pub use field::FieldPath;
pub use loader::{CONFIG_FILE_NAME, ConfigSource, LoadedConfig, RawConfig, load_file};
pub use product::{APP_ID_PREFIX, DEFAULT_OUTPUT_DIR};
pub use resolver::{ConfigResolver, Resolution, resolve};
pub use schema::{
    ComputeFn, Constraint, DefaultRule, Dependencies, FieldKind, FieldSpec, GroupConstraint,
    Schema, SchemaNode,
};
pub use settings::{Format, MacSettings, PakagerSettings, ResolvedConfig};
pub use violation::{Violation, ViolationKind, ViolationReport};
