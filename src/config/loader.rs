//! Loading raw configuration from memory or from disk.

use super::LoadError;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default configuration file looked up inside a directory.
pub const CONFIG_FILE_NAME: &str = "package.json";

/// Unvalidated configuration mapping. Unknown keys are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RawConfig(Value);

impl RawConfig {
    /// Wraps a parsed value; the root must be a mapping.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        Self::checked(value, "inline configuration")
    }

    fn checked(value: Value, origin: &str) -> Result<Self, LoadError> {
        if value.is_object() {
            Ok(Self(value))
        } else {
            Err(LoadError::NotAMapping {
                origin: origin.to_string(),
            })
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Where the raw configuration comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Already-parsed configuration object.
    Inline(Value),
    /// Path to a config file, or to a directory holding `package.json`.
    File(PathBuf),
}

/// A loaded configuration and the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub raw: RawConfig,
    pub working_dir: PathBuf,
    /// File the configuration was read from, if any.
    pub origin: Option<PathBuf>,
}

impl ConfigSource {
    /// Loads the configuration.
    ///
    /// The working directory is `working_dir` when given, otherwise the
    /// directory containing the config file, otherwise the process directory.
    pub fn load(self, working_dir: Option<&Path>) -> Result<LoadedConfig, LoadError> {
        match self {
            ConfigSource::Inline(value) => {
                let working_dir = match working_dir {
                    Some(dir) => dir.to_path_buf(),
                    None => std::env::current_dir().map_err(|source| LoadError::WorkingDir {
                        path: PathBuf::from("."),
                        source,
                    })?,
                };
                Ok(LoadedConfig {
                    raw: RawConfig::from_value(value)?,
                    working_dir,
                    origin: None,
                })
            }
            ConfigSource::File(path) => {
                let path = config_file_path(&path)?;
                let raw = load_file(&path)?;
                let working_dir = match working_dir {
                    Some(dir) => dir.to_path_buf(),
                    None => path
                        .parent()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| PathBuf::from(".")),
                };
                Ok(LoadedConfig {
                    raw,
                    working_dir,
                    origin: Some(path),
                })
            }
        }
    }
}

/// Absolute path of the config file named by `path`.
fn config_file_path(path: &Path) -> Result<PathBuf, LoadError> {
    let absolute = super::paths::absolute_dir(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = if absolute.is_dir() {
        absolute.join(CONFIG_FILE_NAME)
    } else {
        absolute
    };
    if !file.exists() {
        return Err(LoadError::NotFound { path: file });
    }
    Ok(file)
}

/// Reads and parses a config file. `.toml` files are TOML, anything else JSON.
pub fn load_file(path: &Path) -> Result<RawConfig, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    let value = if is_toml {
        let table: toml::Table = toml::from_str(&contents).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::to_value(table).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
    } else {
        serde_json::from_str(&contents).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
    };

    log::debug!("Loaded configuration from {}", path.display());
    RawConfig::checked(value, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_mapping_roots() {
        let err = RawConfig::from_value(json!(["not", "a", "map"])).unwrap_err();
        assert!(matches!(err, LoadError::NotAMapping { .. }));
    }

    #[test]
    fn directory_source_reads_package_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "name": "MyApp", "pakager": { "mac": { "binary": "bin/app" } } }"#,
        )
        .unwrap();

        let loaded = ConfigSource::File(dir.path().to_path_buf())
            .load(None)
            .unwrap();
        assert_eq!(loaded.raw.as_value()["name"], json!("MyApp"));
        assert_eq!(
            loaded.working_dir.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn toml_files_are_supported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pakager.toml");
        std::fs::write(
            &path,
            "name = \"MyApp\"\n\n[pakager.mac]\nformats = [\"app\", \"zip\"]\n",
        )
        .unwrap();

        let raw = load_file(&path).unwrap();
        assert_eq!(raw.as_value()["pakager"]["mac"]["formats"], json!(["app", "zip"]));
    }

    #[test]
    fn load_faults_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ConfigSource::File(dir.path().join("nope.json")).load(None);
        assert!(matches!(missing, Err(LoadError::NotFound { .. })));

        let broken = dir.path().join("package.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(load_file(&broken), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn explicit_working_dir_wins() {
        let loaded = ConfigSource::Inline(json!({ "name": "x" }))
            .load(Some(Path::new("/tmp/elsewhere")))
            .unwrap();
        assert_eq!(loaded.working_dir, PathBuf::from("/tmp/elsewhere"));
        assert!(loaded.origin.is_none());
    }
}
