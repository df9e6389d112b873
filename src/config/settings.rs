//! Typed view of a resolved configuration.
//!
//! [`ResolvedConfig`] keeps the resolved JSON tree (including unknown keys)
//! next to the [`PakagerSettings`] the bundler consumes.

use super::{FieldPath, field};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Output format requested in `pakager.mac.formats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "app")]
    App,
    #[serde(rename = "dmg")]
    Dmg,
    #[serde(rename = "zip")]
    Zip,
    #[serde(rename = "tar.gz")]
    TarGz,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::App, Format::Dmg, Format::Zip, Format::TarGz];

    pub fn as_str(self) -> &'static str {
        match self {
            Format::App => "app",
            Format::Dmg => "dmg",
            Format::Zip => "zip",
            Format::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved `pakager` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PakagerSettings {
    pub name: String,
    pub version: String,
    pub author: String,
    /// Display and executable name of the bundle.
    pub real_name: String,
    /// CFBundleIdentifier.
    pub app_id: String,
    #[serde(default)]
    pub copyright: Option<String>,
    /// Absolute output directory.
    pub output_dir: PathBuf,
    pub background_app: bool,
    pub mac: MacSettings,
}

/// Resolved `pakager.mac` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacSettings {
    /// Absolute path to an existing executable file.
    pub binary: PathBuf,
    #[serde(default)]
    pub category: Option<String>,
    /// Absolute path to an existing `.png` or `.icns` file.
    #[serde(default)]
    pub icon: Option<PathBuf>,
    pub formats: Vec<Format>,
    pub background_app: bool,
    pub dark_mode_support: bool,
    /// Extra Info.plist entries, merged verbatim.
    #[serde(default)]
    pub custom_info: Map<String, Value>,
}

impl MacSettings {
    pub fn wants(&self, format: Format) -> bool {
        self.formats.contains(&format)
    }
}

/// Fully resolved configuration tree plus its typed settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    tree: Value,
    settings: PakagerSettings,
}

impl ResolvedConfig {
    pub(crate) fn from_tree(tree: Value) -> Result<Self, serde_json::Error> {
        let section = tree.get("pakager").cloned().unwrap_or(Value::Null);
        let settings = serde_json::from_value(section)?;
        Ok(Self { tree, settings })
    }

    /// The resolved tree, mirroring the schema.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Resolved value at `path`, if present.
    pub fn get(&self, path: &str) -> Option<&Value> {
        field::lookup(&self.tree, &FieldPath::parse(path))
    }

    pub fn settings(&self) -> &PakagerSettings {
        &self.settings
    }

    pub fn into_settings(self) -> PakagerSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_names_round_trip_through_serde() {
        let formats: Vec<Format> = serde_json::from_value(json!(["app", "tar.gz"])).unwrap();
        assert_eq!(formats, vec![Format::App, Format::TarGz]);
        assert_eq!(Format::TarGz.to_string(), "tar.gz");
        assert!(serde_json::from_value::<Format>(json!("DMG")).is_err());
    }

    #[test]
    fn typed_view_reads_camel_case_tree() {
        let tree = json!({
            "name": "MyApp",
            "pakager": {
                "name": "MyApp",
                "version": "1.0.0",
                "author": "Jane",
                "realName": "MyApp",
                "appId": "com.pakager.MyApp",
                "copyright": "Copyright © 2024 Jane",
                "outputDir": "/work/dist",
                "backgroundApp": false,
                "mac": {
                    "binary": "/work/bin/myapp",
                    "formats": ["app", "zip"],
                    "backgroundApp": false,
                    "darkModeSupport": true,
                    "customInfo": { "NSHighResolutionCapable": true }
                }
            }
        });

        let config = ResolvedConfig::from_tree(tree).unwrap();
        let settings = config.settings();
        assert_eq!(settings.real_name, "MyApp");
        assert_eq!(settings.output_dir, PathBuf::from("/work/dist"));
        assert!(settings.mac.wants(Format::Zip));
        assert!(!settings.mac.wants(Format::Dmg));
        assert_eq!(settings.mac.icon, None);
        assert_eq!(config.get("pakager.appId"), Some(&json!("com.pakager.MyApp")));
    }
}
