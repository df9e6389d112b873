//! macOS `.app` bundle assembly.
//!
//! Layout produced:
//!
//! ```text
//! <realName>.app/
//!   Contents/
//!     Info.plist
//!     PkgInfo
//!     MacOS/<realName>
//!     Resources/app.icns   (when an icon is configured)
//! ```

use super::icon::{ICON_FILE_NAME, install_icon};
use super::info_plist;
use crate::bundler::{Result, error::ErrorExt, utils::fs};
use crate::config::PakagerSettings;
use std::path::{Path, PathBuf};

/// Assembles `<realName>.app` inside `dest_dir`, replacing an earlier bundle.
pub async fn bundle_app(settings: &PakagerSettings, dest_dir: &Path) -> Result<PathBuf> {
    let app_path = dest_dir.join(format!("{}.app", settings.real_name));
    log::info!("Creating {}", app_path.display());

    fs::replace_bundle_dir(&app_path).await?;

    let contents = app_path.join("Contents");
    let macos_dir = contents.join("MacOS");
    let resources_dir = contents.join("Resources");
    fs::create_dir_all(&macos_dir).await?;
    fs::create_dir_all(&resources_dir).await?;

    let executable = macos_dir.join(&settings.real_name);
    fs::copy_file(&settings.mac.binary, &executable).await?;
    fs::set_executable(&executable).await?;

    let icon_file = match &settings.mac.icon {
        Some(icon) => {
            install_icon(icon, &resources_dir.join(ICON_FILE_NAME)).await?;
            Some(ICON_FILE_NAME)
        }
        None => None,
    };

    let plist_path = contents.join("Info.plist");
    let xml = info_plist::to_xml(info_plist::info_plist(settings, icon_file))?;
    tokio::fs::write(&plist_path, xml)
        .await
        .fs_context("failed to write", &plist_path)?;

    let pkg_info = contents.join("PkgInfo");
    tokio::fs::write(&pkg_info, b"APPL????")
        .await
        .fs_context("failed to write", &pkg_info)?;

    log::info!("✓ Created {}", app_path.display());
    Ok(app_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Format, MacSettings};
    use serde_json::Map;

    fn settings(binary: PathBuf, output_dir: PathBuf) -> PakagerSettings {
        PakagerSettings {
            name: "MyApp".into(),
            version: "1.0.0".into(),
            author: "Jane".into(),
            real_name: "MyApp".into(),
            app_id: "com.pakager.MyApp".into(),
            copyright: Some("Copyright © 2024 Jane".into()),
            output_dir,
            background_app: false,
            mac: MacSettings {
                binary,
                category: None,
                icon: None,
                formats: vec![Format::App],
                background_app: false,
                dark_mode_support: true,
                custom_info: Map::new(),
            },
        }
    }

    #[tokio::test]
    async fn assembles_bundle_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = tmp.path().join("myapp");
        std::fs::write(&binary, b"#!/bin/sh\necho hi\n").unwrap();
        let dist = tmp.path().join("dist");

        let app = bundle_app(&settings(binary, dist.clone()), &dist).await.unwrap();
        assert_eq!(app, dist.join("MyApp.app"));
        assert!(app.join("Contents/MacOS/MyApp").is_file());
        assert!(app.join("Contents/Info.plist").is_file());
        assert!(!app.join("Contents/Resources/app.icns").exists());
        assert_eq!(std::fs::read(app.join("Contents/PkgInfo")).unwrap(), b"APPL????");

        let plist = plist::Value::from_file(app.join("Contents/Info.plist")).unwrap();
        let dict = plist.as_dictionary().unwrap();
        assert_eq!(
            dict.get("CFBundleExecutable").and_then(plist::Value::as_string),
            Some("MyApp")
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(app.join("Contents/MacOS/MyApp"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[tokio::test]
    async fn rebuild_replaces_previous_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = tmp.path().join("myapp");
        std::fs::write(&binary, b"bin").unwrap();
        let dist = tmp.path().join("dist");
        let stale = dist.join("MyApp.app/Contents/stale.txt");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, b"old").unwrap();

        bundle_app(&settings(binary, dist.clone()), &dist).await.unwrap();
        assert!(!stale.exists());
    }
}
