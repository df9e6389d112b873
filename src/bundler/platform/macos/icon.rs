//! Application icon installation (PNG → ICNS conversion).

use crate::bundler::{error::ErrorExt, Result, utils::fs};
use image::imageops::FilterType;
use std::path::{Path, PathBuf};

/// Icon file name inside `Contents/Resources`.
pub const ICON_FILE_NAME: &str = "app.icns";

/// Square sizes written into generated ICNS files.
const ICNS_SIZES: [u32; 6] = [16, 32, 128, 256, 512, 1024];

/// Installs `source` as the bundle icon at `dest`.
///
/// `.icns` files are copied as-is; PNG files are scaled to every
/// [`ICNS_SIZES`] entry and packed into an icon family.
pub async fn install_icon(source: &Path, dest: &Path) -> Result<()> {
    if source.extension().is_some_and(|ext| ext == "icns") {
        log::debug!("Copying ICNS icon {}", source.display());
        return fs::copy_file(source, dest).await;
    }

    log::info!("Converting PNG icon {} to ICNS", source.display());
    let source: PathBuf = source.to_path_buf();
    let dest: PathBuf = dest.to_path_buf();
    tokio::task::spawn_blocking(move || png_to_icns(&source, &dest))
        .await
        .map_err(|e| {
            crate::bundler::Error::GenericError(format!("Icon conversion task panicked: {e}"))
        })?
}

fn png_to_icns(source: &Path, dest: &Path) -> Result<()> {
    let img = image::open(source)?;
    let mut family = icns::IconFamily::new();

    for size in ICNS_SIZES {
        let rgba = img.resize_exact(size, size, FilterType::CatmullRom).to_rgba8();
        let icon = icns::Image::from_data(icns::PixelFormat::RGBA, size, size, rgba.into_raw())
            .fs_context("failed to encode icon from", source)?;
        family
            .add_icon(&icon)
            .fs_context("failed to add icon size from", source)?;
    }

    let file = std::fs::File::create(dest).fs_context("failed to create", dest)?;
    family
        .write(std::io::BufWriter::new(file))
        .fs_context("failed to write", dest)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn converts_png_to_icns() {
        let tmp = tempfile::tempdir().unwrap();
        let png = tmp.path().join("icon.png");
        image::RgbaImage::from_pixel(64, 64, image::Rgba([200, 40, 40, 255]))
            .save(&png)
            .unwrap();

        let icns_path = tmp.path().join(ICON_FILE_NAME);
        install_icon(&png, &icns_path).await.unwrap();

        let bytes = std::fs::read(&icns_path).unwrap();
        assert_eq!(&bytes[..4], b"icns");
    }

    #[tokio::test]
    async fn copies_icns_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("icon.icns");
        std::fs::write(&source, b"icns-data").unwrap();

        let dest = tmp.path().join("Resources").join(ICON_FILE_NAME);
        install_icon(&source, &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"icns-data");
    }
}
