//! Decoding inputs and persisting the composite.

use std::ffi::OsString;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageFormat, ImageReader, RgbImage};
use qrmark_common::error::{ImageRole, QrmarkError, QrmarkResult};

/// Load the host image as an 8-bit RGB raster.
pub fn load_host(path: &Path) -> QrmarkResult<RgbImage> {
    let image = decode(ImageRole::Host, path)?.to_rgb8();
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Loaded host image"
    );
    Ok(image)
}

/// Load the QR image as an 8-bit grayscale raster.
///
/// Color inputs are reduced to luma by the `image` crate's conversion.
pub fn load_qr(path: &Path) -> QrmarkResult<GrayImage> {
    let image = decode(ImageRole::Qr, path)?.to_luma8();
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Loaded QR image"
    );
    Ok(image)
}

/// Decode a file, sniffing the format from its contents.
///
/// Staged uploads keep a fixed extension whatever their real encoding,
/// so the extension is only a fallback.
fn decode(role: ImageRole, path: &Path) -> QrmarkResult<DynamicImage> {
    let load_err = |e: &dyn std::fmt::Display| QrmarkError::load(role, path, e.to_string());

    let image = ImageReader::open(path)
        .map_err(|e| load_err(&e))?
        .with_guessed_format()
        .map_err(|e| load_err(&e))?
        .decode()
        .map_err(|e| load_err(&e))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(QrmarkError::load(
            role,
            path,
            "image has zero width or height",
        ));
    }

    Ok(image)
}

/// Encode a raster as PNG in memory.
pub fn encode_png(image: &RgbImage) -> QrmarkResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| QrmarkError::encode(e.to_string()))?;
    Ok(bytes)
}

/// Write `bytes` to `path` through a sibling temporary file.
///
/// The destination is either fully replaced or left untouched.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> QrmarkResult<()> {
    let partial = partial_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let written = std::fs::write(&partial, bytes).and_then(|()| std::fs::rename(&partial, path));
    if let Err(err) = written {
        let _ = std::fs::remove_file(&partial);
        return Err(err.into());
    }
    Ok(())
}

fn partial_path(path: &Path) -> QrmarkResult<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        QrmarkError::config(format!(
            "Output path {} does not name a file",
            path.display()
        ))
    })?;
    let mut name = OsString::from(".");
    name.push(file_name);
    name.push(".partial");
    Ok(path.with_file_name(name))
}
