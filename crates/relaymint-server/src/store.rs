//! Artifact store.
//!
//! Persists the connection config and a scannable QR JPEG under
//! `{root}/{family}/{short_id}/`. Directories are created on demand and never
//! pruned. Write order is config-then-QR; a QR failure after a successful
//! config write leaves the config file in place (no rollback).
//!
//! Two requests landing on the same short id race with last-writer-wins
//! semantics; the short id space makes that an accepted risk.

use std::path::{Path, PathBuf};

use tracing::info;

use relaymint_core::{Error, Result};

/// Rendered-module side length in pixels.
const QR_MODULE_PX: u32 = 8;
/// Quiet zone around the code, in modules.
const QR_QUIET_ZONE: u32 = 4;

/// Where the QR image comes from.
#[derive(Debug, Clone, Copy)]
pub enum QrSource<'a> {
    /// Render a QR code encoding this connection URI locally.
    Uri(&'a str),
    /// Re-encode backend-supplied image bytes as JPEG.
    Image(&'a [u8]),
}

/// Paths of one persisted artifact set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub config_path: PathBuf,
    pub qr_path: PathBuf,
}

/// Filesystem store rooted at the configured users directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist a config file and QR image for one client.
    pub fn persist(
        &self,
        family: &str,
        short_id: &str,
        config_text: &str,
        qr: QrSource<'_>,
    ) -> Result<ArtifactPaths> {
        let dir = self.root.join(family).join(short_id);
        std::fs::create_dir_all(&dir)?;

        let config_path = dir.join("config.conf");
        std::fs::write(&config_path, config_text)?;

        let qr_path = dir.join("qr.jpeg");
        match qr {
            QrSource::Uri(uri) => render_qr_jpeg(uri, &qr_path)?,
            QrSource::Image(bytes) => reencode_qr_jpeg(bytes, &qr_path)?,
        }

        info!(family, short_id, dir = %dir.display(), "persisted client artifacts");
        Ok(ArtifactPaths {
            dir,
            config_path,
            qr_path,
        })
    }
}

/// Render a URI into a QR code and save it as JPEG.
fn render_qr_jpeg(uri: &str, path: &Path) -> Result<()> {
    let code = qrcode::QrCode::new(uri.as_bytes())
        .map_err(|e| Error::Encoding(format!("QR encode failed: {e}")))?;
    let img = qr_to_image(&code);
    img.save_with_format(path, image::ImageFormat::Jpeg)
        .map_err(image_error)
}

/// Decode backend-supplied image bytes and re-encode them as JPEG.
fn reencode_qr_jpeg(bytes: &[u8], path: &Path) -> Result<()> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| Error::Encoding(format!("backend QR image unreadable: {e}")))?;
    img.to_rgb8()
        .save_with_format(path, image::ImageFormat::Jpeg)
        .map_err(image_error)
}

/// Blow QR modules up into a grayscale pixel buffer with a quiet zone.
fn qr_to_image(code: &qrcode::QrCode) -> image::GrayImage {
    let width = code.width() as u32;
    let side = (width + 2 * QR_QUIET_ZONE) * QR_MODULE_PX;
    let mut img = image::GrayImage::from_pixel(side, side, image::Luma([255u8]));

    for (i, color) in code.to_colors().iter().enumerate() {
        if *color == qrcode::Color::Dark {
            let x0 = (i as u32 % width + QR_QUIET_ZONE) * QR_MODULE_PX;
            let y0 = (i as u32 / width + QR_QUIET_ZONE) * QR_MODULE_PX;
            for dy in 0..QR_MODULE_PX {
                for dx in 0..QR_MODULE_PX {
                    img.put_pixel(x0 + dx, y0 + dy, image::Luma([0u8]));
                }
            }
        }
    }
    img
}

fn image_error(err: image::ImageError) -> Error {
    match err {
        image::ImageError::IoError(io) => Error::Storage(io),
        other => Error::Encoding(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_uri_writes_config_and_qr() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());

        let uri = "vless://6fd7cafe-2291-4447-a2e6-05c151a097d4@relay.example:443\
                   ?encryption=none&security=reality#ab12cd";
        let paths = store.persist("vless", "ab12cd", uri, QrSource::Uri(uri)).unwrap();

        assert_eq!(paths.dir, tmp.path().join("vless").join("ab12cd"));
        assert_eq!(std::fs::read_to_string(&paths.config_path).unwrap(), uri);
        let qr = image::open(&paths.qr_path).unwrap();
        assert!(qr.width() > 0);
    }

    #[test]
    fn persist_is_idempotent_over_existing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());

        store.persist("ss", "x9", "first", QrSource::Uri("ss://Zmlyc3Q=#x9")).unwrap();
        let paths = store
            .persist("ss", "x9", "second", QrSource::Uri("ss://c2Vjb25k#x9"))
            .unwrap();
        // Last writer wins wholesale.
        assert_eq!(std::fs::read_to_string(&paths.config_path).unwrap(), "second");
    }

    #[test]
    fn persist_image_reencodes_as_jpeg() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());

        // A tiny PNG standing in for the backend-rendered QR.
        let src = image::GrayImage::from_pixel(24, 24, image::Luma([128u8]));
        let mut png = std::io::Cursor::new(Vec::new());
        src.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let paths = store
            .persist("wg", "9f8e7", "[Interface]\n", QrSource::Image(png.get_ref()))
            .unwrap();
        assert_eq!(paths.qr_path.file_name().unwrap(), "qr.jpeg");
        let reencoded = image::open(&paths.qr_path).unwrap();
        assert_eq!(reencoded.width(), 24);
        assert_eq!(reencoded.height(), 24);
    }

    #[test]
    fn garbage_image_bytes_fail_without_touching_qr_path() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());

        let err = store
            .persist("wg", "abcde", "[Interface]\n", QrSource::Image(b"not an image"))
            .unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
        // Config write precedes the QR failure and is not rolled back.
        let dir = tmp.path().join("wg").join("abcde");
        assert!(dir.join("config.conf").exists());
        assert!(!dir.join("qr.jpeg").exists());
    }

    #[test]
    fn directory_name_is_short_id_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());
        let paths = store
            .persist("vless", "Ab-1_z", "cfg", QrSource::Uri("vless://x@h:1#Ab-1_z"))
            .unwrap();
        assert!(paths.dir.ends_with("vless/Ab-1_z"));
    }
}
