//! Background asset loading.
//!
//! The matcap image and the typeface each load on their own thread and
//! report back over a channel, so the window opens immediately and the
//! scene fills in as assets resolve. The typeface is fetched over HTTP
//! once and cached on disk next to the other assets.

use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::error::SceneError;
use crate::options::AssetOptions;

use super::mesh::MeshData;
use super::text::{build_text_mesh, TextStyle};
use super::typeface::Typeface;

/// A completed background load.
pub enum LoadEvent {
    /// Decoded matcap image, RGBA8.
    Matcap {
        /// Pixel data, `width * height * 4` bytes.
        pixels: Vec<u8>,
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },
    /// Text mesh built from the fetched typeface.
    Text {
        /// Extruded mesh in baseline coordinates.
        mesh: MeshData,
    },
}

/// Handle to the in-flight background loads.
pub struct SceneLoader {
    events: Receiver<LoadEvent>,
}

impl SceneLoader {
    /// Kick off both loads. Failures are logged on the worker thread
    /// and simply never deliver an event; the scene stays in whatever
    /// readiness state it reached.
    #[must_use]
    pub fn spawn(assets: &AssetOptions, text: &str, style: TextStyle) -> Self {
        let (tx, events) = mpsc::channel();

        let matcap_tx = tx.clone();
        let matcap_path = assets.matcap_path.clone();
        thread::spawn(move || match load_matcap(&matcap_path) {
            Ok((pixels, width, height)) => {
                // Send fails only when the viewer already shut down
                let _ = matcap_tx.send(LoadEvent::Matcap {
                    pixels,
                    width,
                    height,
                });
            }
            Err(e) => {
                log::warn!(
                    "matcap load failed ({}): {e}",
                    matcap_path.display()
                );
            }
        });

        let url = assets.typeface_url.clone();
        let cache = assets.typeface_cache.clone();
        let text = text.to_owned();
        thread::spawn(move || match fetch_typeface(&url, &cache) {
            Ok(source) => match Typeface::from_json(&source) {
                Ok(face) => {
                    log::info!("typeface loaded: {}", face.family_name);
                    let mesh = build_text_mesh(&face, &text, &style);
                    let _ = tx.send(LoadEvent::Text { mesh });
                }
                Err(e) => log::warn!("typeface parse failed: {e}"),
            },
            Err(e) => log::warn!("typeface fetch failed: {e}"),
        });

        Self { events }
    }

    /// Drain every load that completed since the last poll.
    pub fn poll(&self) -> Vec<LoadEvent> {
        self.events.try_iter().collect()
    }
}

/// Decode the matcap image into RGBA8 pixels.
///
/// # Errors
///
/// Returns [`SceneError::Io`] when the file cannot be read and
/// [`SceneError::Viewer`] when it is not a supported image format.
pub fn load_matcap(path: &Path) -> Result<(Vec<u8>, u32, u32), SceneError> {
    let bytes = std::fs::read(path)?;
    decode_matcap(&bytes)
}

/// Decode an in-memory image into RGBA8 pixels.
///
/// # Errors
///
/// Returns [`SceneError::Viewer`] when the bytes are not a supported
/// image format.
pub fn decode_matcap(bytes: &[u8]) -> Result<(Vec<u8>, u32, u32), SceneError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| SceneError::Viewer(format!("matcap decode: {e}")))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok((image.into_raw(), width, height))
}

/// Read the typeface from the local cache, downloading it first when
/// absent.
///
/// # Errors
///
/// Returns [`SceneError::TypefaceFetch`] when the download fails and
/// [`SceneError::Io`] when the cached copy cannot be read.
pub fn fetch_typeface(url: &str, cache: &Path) -> Result<String, SceneError> {
    if cache.exists() {
        log::info!("using cached typeface at {}", cache.display());
        return Ok(std::fs::read_to_string(cache)?);
    }

    log::info!("downloading typeface from {url}");
    let source = ureq::get(url)
        .call()
        .map_err(|e| SceneError::TypefaceFetch(e.to_string()))?
        .into_body()
        .read_to_string()
        .map_err(|e| SceneError::TypefaceFetch(e.to_string()))?;

    if let Some(dir) = cache.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            log::warn!("could not create {}: {e}", dir.display());
        }
    }
    // A failed cache write is not fatal, we still hold the source
    if let Err(e) = std::fs::write(cache, &source) {
        log::warn!("could not cache typeface at {}: {e}", cache.display());
    }
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_typeface_skips_the_network() {
        let dir = std::env::temp_dir().join("glyphfield-loader-test");
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {}
            Err(e) => unreachable!("{e}"),
        }
        let cache = dir.join("face.typeface.json");
        match std::fs::write(&cache, "{\"cached\": true}") {
            Ok(()) => {}
            Err(e) => unreachable!("{e}"),
        }

        // An unresolvable URL proves the cache short-circuits
        let source =
            match fetch_typeface("http://invalid.invalid/face.json", &cache) {
                Ok(s) => s,
                Err(e) => unreachable!("{e}"),
            };
        assert_eq!(source, "{\"cached\": true}");
        let _ = std::fs::remove_file(&cache);
    }

    #[test]
    fn decode_matcap_round_trips_a_png() {
        let mut bytes = Vec::new();
        let img =
            image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        match img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        ) {
            Ok(()) => {}
            Err(e) => unreachable!("{e}"),
        }

        let (pixels, width, height) = match decode_matcap(&bytes) {
            Ok(d) => d,
            Err(e) => unreachable!("{e}"),
        };
        assert_eq!((width, height), (2, 3));
        assert_eq!(pixels.len(), 2 * 3 * 4);
        assert_eq!(&pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn decode_matcap_rejects_garbage() {
        assert!(decode_matcap(&[0, 1, 2, 3]).is_err());
    }
}
