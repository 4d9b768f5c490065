//! Centralized viewer options with TOML support.
//!
//! Every sub-struct uses `#[serde(default)]`, so a partial TOML file
//! that only overrides one section still parses.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Window creation parameters.
    pub window: WindowOptions,
    /// Text content and geometry parameters.
    pub scene: SceneOptions,
    /// Asset locations.
    pub assets: AssetOptions,
    /// Orbit camera parameters.
    pub orbit: OrbitOptions,
}

/// Window creation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowOptions {
    /// Window title.
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    /// Frame rate cap (0 = uncapped, presenting at vsync).
    pub target_fps: u32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "glyphfield".to_owned(),
            width: 1280,
            height: 720,
            target_fps: 0,
        }
    }
}

/// Text content and geometry parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneOptions {
    /// The string to extrude.
    pub text: String,
    /// Glyph size in world units.
    pub size: f32,
    /// Extrusion depth.
    pub depth: f32,
    /// Line segments per outline curve.
    pub curve_segments: u32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            text: "Hello, 3D!".to_owned(),
            size: 0.5,
            depth: 0.1,
            curve_segments: 12,
        }
    }
}

/// Asset locations: the matcap image on disk and the typeface URL with
/// its download cache path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetOptions {
    /// Matcap image path.
    pub matcap_path: PathBuf,
    /// Typeface JSON URL.
    pub typeface_url: String,
    /// Local cache for the downloaded typeface.
    pub typeface_cache: PathBuf,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            matcap_path: PathBuf::from("assets/textures/matcap.png"),
            typeface_url: "https://threejs.org/examples/fonts/\
                           helvetiker_regular.typeface.json"
                .to_owned(),
            typeface_cache: PathBuf::from(
                "assets/fonts/helvetiker_regular.typeface.json",
            ),
        }
    }
}

/// Orbit camera parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrbitOptions {
    /// Distance from the origin.
    pub radius: f32,
}

impl Default for OrbitOptions {
    fn default() -> Self {
        Self { radius: 5.0 }
    }
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Io`] when the file cannot be read and
    /// [`SceneError::OptionsParse`] when the TOML is invalid.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = match toml::to_string_pretty(&opts) {
            Ok(s) => s,
            Err(e) => unreachable!("{e}"),
        };
        let parsed: Options = match toml::from_str(&toml_str) {
            Ok(o) => o,
            Err(e) => unreachable!("{e}"),
        };
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[scene]
text = "salve"
"#;
        let opts: Options = match toml::from_str(toml_str) {
            Ok(o) => o,
            Err(e) => unreachable!("{e}"),
        };
        assert_eq!(opts.scene.text, "salve");
        // Everything else should be default
        assert_eq!(opts.scene.size, 0.5);
        assert_eq!(opts.orbit.radius, 5.0);
        assert_eq!(opts.window.title, "glyphfield");
    }

    #[test]
    fn default_urls_have_no_whitespace() {
        let assets = AssetOptions::default();
        assert!(!assets.typeface_url.contains(char::is_whitespace));
        assert!(assets.typeface_url.ends_with("typeface.json"));
    }

    #[test]
    fn invalid_toml_is_an_options_parse_error() {
        let dir = std::env::temp_dir().join("glyphfield-options-test");
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {}
            Err(e) => unreachable!("{e}"),
        }
        let path = dir.join("bad.toml");
        match std::fs::write(&path, "[scene\ntext = ") {
            Ok(()) => {}
            Err(e) => unreachable!("{e}"),
        }
        assert!(matches!(
            Options::load(&path),
            Err(SceneError::OptionsParse(_))
        ));
        let _ = std::fs::remove_file(&path);
    }
}
