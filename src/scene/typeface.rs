//! Typeface JSON parsing and glyph outline flattening.
//!
//! The font format is the three.js `typeface.json` layout: a map of
//! single-character glyphs, each carrying a horizontal advance (`ha`)
//! and an outline command string (`o`) in font units. Outline commands
//! are `m x y` (move), `l x y` (line), `q x y cx cy` (quadratic, end
//! point first), `b x y c1x c1y c2x c2y` (cubic, end point first) and
//! an optional `z` (close). Coordinates are scaled by
//! `size / resolution` when flattening.

use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;

use crate::error::SceneError;

/// A parsed typeface file.
#[derive(Debug, Clone, Deserialize)]
pub struct Typeface {
    /// Outline data per character.
    pub glyphs: HashMap<char, Glyph>,
    /// Font units per em; outline coordinates divide by this.
    pub resolution: f32,
    /// Typeface family name, when present.
    #[serde(rename = "familyName", default)]
    pub family_name: String,
}

/// A single glyph: advance width plus an optional outline.
#[derive(Debug, Clone, Deserialize)]
pub struct Glyph {
    /// Horizontal advance in font units.
    #[serde(default)]
    pub ha: f32,
    /// Outline command string; absent for blank glyphs such as space.
    #[serde(default)]
    pub o: Option<String>,
}

impl Typeface {
    /// Parse a typeface from its JSON source.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::TypefaceParse`] when the JSON does not
    /// match the typeface layout.
    pub fn from_json(source: &str) -> Result<Self, SceneError> {
        serde_json::from_str(source)
            .map_err(|e| SceneError::TypefaceParse(e.to_string()))
    }

    /// Look up a glyph by character.
    #[must_use]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }
}

impl Glyph {
    /// Flatten the outline into closed contours.
    ///
    /// `scale` converts font units to world units, `origin` offsets the
    /// contour (pen position), and `curve_segments` is the number of
    /// line segments each quadratic or cubic curve is divided into.
    /// Unknown or truncated commands end the parse early, keeping
    /// whatever contours were already complete.
    #[must_use]
    pub fn contours(
        &self,
        scale: f32,
        origin: Vec2,
        curve_segments: u32,
    ) -> Vec<Vec<Vec2>> {
        let Some(outline) = self.o.as_deref() else {
            return Vec::new();
        };

        let segments = curve_segments.max(1);
        let mut contours: Vec<Vec<Vec2>> = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();

        let mut tokens = outline.split_ascii_whitespace();
        let read = |t: &mut std::str::SplitAsciiWhitespace<'_>| -> Option<Vec2> {
            let x: f32 = t.next()?.parse().ok()?;
            let y: f32 = t.next()?.parse().ok()?;
            Some(Vec2::new(x, y) * scale + origin)
        };

        while let Some(cmd) = tokens.next() {
            match cmd {
                "m" => {
                    if current.len() > 1 {
                        contours.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                    let Some(p) = read(&mut tokens) else { break };
                    current.push(p);
                }
                "l" => {
                    let Some(p) = read(&mut tokens) else { break };
                    current.push(p);
                }
                "q" => {
                    // End point comes first in the data, control second
                    let Some(end) = read(&mut tokens) else { break };
                    let Some(ctrl) = read(&mut tokens) else { break };
                    let Some(&start) = current.last() else { break };
                    for s in 1..=segments {
                        let t = s as f32 / segments as f32;
                        current.push(quadratic_point(start, ctrl, end, t));
                    }
                }
                "b" => {
                    let Some(end) = read(&mut tokens) else { break };
                    let Some(c1) = read(&mut tokens) else { break };
                    let Some(c2) = read(&mut tokens) else { break };
                    let Some(&start) = current.last() else { break };
                    for s in 1..=segments {
                        let t = s as f32 / segments as f32;
                        current.push(cubic_point(start, c1, c2, end, t));
                    }
                }
                "z" => {
                    if current.len() > 1 {
                        contours.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
                other => {
                    log::debug!("unknown outline command {other:?}");
                    break;
                }
            }
        }
        if current.len() > 1 {
            contours.push(current);
        }

        // Drop a duplicated closing point so contours are open rings
        for contour in &mut contours {
            if contour.len() > 1 {
                let first = contour[0];
                if let Some(&last) = contour.last() {
                    if (last - first).length_squared() < 1e-12 {
                        let _ = contour.pop();
                    }
                }
            }
        }
        contours
    }
}

/// Point on a quadratic bezier at parameter `t`.
fn quadratic_point(start: Vec2, ctrl: Vec2, end: Vec2, t: f32) -> Vec2 {
    let omt = 1.0 - t;
    start * (omt * omt) + ctrl * (2.0 * omt * t) + end * (t * t)
}

/// Point on a cubic bezier at parameter `t`.
fn cubic_point(start: Vec2, c1: Vec2, c2: Vec2, end: Vec2, t: f32) -> Vec2 {
    let omt = 1.0 - t;
    start * (omt * omt * omt)
        + c1 * (3.0 * omt * omt * t)
        + c2 * (3.0 * omt * t * t)
        + end * (t * t * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "familyName": "Test Sans",
        "resolution": 1000,
        "glyphs": {
            "i": { "ha": 300, "o": "m 100 0 l 200 0 l 200 700 l 100 700" },
            "o": {
                "ha": 600,
                "o": "m 300 0 q 550 250 550 0 q 300 500 550 500 q 50 250 50 500 q 300 0 50 0 m 300 100 q 150 250 150 100 q 300 400 150 400 q 450 250 450 400 q 300 100 450 100"
            },
            " ": { "ha": 350 }
        }
    }"#;

    #[test]
    fn parses_family_and_glyphs() {
        let face = match Typeface::from_json(FIXTURE) {
            Ok(f) => f,
            Err(e) => unreachable!("{e}"),
        };
        assert_eq!(face.family_name, "Test Sans");
        assert_eq!(face.resolution, 1000.0);
        assert!(face.glyph('i').is_some());
        assert!(face.glyph(' ').is_some_and(|g| g.o.is_none()));
        assert!(face.glyph('x').is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Typeface::from_json("{ not json").is_err());
    }

    #[test]
    fn line_outline_flattens_to_polygon() {
        let face = match Typeface::from_json(FIXTURE) {
            Ok(f) => f,
            Err(e) => unreachable!("{e}"),
        };
        let glyph = match face.glyph('i') {
            Some(g) => g,
            None => unreachable!(),
        };
        let contours = glyph.contours(0.001, Vec2::ZERO, 12);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
        // Font units scaled down by resolution
        assert!((contours[0][0] - Vec2::new(0.1, 0.0)).length() < 1e-6);
    }

    #[test]
    fn quadratic_commands_emit_curve_segments_points() {
        let face = match Typeface::from_json(FIXTURE) {
            Ok(f) => f,
            Err(e) => unreachable!("{e}"),
        };
        let glyph = match face.glyph('o') {
            Some(g) => g,
            None => unreachable!(),
        };
        let contours = glyph.contours(0.001, Vec2::ZERO, 12);
        // Outer ring and inner hole
        assert_eq!(contours.len(), 2);
        // moveTo point + 4 quadratics x 12 segments, minus the closing
        // duplicate
        assert_eq!(contours[0].len(), 48);
        assert_eq!(contours[1].len(), 48);
    }

    #[test]
    fn pen_origin_offsets_every_point() {
        let face = match Typeface::from_json(FIXTURE) {
            Ok(f) => f,
            Err(e) => unreachable!("{e}"),
        };
        let glyph = match face.glyph('i') {
            Some(g) => g,
            None => unreachable!(),
        };
        let origin = Vec2::new(2.0, -1.0);
        let contours = glyph.contours(0.001, origin, 12);
        for p in &contours[0] {
            assert!(p.x >= 2.0 && p.x <= 2.3);
            assert!(p.y >= -1.0 && p.y <= -0.2);
        }
    }
}
