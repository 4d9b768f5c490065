//! Extruded 3D text mesh generation.
//!
//! Glyph outlines are flattened, triangulated into front/back caps,
//! and joined by flat-shaded side walls along every contour edge. The
//! back cap sits at z = 0 and the front cap at z = depth, so glyphs
//! extrude toward +z.

use glam::{Vec2, Vec3};

use super::mesh::{MeshData, MeshVertex};
use super::tessellate::{point_in_polygon, triangulate_contours};
use super::typeface::Typeface;

/// Parameters for text mesh generation.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    /// Glyph size in world units (font em maps to this).
    pub size: f32,
    /// Extrusion depth along +z.
    pub depth: f32,
    /// Line segments per outline curve.
    pub curve_segments: u32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 0.5,
            depth: 0.1,
            curve_segments: 12,
        }
    }
}

/// Build an extruded mesh for `text` using `face`.
///
/// Characters missing from the typeface are skipped (with a debug
/// trace); blank glyphs still advance the pen. The result is in
/// baseline coordinates: centering is the caller's concern.
#[must_use]
pub fn build_text_mesh(
    face: &Typeface,
    text: &str,
    style: &TextStyle,
) -> MeshData {
    let scale = style.size / face.resolution.max(1.0);
    let mut mesh = MeshData::default();
    let mut pen_x = 0.0_f32;

    for c in text.chars() {
        let Some(glyph) = face.glyph(c) else {
            log::debug!("typeface has no glyph for {c:?}");
            continue;
        };
        let contours = glyph.contours(
            scale,
            Vec2::new(pen_x, 0.0),
            style.curve_segments,
        );
        pen_x += glyph.ha * scale;
        if contours.is_empty() {
            continue;
        }
        mesh.append(&extrude(&contours, style.depth));
    }
    mesh
}

/// Extrude a set of closed contours into a capped solid.
fn extrude(contours: &[Vec<Vec2>], depth: f32) -> MeshData {
    let (points, cap_indices) = triangulate_contours(contours);
    let mut mesh = MeshData::default();

    // Front cap at z = depth (facing +z), back cap at z = 0 with
    // reversed winding (facing -z)
    let front_base = 0_u32;
    for p in &points {
        mesh.vertices.push(MeshVertex {
            position: [p.x, p.y, depth],
            normal: [0.0, 0.0, 1.0],
        });
    }
    let back_base = mesh.vertices.len() as u32;
    for p in &points {
        mesh.vertices.push(MeshVertex {
            position: [p.x, p.y, 0.0],
            normal: [0.0, 0.0, -1.0],
        });
    }
    for t in cap_indices.chunks_exact(3) {
        mesh.indices.extend_from_slice(&[
            front_base + t[0],
            front_base + t[1],
            front_base + t[2],
        ]);
        mesh.indices.extend_from_slice(&[
            back_base + t[0],
            back_base + t[2],
            back_base + t[1],
        ]);
    }

    // Side walls: one flat quad per contour edge. Walls must face away
    // from the solid: outward for solid rings, into the cavity for
    // holes. (dy, -dx) is outward for a counter-clockwise ring, so
    // flip whenever the ring's winding disagrees with its role.
    for (ci, contour) in contours.iter().enumerate() {
        if contour.len() < 3 {
            continue;
        }
        let is_hole = contours
            .iter()
            .enumerate()
            .filter(|(other, poly)| {
                *other != ci
                    && poly.len() >= 3
                    && point_in_polygon(contour[0], poly)
            })
            .count()
            % 2
            == 1;
        let ccw = signed_area(contour) > 0.0;
        let flip = if ccw == is_hole { -1.0 } else { 1.0 };
        for i in 0..contour.len() {
            let a = contour[i];
            let b = contour[(i + 1) % contour.len()];
            let edge = b - a;
            if edge.length_squared() < 1e-12 {
                continue;
            }
            let normal =
                Vec3::new(edge.y * flip, -edge.x * flip, 0.0).normalize();
            let base = mesh.vertices.len() as u32;
            for (p, z) in [
                (a, 0.0),
                (b, 0.0),
                (b, depth),
                (a, depth),
            ] {
                mesh.vertices.push(MeshVertex {
                    position: [p.x, p.y, z],
                    normal: normal.to_array(),
                });
            }
            mesh.indices.extend_from_slice(&[
                base,
                base + 1,
                base + 2,
                base,
                base + 2,
                base + 3,
            ]);
        }
    }

    mesh
}

/// Twice the signed area of a closed contour (positive when
/// counter-clockwise).
fn signed_area(contour: &[Vec2]) -> f32 {
    let mut area = 0.0;
    for i in 0..contour.len() {
        let a = contour[i];
        let b = contour[(i + 1) % contour.len()];
        area += a.x * b.y - b.x * a.y;
    }
    area
}
