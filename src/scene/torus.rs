//! Parametric torus mesh generation.

use std::f32::consts::TAU;

use glam::Vec3;

use super::mesh::{MeshData, MeshVertex};

/// Distance from the torus center to the center of the tube.
pub const MAJOR_RADIUS: f32 = 0.3;
/// Radius of the tube itself.
pub const MINOR_RADIUS: f32 = 0.2;
/// Segments around the tube cross-section.
pub const RADIAL_SEGMENTS: u32 = 20;
/// Segments around the ring.
pub const TUBULAR_SEGMENTS: u32 = 45;

/// Generate the shared decoration torus with the fixed scene
/// parameters.
#[must_use]
pub fn decoration_torus() -> MeshData {
    torus(MINOR_RADIUS, MAJOR_RADIUS, RADIAL_SEGMENTS, TUBULAR_SEGMENTS)
}

/// Generate a torus in the XY plane centered at the origin.
///
/// `minor` is the tube radius, `major` the ring radius. The grid is
/// closed by duplicating the seam vertices, so the mesh holds
/// `(radial + 1) * (tubular + 1)` vertices.
#[must_use]
pub fn torus(minor: f32, major: f32, radial: u32, tubular: u32) -> MeshData {
    let mut vertices =
        Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);

    for i in 0..=radial {
        let theta = i as f32 / radial as f32 * TAU;
        for j in 0..=tubular {
            let phi = j as f32 / tubular as f32 * TAU;

            // Center of the tube cross-section for this ring angle
            let ring = Vec3::new(phi.cos() * major, phi.sin() * major, 0.0);
            let position = Vec3::new(
                (major + minor * theta.cos()) * phi.cos(),
                (major + minor * theta.cos()) * phi.sin(),
                minor * theta.sin(),
            );
            let normal = (position - ring).normalize();

            vertices.push(MeshVertex {
                position: position.to_array(),
                normal: normal.to_array(),
            });
        }
    }

    let stride = tubular + 1;
    let mut indices =
        Vec::with_capacity((radial * tubular * 6) as usize);
    for i in 0..radial {
        for j in 0..tubular {
            let a = i * stride + j;
            let b = (i + 1) * stride + j;
            let c = (i + 1) * stride + j + 1;
            let d = i * stride + j + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData { vertices, indices }
}
