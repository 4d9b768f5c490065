//! CPU-side mesh data shared by the torus and text generators.

use glam::{Mat4, Quat, Vec3};

/// Vertex layout used by every mesh in the scene.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
}

/// An indexed triangle mesh in CPU memory.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex list.
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Append another mesh, rebasing its indices.
    pub fn append(&mut self, other: &MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Axis-aligned bounding box over all vertices, or `None` for an
    /// empty mesh.
    #[must_use]
    pub fn aabb(&self) -> Option<Aabb> {
        let first = self.vertices.first()?;
        let mut min = Vec3::from_array(first.position);
        let mut max = min;
        for v in &self.vertices[1..] {
            let p = Vec3::from_array(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        Some(Aabb { min, max })
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Midpoint of the box: `(max + min) / 2` per axis.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.max + self.min) * 0.5
    }
}

/// Position / XYZ euler rotation / uniform scale of a scene entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space translation.
    pub position: Vec3,
    /// Euler rotation in radians, applied in XYZ order.
    pub rotation: Vec3,
    /// Uniform scale factor.
    pub scale: f32,
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: 1.0,
    };

    /// A pure translation.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Bake into a column-major model matrix.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            glam::EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            rotation,
            self.position,
        )
    }
}

/// Per-instance GPU data: a model matrix as four column vectors.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Model matrix columns.
    pub model: [[f32; 4]; 4],
}

impl From<&Transform> for InstanceRaw {
    fn from(t: &Transform) -> Self {
        Self {
            model: t.model_matrix().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> MeshVertex {
        MeshVertex {
            position: [x, y, z],
            normal: [0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn aabb_center_is_midpoint() {
        let mesh = MeshData {
            vertices: vec![
                vertex(-1.0, 2.0, 0.5),
                vertex(3.0, -4.0, 0.0),
                vertex(0.0, 0.0, 2.5),
            ],
            indices: vec![0, 1, 2],
        };
        let aabb = match mesh.aabb() {
            Some(b) => b,
            None => unreachable!(),
        };
        assert_eq!(aabb.min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 2.0, 2.5));
        assert_eq!(aabb.center(), Vec3::new(1.0, -1.0, 1.25));
    }

    #[test]
    fn empty_mesh_has_no_aabb() {
        assert!(MeshData::default().aabb().is_none());
    }

    #[test]
    fn append_rebases_indices() {
        let mut a = MeshData {
            vertices: vec![vertex(0.0, 0.0, 0.0); 3],
            indices: vec![0, 1, 2],
        };
        let b = MeshData {
            vertices: vec![vertex(1.0, 0.0, 0.0); 3],
            indices: vec![0, 1, 2],
        };
        a.append(&b);
        assert_eq!(a.vertices.len(), 6);
        assert_eq!(a.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn uniform_scale_transform_scales_unit_vectors() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::ZERO,
            scale: 2.0,
        };
        let m = t.model_matrix();
        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-6);
    }
}
