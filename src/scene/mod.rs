//! Scene storage: the text mesh, the torus field, and readiness
//! tracking for assets that are still loading.

pub mod loader;
pub mod mesh;
pub mod tessellate;
pub mod text;
pub mod torus;
pub mod typeface;

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

pub use loader::{LoadEvent, SceneLoader};
pub use mesh::{Aabb, InstanceRaw, MeshData, MeshVertex, Transform};
pub use text::TextStyle;
pub use typeface::Typeface;

/// Number of decorative tori scattered around the text.
pub const DECORATION_COUNT: usize = 100;
/// Half-extent of the cube the tori are scattered in.
pub const FIELD_EXTENT: f32 = 5.0;
/// Uniform scale range for each torus.
pub const SCALE_RANGE: std::ops::Range<f32> = 0.5..1.0;

/// How much of the scene has finished loading.
///
/// The render loop never waits on this: it renders whatever is
/// present, so the user sees an empty viewport, then text and tori,
/// then the matcap-shaded final scene as each load completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneReadiness {
    /// Only the camera exists; both loads are still pending.
    CameraOnly,
    /// Text and tori are built but the matcap is still the
    /// placeholder.
    TextLoaded,
    /// Typeface and matcap have both resolved.
    FullyLoaded,
}

/// One renderable entity.
#[derive(Debug, Clone)]
pub enum SceneEntity {
    /// The extruded text mesh, drawn at a fixed centering offset.
    Text {
        /// Mesh in baseline coordinates.
        mesh: MeshData,
        /// Translation that centers the bounding box on the origin.
        offset: Vec3,
    },
    /// One torus of the decoration field.
    Torus {
        /// World placement of this torus.
        transform: Transform,
    },
}

/// The authoritative scene. Owns all entities in a flat list.
pub struct Scene {
    entities: Vec<SceneEntity>,
    readiness: SceneReadiness,
    matcap_loaded: bool,
    /// Set on any mutation; cleared when the renderer re-uploads.
    dirty: bool,
}

impl Scene {
    /// Create an empty, camera-only scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            readiness: SceneReadiness::CameraOnly,
            matcap_loaded: false,
            dirty: false,
        }
    }

    /// All entities in insertion order.
    #[must_use]
    pub fn entities(&self) -> &[SceneEntity] {
        &self.entities
    }

    /// Current load readiness.
    #[must_use]
    pub fn readiness(&self) -> SceneReadiness {
        self.readiness
    }

    /// Whether entity data changed since the last
    /// [`mark_uploaded`](Self::mark_uploaded).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after the renderer consumed the entities.
    pub fn mark_uploaded(&mut self) {
        self.dirty = false;
    }

    /// Record that the matcap texture resolved.
    pub fn matcap_arrived(&mut self) {
        self.matcap_loaded = true;
        self.update_readiness();
    }

    /// Install the loaded text mesh and scatter the torus field.
    ///
    /// The text is centered by translating it by the negative of its
    /// bounding-box midpoint, then [`DECORATION_COUNT`] tori are added
    /// with independently randomized position, X/Y rotation, and
    /// uniform scale.
    pub fn install_text<R: Rng>(&mut self, mesh: MeshData, rng: &mut R) {
        let offset = mesh.aabb().map_or(Vec3::ZERO, |b| -b.center());
        self.entities.push(SceneEntity::Text { mesh, offset });

        for _ in 0..DECORATION_COUNT {
            self.entities.push(SceneEntity::Torus {
                transform: Transform {
                    position: Vec3::new(
                        rng.random_range(-FIELD_EXTENT..FIELD_EXTENT),
                        rng.random_range(-FIELD_EXTENT..FIELD_EXTENT),
                        rng.random_range(-FIELD_EXTENT..FIELD_EXTENT),
                    ),
                    rotation: Vec3::new(
                        rng.random_range(0.0..PI),
                        rng.random_range(0.0..PI),
                        0.0,
                    ),
                    scale: rng.random_range(SCALE_RANGE),
                },
            });
        }

        self.dirty = true;
        self.update_readiness();
    }

    fn update_readiness(&mut self) {
        let text_loaded = !self.entities.is_empty();
        self.readiness = match (text_loaded, self.matcap_loaded) {
            (true, true) => SceneReadiness::FullyLoaded,
            (true, false) => SceneReadiness::TextLoaded,
            // Matcap alone does not change what geometry exists
            (false, _) => SceneReadiness::CameraOnly,
        };
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
