// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Graphics math allowances — casts are intentional and safe
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::many_single_char_names)]

//! Interactive 3D text scene built on wgpu.
//!
//! Glyphfield renders a fixed string as extruded, matcap-shaded 3D text
//! centered at the origin, surrounded by a field of randomly scattered
//! torus meshes. The camera orbits the origin on a sphere, driven by
//! double-click-gated mouse dragging with exponential smoothing.
//!
//! # Key entry points
//!
//! - [`viewer::Viewer`] - standalone winit window running the scene
//! - [`engine::GlyphEngine`] - the rendering engine behind the viewer
//! - [`scene::Scene`] - entity storage and readiness tracking
//! - [`options::Options`] - runtime configuration (scene, assets, orbit)
//!
//! # Architecture
//!
//! The engine renders every frame regardless of load state. Two
//! background loader threads (matcap image, typeface JSON) deliver
//! their results over an mpsc channel; the engine drains the channel
//! each frame and upgrades [`scene::SceneReadiness`] from camera-only
//! to fully loaded as assets arrive. A load failure is logged and the
//! scene simply stays partial.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
pub mod viewer;

pub use error::SceneError;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
pub use viewer::Viewer;
