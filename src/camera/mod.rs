//! Perspective camera, GPU uniform, and the orbit motion integrator.

pub mod controller;
pub mod core;
pub mod orbit;

pub use controller::CameraController;
pub use core::{Camera, CameraUniform};
pub use orbit::OrbitState;
