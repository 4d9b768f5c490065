//! GPU-facing camera wrapper: owns the perspective camera, its uniform
//! buffer, and the frame-by-frame application of orbit motion.

use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::camera::core::{Camera, CameraUniform};
use crate::camera::orbit::OrbitState;
use crate::gpu::render_context::RenderContext;

/// Vertical field of view in degrees.
const FOVY: f32 = 75.0;

/// Initial eye position: straight back from the origin on the orbit
/// sphere.
const INITIAL_EYE: Vec3 = Vec3::new(0.0, 0.0, 5.0);

/// Owns the [`Camera`] plus its GPU uniform resources.
///
/// The orbit integrator is the only writer of the eye position after
/// construction; the viewport resize path is the only writer of the
/// aspect ratio.
pub struct CameraController {
    /// The perspective camera.
    pub camera: Camera,
    /// CPU-side uniform mirror of the camera.
    pub uniform: CameraUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout for group 0 (camera).
    pub layout: wgpu::BindGroupLayout,
    /// Bind group exposing the uniform buffer.
    pub bind_group: wgpu::BindGroup,
}

impl CameraController {
    /// Create the camera at its initial pose and allocate GPU
    /// resources.
    #[must_use]
    pub fn new(context: &RenderContext) -> Self {
        let camera = Camera {
            eye: INITIAL_EYE,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: context.aspect(),
            fovy: FOVY,
            znear: 0.1,
            zfar: 100.0,
        };

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group = context.device.create_bind_group(
            &wgpu::BindGroupDescriptor {
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
                label: Some("Camera Bind Group"),
            },
        );

        Self {
            camera,
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Advance the orbit integrator one frame and, if it produced
    /// motion, move the eye and re-aim at the origin.
    pub fn step(&mut self, orbit: &mut OrbitState) {
        if let Some(eye) = orbit.step() {
            self.camera.eye = eye;
            self.camera.target = Vec3::ZERO;
        }
    }

    /// Update the viewport aspect ratio after a resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Recompute the uniform from the camera and write it to the GPU.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update_view_proj(&self.camera);
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );
    }
}
