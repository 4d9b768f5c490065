//! The render engine: owns the GPU context, camera, scene, and
//! renderer, and advances them once per frame.

use std::time::{Duration, Instant};

use crate::camera::controller::CameraController;
use crate::camera::orbit::OrbitState;
use crate::error::SceneError;
use crate::gpu::render_context::RenderContext;
use crate::input::event::InputEvent;
use crate::input::processor::InputProcessor;
use crate::options::Options;
use crate::renderer::MatcapRenderer;
use crate::scene::loader::{LoadEvent, SceneLoader};
use crate::scene::text::TextStyle;
use crate::scene::{Scene, SceneReadiness};
use crate::util::frame_timing::FrameTiming;

/// Interval between FPS log lines.
const FPS_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Everything needed to run the scene against one window surface.
pub struct GlyphEngine {
    context: RenderContext,
    camera: CameraController,
    orbit: OrbitState,
    input: InputProcessor,
    scene: Scene,
    loader: SceneLoader,
    renderer: MatcapRenderer,
    timing: FrameTiming,
    last_fps_log: Instant,
}

impl GlyphEngine {
    /// Initialize the GPU context and kick off the asset loads.
    ///
    /// The window opens with an empty scene; geometry and the matcap
    /// arrive through the loader channel on later frames.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Gpu`] when the wgpu context cannot be
    /// created.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: &Options,
    ) -> Result<Self, SceneError> {
        let context = RenderContext::new(window, size).await?;
        let camera = CameraController::new(&context);
        let renderer = MatcapRenderer::new(&context, &camera.layout);

        let style = TextStyle {
            size: options.scene.size,
            depth: options.scene.depth,
            curve_segments: options.scene.curve_segments,
        };
        let loader =
            SceneLoader::spawn(&options.assets, &options.scene.text, style);

        Ok(Self {
            context,
            camera,
            orbit: OrbitState::new(options.orbit.radius),
            input: InputProcessor::new(),
            scene: Scene::new(),
            loader,
            renderer,
            timing: FrameTiming::new(options.window.target_fps),
            last_fps_log: Instant::now(),
        })
    }

    /// Resize the surface, the depth buffer, and the camera aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.camera.resize(width, height);
        self.renderer.resize(&self.context);
    }

    /// Feed one input event through the orbit state machine.
    pub fn handle_input(&mut self, event: InputEvent) {
        let viewport =
            (self.context.config.width, self.context.config.height);
        self.input.handle_event(event, viewport, &mut self.orbit);
    }

    /// Advance one frame: absorb finished loads, integrate the orbit,
    /// and push the camera uniform to the GPU.
    pub fn update(&mut self) {
        for event in self.loader.poll() {
            match event {
                LoadEvent::Matcap {
                    pixels,
                    width,
                    height,
                } => {
                    self.renderer.set_matcap(
                        &self.context,
                        &pixels,
                        width,
                        height,
                    );
                    self.scene.matcap_arrived();
                    log::info!("matcap texture ready ({width}x{height})");
                }
                LoadEvent::Text { mesh } => {
                    self.scene.install_text(mesh, &mut rand::rng());
                    log::info!(
                        "text mesh ready, scene has {} entities",
                        self.scene.entities().len()
                    );
                }
            }
        }

        if self.scene.is_dirty() {
            self.renderer.upload_scene(&self.context, &self.scene);
            self.scene.mark_uploaded();
        }

        self.camera.step(&mut self.orbit);
        self.camera.update_gpu(&self.context.queue);
    }

    /// Draw the current frame, honoring the FPS cap.
    ///
    /// # Errors
    ///
    /// Propagates [`wgpu::SurfaceError`]; `Lost`/`Outdated` are handled
    /// by the caller with a resize.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.timing.should_render() {
            return Ok(());
        }
        self.renderer.render(&self.context, &self.camera.bind_group)?;
        self.timing.end_frame();

        if self.last_fps_log.elapsed() >= FPS_LOG_INTERVAL {
            log::debug!("{:.1} fps", self.timing.fps());
            self.last_fps_log = Instant::now();
        }
        Ok(())
    }

    /// Current load readiness, for status reporting.
    #[must_use]
    pub fn readiness(&self) -> SceneReadiness {
        self.scene.readiness()
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.timing.fps()
    }
}
