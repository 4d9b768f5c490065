//! Standalone viewer window backed by winit.
//!
//! ```no_run
//! # use glyphfield::Viewer;
//! Viewer::builder().build().run().unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    engine::GlyphEngine, error::SceneError, options::Options, InputEvent,
    MouseButton,
};

/// Cap on the device scale factor, matching the usual limit for
/// high-DPI rendering cost.
const MAX_SCALE_FACTOR: f64 = 2.0;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Options,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: Options::default(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the text to display.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.options.scene.text = text.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays the scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window
    /// is closed.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Viewer`] when the event loop cannot be
    /// created or exits with an error.
    pub fn run(self) -> Result<(), SceneError> {
        let event_loop =
            EventLoop::new().map_err(|e| SceneError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            options: self.options,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| SceneError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<GlyphEngine>,
    options: Options,
}

/// Factor that maps window pixels to surface pixels once the scale
/// factor exceeds [`MAX_SCALE_FACTOR`] (1.0 below the cap). Cursor
/// positions must shrink by the same factor as the surface, or
/// normalized aim coordinates leave [0, 1] on high-DPI displays.
fn scale_shrink(scale_factor: f64) -> f64 {
    if scale_factor > MAX_SCALE_FACTOR {
        MAX_SCALE_FACTOR / scale_factor
    } else {
        1.0
    }
}

/// Compute the wgpu surface size from the window dimensions, capping
/// the effective scale factor at [`MAX_SCALE_FACTOR`].
fn viewport_size(
    inner: winit::dpi::PhysicalSize<u32>,
    scale_factor: f64,
) -> (u32, u32) {
    let shrink = scale_shrink(scale_factor);
    (
        ((f64::from(inner.width) * shrink) as u32).max(1),
        ((f64::from(inner.height) * shrink) as u32).max(1),
    )
}

impl ViewerApp {
    fn resize_to_window(&mut self) {
        let Some(window) = &self.window else { return };
        let (vp_w, vp_h) =
            viewport_size(window.inner_size(), window.scale_factor());
        if let Some(engine) = &mut self.engine {
            engine.resize(vp_w, vp_h);
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.options.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.options.window.width,
                self.options.window.height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = viewport_size(window.inner_size(), window.scale_factor());
        let engine = match pollster::block_on(GlyphEngine::new(
            window.clone(),
            size,
            &self.options,
        )) {
            Ok(e) => e,
            Err(e) => {
                log::error!("failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(_)
            | WindowEvent::ScaleFactorChanged { .. } => {
                self.resize_to_window();
            }

            WindowEvent::RedrawRequested => {
                if let Some(engine) = &mut self.engine {
                    engine.update();
                    match engine.render() {
                        Ok(()) => {}
                        Err(
                            wgpu::SurfaceError::Outdated
                            | wgpu::SurfaceError::Lost,
                        ) => self.resize_to_window(),
                        Err(e) => {
                            log::error!("render error: {e:?}");
                        }
                    }
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = state == ElementState::Pressed;
                if let Some(engine) = &mut self.engine {
                    engine.handle_input(InputEvent::MouseButton {
                        button: MouseButton::from(button),
                        pressed,
                    });
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let shrink = self
                    .window
                    .as_ref()
                    .map_or(1.0, |w| scale_shrink(w.scale_factor()));
                if let Some(engine) = &mut self.engine {
                    engine.handle_input(InputEvent::CursorMoved {
                        x: (position.x * shrink) as f32,
                        y: (position.y * shrink) as f32,
                    });
                }
            }

            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalSize;

    use super::*;

    #[test]
    fn viewport_matches_window_below_the_scale_cap() {
        assert_eq!(
            viewport_size(PhysicalSize::new(1280, 720), 1.0),
            (1280, 720)
        );
        assert_eq!(
            viewport_size(PhysicalSize::new(2560, 1440), 2.0),
            (2560, 1440)
        );
    }

    #[test]
    fn viewport_shrinks_when_scale_exceeds_the_cap() {
        // 3x display renders as if it were 2x
        assert_eq!(
            viewport_size(PhysicalSize::new(3840, 2160), 3.0),
            (2560, 1440)
        );
    }

    #[test]
    fn viewport_never_collapses_to_zero() {
        assert_eq!(viewport_size(PhysicalSize::new(0, 0), 1.0), (1, 1));
    }

    #[test]
    fn cursor_and_viewport_shrink_by_the_same_factor() {
        let inner = PhysicalSize::new(3840, 2160);
        let (vp_w, _) = viewport_size(inner, 3.0);
        let cursor_x = (f64::from(inner.width) * scale_shrink(3.0)) as f32;
        // A cursor at the window edge normalizes to exactly 1.0
        assert_eq!(cursor_x, vp_w as f32);
    }

    #[test]
    fn edge_cursor_aims_at_most_half_a_turn_on_high_dpi() {
        use std::f32::consts::PI;

        use crate::camera::OrbitState;
        use crate::input::InputProcessor;

        let inner = PhysicalSize::new(3840, 2160);
        let viewport = viewport_size(inner, 3.0);
        let shrink = scale_shrink(3.0);

        let mut processor = InputProcessor::new();
        let mut orbit = OrbitState::new(5.0);
        // Double-click to enable, then a press to arm the drag
        for _ in 0..3 {
            processor.handle_event(
                InputEvent::MouseButton {
                    button: MouseButton::Left,
                    pressed: true,
                },
                viewport,
                &mut orbit,
            );
        }
        assert!(orbit.enabled() && orbit.dragging());

        processor.handle_event(
            InputEvent::CursorMoved {
                x: (f64::from(inner.width) * shrink) as f32,
                y: (f64::from(inner.height) * shrink) as f32,
            },
            viewport,
            &mut orbit,
        );
        assert!((orbit.target_x - PI).abs() < 1e-5);
        assert!((orbit.target_y + PI).abs() < 1e-5);
    }
}
