//! Converts raw platform events into orbit-state mutations.
//!
//! The `InputProcessor` owns the transient input state (cursor
//! tracking, double-click timing) and is the single writer of the
//! orbit targets and interaction flags. The smoothed angles and the
//! camera itself are written only by the integrator.

use crate::camera::orbit::OrbitState;
use crate::input::event::InputEvent;
use crate::input::mouse::ClickTracker;

/// Applies [`InputEvent`]s to an [`OrbitState`].
///
/// Event semantics, mirroring the pointer gestures of the scene:
/// - a double-click (two rapid presses) toggles orbiting;
/// - a press arms the drag if orbiting is enabled;
/// - a release always disarms;
/// - cursor motion re-aims the rotation targets while armed.
///
/// On the second press of a double-click the drag is armed *before*
/// the toggle fires, matching platform ordering where `mousedown`
/// precedes `dblclick`.
pub struct InputProcessor {
    clicks: ClickTracker,
    cursor: (f32, f32),
}

impl InputProcessor {
    /// Create a processor with no press history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clicks: ClickTracker::new(),
            cursor: (0.0, 0.0),
        }
    }

    /// Last observed cursor position in physical pixels.
    #[must_use]
    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    /// Process one event against the orbit state.
    ///
    /// `viewport` is the current surface size in pixels, used to
    /// normalize the cursor position for target angles.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        viewport: (u32, u32),
        orbit: &mut OrbitState,
    ) {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.cursor = (x, y);
                orbit.aim(
                    x,
                    y,
                    viewport.0.max(1) as f32,
                    viewport.1.max(1) as f32,
                );
            }
            InputEvent::MouseButton { pressed: true, .. } => {
                orbit.press();
                if self.clicks.handle_press() {
                    let enabled = orbit.toggle_enabled();
                    log::debug!(
                        "orbit {}",
                        if enabled { "enabled" } else { "disabled" }
                    );
                    if !enabled {
                        orbit.release();
                    }
                }
            }
            InputEvent::MouseButton { pressed: false, .. } => {
                orbit.release();
            }
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use super::*;
    use crate::input::event::MouseButton;

    const VIEWPORT: (u32, u32) = (800, 600);

    fn press() -> InputEvent {
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        }
    }

    fn release() -> InputEvent {
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        }
    }

    /// Two rapid presses; the release between them keeps the drag flag
    /// honest.
    fn double_click(processor: &mut InputProcessor, orbit: &mut OrbitState) {
        processor.handle_event(press(), VIEWPORT, orbit);
        processor.handle_event(release(), VIEWPORT, orbit);
        processor.handle_event(press(), VIEWPORT, orbit);
        processor.handle_event(release(), VIEWPORT, orbit);
    }

    #[test]
    fn double_click_toggles_orbiting() {
        let mut processor = InputProcessor::new();
        let mut orbit = OrbitState::new(5.0);
        double_click(&mut processor, &mut orbit);
        assert!(orbit.enabled());
        double_click(&mut processor, &mut orbit);
        assert!(!orbit.enabled());
    }

    #[test]
    fn drag_requires_orbiting_enabled() {
        let mut processor = InputProcessor::new();
        let mut orbit = OrbitState::new(5.0);

        processor.handle_event(press(), VIEWPORT, &mut orbit);
        assert!(!orbit.dragging());
        processor.handle_event(
            InputEvent::CursorMoved { x: 700.0, y: 100.0 },
            VIEWPORT,
            &mut orbit,
        );
        assert_eq!(orbit.target_x, 0.0);
        assert_eq!(orbit.target_y, 0.0);
    }

    #[test]
    fn armed_drag_updates_targets_from_cursor() {
        let mut processor = InputProcessor::new();
        let mut orbit = OrbitState::new(5.0);
        double_click(&mut processor, &mut orbit);

        processor.handle_event(press(), VIEWPORT, &mut orbit);
        assert!(orbit.dragging());
        processor.handle_event(
            InputEvent::CursorMoved { x: 800.0, y: 0.0 },
            VIEWPORT,
            &mut orbit,
        );
        assert!((orbit.target_x - 0.5 * TAU).abs() < 1e-6);
        assert!((orbit.target_y - 0.5 * TAU).abs() < 1e-6);

        processor.handle_event(release(), VIEWPORT, &mut orbit);
        assert!(!orbit.dragging());
    }

    #[test]
    fn disabling_toggle_also_ends_the_drag() {
        let mut processor = InputProcessor::new();
        let mut orbit = OrbitState::new(5.0);
        double_click(&mut processor, &mut orbit);

        // Second double-click: its presses would arm the drag, but the
        // toggle lands after and must leave the state fully idle.
        double_click(&mut processor, &mut orbit);
        assert!(!orbit.enabled());
        assert!(!orbit.dragging());
    }

    #[test]
    fn cursor_is_tracked_regardless_of_state() {
        let mut processor = InputProcessor::new();
        let mut orbit = OrbitState::new(5.0);
        processor.handle_event(
            InputEvent::CursorMoved { x: 12.0, y: 34.0 },
            VIEWPORT,
            &mut orbit,
        );
        assert_eq!(processor.cursor(), (12.0, 34.0));
    }
}
