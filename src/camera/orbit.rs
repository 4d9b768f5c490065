//! Orbit state: drag-gated rotation targets and the per-frame
//! exponential-smoothing integrator.
//!
//! The state machine matches the interaction model of the scene:
//! double-click toggles orbiting on and off, and while orbiting is
//! enabled a held mouse button drives the rotation targets from the
//! normalized cursor position. Each frame the current angles move a
//! fixed fraction of the remaining distance toward the targets, and the
//! eye is placed on a sphere around the origin.

use std::f32::consts::TAU;

use glam::Vec3;

/// Fraction of the remaining target distance covered per frame.
const SMOOTHING: f32 = 0.1;

/// Rotation targets, smoothed angles, and interaction flags.
///
/// Single-writer split: the input processor writes `target_*` and the
/// flags; [`step`](Self::step) writes `current_*` and produces the eye
/// position.
#[derive(Debug, Clone)]
pub struct OrbitState {
    /// Target rotation angle driven by horizontal cursor position.
    pub target_x: f32,
    /// Target rotation angle driven by vertical cursor position.
    pub target_y: f32,
    /// Smoothed rotation angle, converging toward `target_x`.
    pub current_x: f32,
    /// Smoothed rotation angle, converging toward `target_y`.
    pub current_y: f32,
    /// Orbit radius (distance of the eye from the origin).
    radius: f32,
    /// Whether orbiting is enabled (toggled by double-click).
    enabled: bool,
    /// Whether the mouse is held down while orbiting is enabled.
    dragging: bool,
}

impl OrbitState {
    /// Create an idle orbit state at angle zero with the given radius.
    #[must_use]
    pub fn new(radius: f32) -> Self {
        Self {
            target_x: 0.0,
            target_y: 0.0,
            current_x: 0.0,
            current_y: 0.0,
            radius,
            enabled: false,
            dragging: false,
        }
    }

    /// Whether orbiting is currently enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a drag is currently active.
    #[must_use]
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Toggle orbiting (double-click). Independent of the drag state;
    /// returns the new enabled value.
    pub fn toggle_enabled(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Mouse-down: arms the drag, but only while orbiting is enabled.
    pub fn press(&mut self) {
        if self.enabled {
            self.dragging = true;
        }
    }

    /// Mouse-up: unconditionally disarms the drag.
    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Aim the rotation targets from a cursor position in pixels.
    ///
    /// `target_x = (x/width − 0.5)·2π`, `target_y = −(y/height − 0.5)·2π`
    /// (the sign inversion is deliberate: the camera rotates opposite
    /// the raw cursor displacement). Ignored unless orbiting is enabled
    /// and a drag is active, so the targets freeze at their last value
    /// the moment either flag drops.
    pub fn aim(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if !(self.enabled && self.dragging) {
            return;
        }
        self.target_x = (x / width - 0.5) * TAU;
        self.target_y = -(y / height - 0.5) * TAU;
    }

    /// Advance the integrator by one frame.
    ///
    /// When orbiting and dragging, moves each current angle 10% of the
    /// way to its target and returns the new eye position on the orbit
    /// sphere. Otherwise returns `None` and mutates nothing: motion
    /// freezes in place rather than resetting.
    ///
    /// The eye formula is `(sin(cx)·r, sin(cy)·r, cos(cx)·r)` — the
    /// vertical term rides on top of the X/Z circle instead of being a
    /// true latitude, which is the intended motion, so the X/Z pair
    /// always satisfies `x² + z² = r²`.
    pub fn step(&mut self) -> Option<Vec3> {
        if !(self.enabled && self.dragging) {
            return None;
        }
        self.current_x += (self.target_x - self.current_x) * SMOOTHING;
        self.current_y += (self.target_y - self.current_y) * SMOOTHING;
        Some(Vec3::new(
            self.current_x.sin() * self.radius,
            self.current_y.sin() * self.radius,
            self.current_x.cos() * self.radius,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed(radius: f32) -> OrbitState {
        let mut orbit = OrbitState::new(radius);
        let _ = orbit.toggle_enabled();
        orbit.press();
        orbit
    }

    #[test]
    fn press_has_no_effect_while_disabled() {
        let mut orbit = OrbitState::new(5.0);
        orbit.press();
        assert!(!orbit.dragging());
        assert!(orbit.step().is_none());
    }

    #[test]
    fn release_always_disarms() {
        let mut orbit = armed(5.0);
        assert!(orbit.dragging());
        orbit.release();
        assert!(!orbit.dragging());
        // Toggling off with a held button also stops integration
        let mut orbit = armed(5.0);
        let _ = orbit.toggle_enabled();
        assert!(orbit.step().is_none());
    }

    #[test]
    fn toggle_flips_exactly_once_per_call() {
        let mut orbit = OrbitState::new(5.0);
        assert!(orbit.toggle_enabled());
        assert!(!orbit.toggle_enabled());
        assert!(orbit.toggle_enabled());
        // Independent of the drag flag
        orbit.press();
        assert!(!orbit.toggle_enabled());
        assert!(orbit.dragging());
    }

    #[test]
    fn aim_maps_normalized_cursor_to_angles() {
        let mut orbit = armed(5.0);
        orbit.aim(600.0, 150.0, 800.0, 600.0);
        let px = 600.0 / 800.0_f32;
        let py = 150.0 / 600.0_f32;
        assert!((orbit.target_x - (px - 0.5) * TAU).abs() < 1e-6);
        assert!((orbit.target_y - -((py - 0.5) * TAU)).abs() < 1e-6);
    }

    #[test]
    fn aim_freezes_targets_when_gated_off() {
        let mut orbit = armed(5.0);
        orbit.aim(800.0, 0.0, 800.0, 600.0);
        let (tx, ty) = (orbit.target_x, orbit.target_y);
        orbit.release();
        orbit.aim(0.0, 600.0, 800.0, 600.0);
        assert_eq!(orbit.target_x, tx);
        assert_eq!(orbit.target_y, ty);
    }

    #[test]
    fn step_converges_geometrically() {
        let mut orbit = armed(5.0);
        orbit.aim(800.0, 300.0, 800.0, 600.0);
        let mut remaining = (orbit.target_x - orbit.current_x).abs();
        for _ in 0..50 {
            let _ = orbit.step();
            let next = (orbit.target_x - orbit.current_x).abs();
            assert!((next - remaining * 0.9).abs() < 1e-4);
            remaining = next;
        }
    }

    #[test]
    fn eye_stays_on_orbit_sphere_in_xz() {
        let mut orbit = armed(5.0);
        orbit.aim(790.0, 20.0, 800.0, 600.0);
        for _ in 0..200 {
            if let Some(eye) = orbit.step() {
                let xz = eye.x * eye.x + eye.z * eye.z;
                assert!((xz - 25.0).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn gated_step_is_a_noop() {
        let mut orbit = armed(5.0);
        orbit.aim(700.0, 100.0, 800.0, 600.0);
        let _ = orbit.step();
        let snapshot = (orbit.current_x, orbit.current_y);
        orbit.release();
        assert!(orbit.step().is_none());
        assert_eq!((orbit.current_x, orbit.current_y), snapshot);
    }
}
