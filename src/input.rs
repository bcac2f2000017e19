//! Per-frame input snapshot.
//!
//! The host game gathers input however it likes (keyboard, gamepad, replay,
//! AI) and rebuilds a [`FrameInput`] on the character each frame. The
//! controller never reads input devices itself.

use bevy::prelude::*;

/// Input snapshot driving a character for one frame.
///
/// `jump_pressed` and `jump_released` are edge flags: true only on the frame
/// the control went down or up. The host is responsible for clearing them
/// once consumed (see [`FrameInput::clear_edges`]).
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Default)]
#[reflect(Component)]
pub struct FrameInput {
    /// The jump control went down this frame.
    pub jump_pressed: bool,
    /// The jump control went up this frame.
    pub jump_released: bool,
    /// Horizontal axis in [-1, 1]. Positive is right.
    pub horizontal: f32,
}

impl FrameInput {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal axis, clamped to [-1, 1].
    pub fn set_horizontal(&mut self, axis: f32) {
        self.horizontal = axis.clamp(-1.0, 1.0);
    }

    /// Record a jump-pressed edge for this frame.
    pub fn press_jump(&mut self) {
        self.jump_pressed = true;
    }

    /// Record a jump-released edge for this frame.
    pub fn release_jump(&mut self) {
        self.jump_released = true;
    }

    /// Clear both edge flags. Call after each frame's snapshot has been
    /// consumed; the axis persists.
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.jump_released = false;
    }

    /// Whether any horizontal movement is requested.
    pub fn is_moving(&self) -> bool {
        self.horizontal != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Axis Tests ====================

    #[test]
    fn horizontal_is_clamped() {
        let mut input = FrameInput::new();

        input.set_horizontal(2.5);
        assert_eq!(input.horizontal, 1.0);

        input.set_horizontal(-7.0);
        assert_eq!(input.horizontal, -1.0);

        input.set_horizontal(0.3);
        assert_eq!(input.horizontal, 0.3);
    }

    #[test]
    fn is_moving() {
        let mut input = FrameInput::new();
        assert!(!input.is_moving());

        input.set_horizontal(0.1);
        assert!(input.is_moving());
    }

    // ==================== Edge Tests ====================

    #[test]
    fn edges_set_and_clear() {
        let mut input = FrameInput::new();
        input.press_jump();
        input.release_jump();
        input.set_horizontal(1.0);

        assert!(input.jump_pressed);
        assert!(input.jump_released);

        input.clear_edges();

        assert!(!input.jump_pressed);
        assert!(!input.jump_released);
        // The axis is level-triggered and survives the clear.
        assert_eq!(input.horizontal, 1.0);
    }
}
