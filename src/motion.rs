//! Horizontal motion, gravity, and the jump state machine.
//!
//! These passes run after the collision probe and integrate
//! [`MotionState`]'s speeds for the frame, in a fixed order:
//!
//! 1. walk: accelerate toward the input axis, clamp, decelerate, apex
//!    bonus, zero into walls;
//! 2. apex: how close the jump is to its peak, and the fall acceleration
//!    derived from it;
//! 3. gravity: integrate vertical speed, with a multiplier while rising
//!    after an early jump release;
//! 4. jump: coyote/buffered trigger, early cutoff, ceiling zeroing.
//!
//! All passes take `now`/`dt` explicitly; nothing here reads an ambient
//! clock.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::controller::PlatformerController;

/// Integrated speeds and jump bookkeeping. One per controller, written only
/// by the motion passes (and armed by the probe on landing).
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    /// Horizontal speed (units/s). May exceed the clamp near the apex.
    pub horizontal_speed: f32,
    /// Vertical speed (units/s). Positive is up.
    pub vertical_speed: f32,
    /// Current fall acceleration, lerped by the apex point.
    pub fall_acceleration: f32,
    /// Closeness to the jump apex in [0, 1]; 0 while grounded.
    pub apex_point: f32,
    /// The jump control was released while still rising. Starts true so a
    /// character that begins airborne falls at full gravity.
    pub ended_jump_early: bool,
    /// A coyote jump is available. Armed on landing, consumed by jumping.
    pub coyote_usable: bool,
    /// Timestamp of the latest jump-pressed edge; `f32::MIN` before any
    /// press so a fresh controller never sees a phantom buffered jump.
    pub last_jump_pressed: f32,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            horizontal_speed: 0.0,
            vertical_speed: 0.0,
            fall_acceleration: 0.0,
            apex_point: 0.0,
            ended_jump_early: true,
            coyote_usable: false,
            last_jump_pressed: f32::MIN,
        }
    }
}

/// Linear interpolation between `a` and `b`.
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where `value` sits between `a` and `b`, clamped to [0, 1].
pub(crate) fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Step `current` toward `target` by at most `max_delta`, never overshooting.
pub(crate) fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

impl PlatformerController {
    /// Integrate horizontal speed from the input axis.
    pub(crate) fn calculate_walk(&mut self, config: &ControllerConfig, dt: f32) {
        let axis = self.input.horizontal;

        if axis != 0.0 {
            self.motion.horizontal_speed += axis * config.acceleration * dt;
            self.motion.horizontal_speed = self
                .motion
                .horizontal_speed
                .clamp(-config.move_clamp, config.move_clamp);

            // Applied after the clamp: near the apex the character may
            // briefly exceed its normal top speed.
            let apex_bonus = axis.signum() * config.apex_bonus * self.motion.apex_point;
            self.motion.horizontal_speed += apex_bonus * dt;
        } else {
            self.motion.horizontal_speed =
                move_towards(self.motion.horizontal_speed, 0.0, config.deceleration * dt);
        }

        // Don't build up speed into a wall we are already touching.
        if self.motion.horizontal_speed > 0.0 && self.collision.right
            || self.motion.horizontal_speed < 0.0 && self.collision.left
        {
            self.motion.horizontal_speed = 0.0;
        }
    }

    /// Update the apex point and the fall acceleration derived from it.
    pub(crate) fn calculate_jump_apex(&mut self, config: &ControllerConfig) {
        if !self.collision.grounded() {
            self.motion.apex_point = inverse_lerp(
                config.jump_apex_threshold,
                0.0,
                self.motion.vertical_speed.abs(),
            );
            self.motion.fall_acceleration = lerp(
                config.min_fall_acceleration,
                config.max_fall_acceleration,
                self.motion.apex_point,
            );
        } else {
            self.motion.apex_point = 0.0;
        }
    }

    /// Integrate vertical speed.
    pub(crate) fn calculate_gravity(&mut self, config: &ControllerConfig, dt: f32) {
        if self.collision.grounded() {
            // Rest on the ground instead of accumulating downward speed.
            if self.motion.vertical_speed < 0.0 {
                self.motion.vertical_speed = 0.0;
            }
        } else {
            let fall = if self.motion.ended_jump_early && self.motion.vertical_speed > 0.0 {
                self.motion.fall_acceleration * config.early_cutoff_gravity_multiplier
            } else {
                self.motion.fall_acceleration
            };

            self.motion.vertical_speed -= fall * dt;

            if self.motion.vertical_speed < config.fall_clamp {
                self.motion.vertical_speed = config.fall_clamp;
            }
        }
    }

    /// Fire, cut off, and ceiling-limit jumps.
    pub(crate) fn calculate_jump(&mut self, config: &ControllerConfig, now: f32) {
        let can_use_coyote = self.motion.coyote_usable
            && !self.collision.grounded()
            && self.collision.time_left_grounded + config.coyote_time > now;

        // A grounded press lands here too: ingesting the press stamped
        // last_jump_pressed = now, which satisfies the buffer check on the
        // same frame.
        let has_buffered_jump = self.collision.grounded()
            && self.motion.last_jump_pressed + config.jump_buffer_time > now;

        if (self.input.jump_pressed && can_use_coyote) || has_buffered_jump {
            self.motion.vertical_speed = config.jump_speed;
            self.motion.ended_jump_early = false;
            self.motion.coyote_usable = false;
            // Consume the coyote window so it cannot re-trigger mid-air.
            self.collision.time_left_grounded = f32::MIN;
            self.jumped_this_frame = true;
        } else {
            self.jumped_this_frame = false;
        }

        if !self.collision.grounded()
            && self.input.jump_released
            && !self.motion.ended_jump_early
            && self.motion.vertical_speed > 0.0
        {
            self.motion.ended_jump_early = true;
        }

        if self.collision.up && self.motion.vertical_speed > 0.0 {
            self.motion.vertical_speed = 0.0;
        }
    }
}
