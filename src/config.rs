//! Controller configuration.
//!
//! [`ControllerConfig`] collects every tuning knob of the controller:
//! collision probe geometry, horizontal motion, gravity and jump behavior,
//! movement resolution, and the activation delay. It is a plain `Copy`
//! component so presets can be shared and tweaked per entity.

use bevy::prelude::*;

/// Tuning parameters for a platformer character.
///
/// All fields are public for direct construction; builder methods are
/// provided for the common adjustments. Distances are in world units,
/// speeds in units per second, accelerations in units per second squared.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use bevy_raycast_platformer::prelude::*;
///
/// let config = ControllerConfig::default()
///     .with_bounds(Vec2::new(0.9, 1.9))
///     .with_jump_speed(35.0)
///     .with_coyote_time(0.12);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct ControllerConfig {
    // --- Collision probe ---
    /// Size of the character's bounding box.
    pub bounds: Vec2,
    /// Rays cast per face. Values below 2 behave as 2 (see [`Self::detectors`]).
    pub detector_count: u32,
    /// Length of each probe ray, cast outward from the face.
    pub detection_ray_length: f32,
    /// Inset applied to each fan's endpoints so corner rays do not register
    /// geometry belonging to the perpendicular faces.
    pub ray_buffer: f32,

    // --- Walking ---
    /// Horizontal acceleration while input is held.
    pub acceleration: f32,
    /// Maximum horizontal speed from acceleration alone.
    pub move_clamp: f32,
    /// Deceleration toward zero when no input is held.
    pub deceleration: f32,
    /// Extra horizontal acceleration near the jump apex, applied after the
    /// clamp.
    pub apex_bonus: f32,

    // --- Gravity ---
    /// Most negative vertical speed allowed (terminal fall speed).
    pub fall_clamp: f32,
    /// Fall acceleration far from the jump apex.
    pub min_fall_acceleration: f32,
    /// Fall acceleration at the jump apex.
    pub max_fall_acceleration: f32,

    // --- Jumping ---
    /// Vertical speed set when a jump fires.
    pub jump_speed: f32,
    /// |vertical speed| below which the apex point rises toward 1.
    pub jump_apex_threshold: f32,
    /// Seconds after leaving a ledge during which a jump still fires.
    pub coyote_time: f32,
    /// Seconds before landing during which a jump press is remembered.
    pub jump_buffer_time: f32,
    /// Gravity multiplier while rising after the jump control was released.
    pub early_cutoff_gravity_multiplier: f32,

    // --- Movement resolution ---
    /// Sub-steps searched when the full displacement overlaps geometry.
    /// Values below 2 behave as 2 (see [`Self::iterations`]).
    pub free_collider_iterations: u32,

    // --- Activation ---
    /// Seconds after spawn before the controller starts updating. Covers
    /// scene-query warmup on the first frames.
    pub activation_delay: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            bounds: Vec2::new(0.8, 1.8),
            detector_count: 3,
            detection_ray_length: 0.1,
            ray_buffer: 0.1,
            acceleration: 90.0,
            move_clamp: 13.0,
            deceleration: 60.0,
            apex_bonus: 2.0,
            fall_clamp: -40.0,
            min_fall_acceleration: 80.0,
            max_fall_acceleration: 120.0,
            jump_speed: 30.0,
            jump_apex_threshold: 10.0,
            coyote_time: 0.1,
            jump_buffer_time: 0.1,
            early_cutoff_gravity_multiplier: 3.0,
            free_collider_iterations: 10,
            activation_delay: 0.5,
        }
    }
}

impl ControllerConfig {
    /// Default tuning for a player character.
    pub fn player() -> Self {
        Self::default()
    }

    /// Tuning for simple AI walkers: no apex finesse, shorter hops, no
    /// input grace windows.
    pub fn ai() -> Self {
        Self {
            apex_bonus: 0.0,
            jump_speed: 20.0,
            coyote_time: 0.0,
            jump_buffer_time: 0.0,
            ..Self::default()
        }
    }

    /// Probe ray count per face, clamped to the minimum the inclusive
    /// sampling formula supports.
    pub fn detectors(&self) -> u32 {
        self.detector_count.max(2)
    }

    /// Movement-resolution sub-step count, clamped so the search always
    /// tests at least one intermediate position.
    pub fn iterations(&self) -> u32 {
        self.free_collider_iterations.max(2)
    }

    /// Half extents of the bounding box.
    pub fn half_extents(&self) -> Vec2 {
        self.bounds * 0.5
    }

    /// Set the bounding box size.
    pub fn with_bounds(mut self, bounds: Vec2) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the probe ray count per face.
    pub fn with_detector_count(mut self, count: u32) -> Self {
        self.detector_count = count;
        self
    }

    /// Set the probe ray length.
    pub fn with_detection_ray_length(mut self, length: f32) -> Self {
        self.detection_ray_length = length;
        self
    }

    /// Set horizontal acceleration, top speed, and deceleration.
    pub fn with_walk(mut self, acceleration: f32, move_clamp: f32, deceleration: f32) -> Self {
        self.acceleration = acceleration;
        self.move_clamp = move_clamp;
        self.deceleration = deceleration;
        self
    }

    /// Set the jump launch speed.
    pub fn with_jump_speed(mut self, speed: f32) -> Self {
        self.jump_speed = speed;
        self
    }

    /// Set the coyote-time window.
    pub fn with_coyote_time(mut self, seconds: f32) -> Self {
        self.coyote_time = seconds;
        self
    }

    /// Set the jump-buffer window.
    pub fn with_jump_buffer_time(mut self, seconds: f32) -> Self {
        self.jump_buffer_time = seconds;
        self
    }

    /// Set the fall-acceleration range (far from apex, at apex) and the
    /// terminal fall speed.
    pub fn with_gravity(mut self, min_fall: f32, max_fall: f32, fall_clamp: f32) -> Self {
        self.min_fall_acceleration = min_fall;
        self.max_fall_acceleration = max_fall;
        self.fall_clamp = fall_clamp;
        self
    }

    /// Set the activation delay.
    pub fn with_activation_delay(mut self, seconds: f32) -> Self {
        self.activation_delay = seconds;
        self
    }
}
