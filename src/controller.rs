//! The central controller hub component.
//!
//! [`PlatformerController`] owns everything the per-frame pipeline reads and
//! writes: the frame's input copy, the collision probe results, the motion
//! integration state, and the observable outputs. Exactly one collision
//! state and one motion state exist per character, and only the crate's
//! systems mutate them; consumers observe through [`PlatformerView`] or the
//! read accessors.

use bevy::prelude::*;

use crate::input::FrameInput;
use crate::motion::MotionState;
use crate::probe::CollisionState;

/// Central state hub for one platformer character.
///
/// Spawn it alongside a [`ControllerConfig`](crate::config::ControllerConfig),
/// a [`FrameInput`], a `Transform`, and the active backend's physics
/// components. The controller is kinematic: it computes a displacement each
/// fixed update and the backend commits it to the `Transform` directly.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct PlatformerController {
    /// Copy of the input snapshot that produced this frame's motion.
    pub(crate) input: FrameInput,
    /// Four-direction probe results and grounded-transition bookkeeping.
    pub(crate) collision: CollisionState,
    /// Integrated horizontal/vertical speeds and jump state.
    pub(crate) motion: MotionState,
    /// Observed velocity: position delta over dt, measured at frame start.
    pub(crate) velocity: Vec2,
    /// The speeds handed to the movement resolver this frame.
    pub(crate) raw_movement: Vec2,
    /// A jump fired this frame.
    pub(crate) jumped_this_frame: bool,
    /// Position at the previous frame start; None until the first active
    /// frame.
    pub(crate) last_position: Option<Vec2>,
    /// Fixed-clock timestamp of the first update seen; None until then.
    pub(crate) spawned_at: Option<f32>,
    /// The activation delay has elapsed.
    pub(crate) active: bool,
}

impl Default for PlatformerController {
    fn default() -> Self {
        Self {
            input: FrameInput::default(),
            collision: CollisionState::default(),
            motion: MotionState::default(),
            velocity: Vec2::ZERO,
            raw_movement: Vec2::ZERO,
            jumped_this_frame: false,
            last_position: None,
            spawned_at: None,
            active: false,
        }
    }
}

impl PlatformerController {
    /// Create a controller in its pre-activation state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the activation delay has elapsed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the down face is in ground contact.
    pub fn grounded(&self) -> bool {
        self.collision.grounded()
    }

    /// The probe results for the current frame.
    pub fn collision(&self) -> &CollisionState {
        &self.collision
    }

    /// Integrated horizontal speed (units/s).
    pub fn horizontal_speed(&self) -> f32 {
        self.motion.horizontal_speed
    }

    /// Integrated vertical speed (units/s).
    pub fn vertical_speed(&self) -> f32 {
        self.motion.vertical_speed
    }

    /// Closeness to the jump apex in [0, 1].
    pub fn apex_point(&self) -> f32 {
        self.motion.apex_point
    }

    /// The current jump was cut short by releasing the control while rising.
    pub fn ended_jump_early(&self) -> bool {
        self.motion.ended_jump_early
    }

    /// A coyote jump is still available after walking off a ledge.
    pub fn coyote_usable(&self) -> bool {
        self.motion.coyote_usable
    }

    /// Stamp the first update and flip to active once the delay elapses.
    /// Returns the new active state.
    pub(crate) fn tick_activation(&mut self, now: f32, delay: f32) -> bool {
        let spawned = *self.spawned_at.get_or_insert(now);
        self.active = now - spawned >= delay;
        self.active
    }

    /// Derive the observed velocity from the position delta since the last
    /// frame start. Runs before the frame's movement is resolved, so it
    /// reports the movement the previous frame actually achieved.
    pub(crate) fn update_observed_velocity(&mut self, position: Vec2, dt: f32) {
        if let Some(last) = self.last_position {
            self.velocity = (position - last) / dt;
        }
        self.last_position = Some(position);
    }

    /// Adopt this frame's input snapshot and stamp the jump-buffer timestamp
    /// on a press edge.
    pub(crate) fn ingest_input(&mut self, input: FrameInput, now: f32) {
        self.input = input;
        if input.jump_pressed {
            self.motion.last_jump_pressed = now;
        }
    }
}

/// Read-only observation surface of a controller.
///
/// Downstream consumers (animation, camera, audio, debug overlays) depend on
/// this trait rather than on the component's internals.
pub trait PlatformerView {
    /// Velocity observed over the last frame, as position delta over dt.
    fn velocity(&self) -> Vec2;
    /// The input snapshot driving the current frame.
    fn input(&self) -> FrameInput;
    /// Ground contact on the down face.
    fn grounded(&self) -> bool;
    /// A jump fired this frame.
    fn jumped_this_frame(&self) -> bool;
    /// Ground contact began this frame.
    fn landed_this_frame(&self) -> bool;
    /// The speeds handed to the movement resolver this frame, before
    /// collision resolution.
    fn raw_movement(&self) -> Vec2;
}

impl PlatformerView for PlatformerController {
    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn input(&self) -> FrameInput {
        self.input
    }

    fn grounded(&self) -> bool {
        self.collision.grounded()
    }

    fn jumped_this_frame(&self) -> bool {
        self.jumped_this_frame
    }

    fn landed_this_frame(&self) -> bool {
        self.collision.landed_this_frame
    }

    fn raw_movement(&self) -> Vec2 {
        self.raw_movement
    }
}
