//! Sub-stepped movement resolution.
//!
//! The controller is kinematic, so collision response happens here rather
//! than in the physics engine. The full frame displacement is tested with a
//! single overlap query at the destination; only when that overlaps does the
//! resolver walk interpolated sub-steps to find the furthest free position.
//! The common case (open space) costs one query.
//!
//! Overlap queries go through a closure returning the obstacle's center, so
//! the resolver is a pure function over any geometry; the backends supply
//! the real query, the tests supply synthetic boxes.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::controller::PlatformerController;

/// Result of resolving one frame of movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Position to commit.
    pub position: Vec2,
    /// Vertical speed after resolution (zeroed on a downward graze).
    pub vertical_speed: f32,
    /// The ledge nudge fired: the committed position was pushed away from
    /// the obstacle and was not re-checked for overlap.
    pub nudged: bool,
}

/// Resolve a displacement of `(horizontal_speed, vertical_speed) * dt` from
/// `position` against solid geometry.
///
/// `overlap(center)` returns the obstacle's center when the character's box
/// placed at `center` overlaps solid geometry, `None` when the space is free
/// (or the query service is unavailable, which fails open).
///
/// When even the first sub-step overlaps, the move is a graze: downward
/// speed is zeroed and the position is nudged away from the obstacle's
/// center by the displacement length, which slides the character around
/// ledge corners instead of sticking to them.
pub fn resolve_movement(
    position: Vec2,
    horizontal_speed: f32,
    vertical_speed: f32,
    dt: f32,
    iterations: u32,
    mut overlap: impl FnMut(Vec2) -> Option<Vec2>,
) -> MoveOutcome {
    let movement = Vec2::new(horizontal_speed, vertical_speed) * dt;
    let furthest = position + movement;

    let Some(obstacle_center) = overlap(furthest) else {
        return MoveOutcome {
            position: furthest,
            vertical_speed,
            nudged: false,
        };
    };

    let mut committed = position;
    let mut vertical_speed = vertical_speed;

    for i in 1..iterations {
        let t = i as f32 / iterations as f32;
        let candidate = position.lerp(furthest, t);

        if overlap(candidate).is_some() {
            let mut nudged = false;

            if i == 1 {
                // Even the smallest sub-step is blocked: we are grazing the
                // obstacle. Land on it if falling, and slide away from its
                // center to catch the ledge.
                if vertical_speed < 0.0 {
                    vertical_speed = 0.0;
                }
                let away = (committed - obstacle_center).normalize_or_zero();
                committed += away * movement.length();
                nudged = away != Vec2::ZERO;
            }

            return MoveOutcome {
                position: committed,
                vertical_speed,
                nudged,
            };
        }

        committed = candidate;
    }

    // The destination overlapped but no sub-step did; the two query paths
    // disagree near an edge. Commit the last free sub-step.
    MoveOutcome {
        position: committed,
        vertical_speed,
        nudged: false,
    }
}

impl PlatformerController {
    /// Resolve this frame's movement from `position`. Records the attempted
    /// speeds as `raw_movement`, adopts the corrected vertical speed, and
    /// returns the position to commit.
    pub(crate) fn move_character(
        &mut self,
        position: Vec2,
        config: &ControllerConfig,
        dt: f32,
        overlap: impl FnMut(Vec2) -> Option<Vec2>,
    ) -> Vec2 {
        self.raw_movement = Vec2::new(
            self.motion.horizontal_speed,
            self.motion.vertical_speed,
        );

        let outcome = resolve_movement(
            position,
            self.motion.horizontal_speed,
            self.motion.vertical_speed,
            dt,
            config.iterations(),
            overlap,
        );

        self.motion.vertical_speed = outcome.vertical_speed;
        outcome.position
    }
}
