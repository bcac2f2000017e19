//! Four-direction collision probe.
//!
//! Each frame, short rays are fanned out from the four faces of the
//! character's bounding box. A face is "blocked" when any of its rays hits
//! solid geometry. The down face additionally tracks grounded transitions:
//! the moment the ground was left (feeding coyote time) and the landing
//! frame (re-arming coyote and feeding jump buffering).
//!
//! Ray queries go through a closure so the probe itself stays independent of
//! the physics backend and directly unit-testable. A backend that cannot
//! answer queries passes a closure that always misses; the probe then
//! reports every face unblocked (fail-open).

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::controller::PlatformerController;

/// One face's ray fan: the segment ray origins are sampled along, plus the
/// outward cast direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayFan {
    /// First ray origin.
    pub start: Vec2,
    /// Last ray origin.
    pub end: Vec2,
    /// Cast direction, unit length, pointing out of the face.
    pub dir: Vec2,
}

impl RayFan {
    /// Fan along the bottom edge, casting down. Endpoints are inset on X by
    /// `buffer` so corner rays do not see the walls beside the character.
    pub fn down(bounds: Rect, buffer: f32) -> Self {
        Self {
            start: Vec2::new(bounds.min.x + buffer, bounds.min.y),
            end: Vec2::new(bounds.max.x - buffer, bounds.min.y),
            dir: Vec2::NEG_Y,
        }
    }

    /// Fan along the top edge, casting up.
    pub fn up(bounds: Rect, buffer: f32) -> Self {
        Self {
            start: Vec2::new(bounds.min.x + buffer, bounds.max.y),
            end: Vec2::new(bounds.max.x - buffer, bounds.max.y),
            dir: Vec2::Y,
        }
    }

    /// Fan along the left edge, casting left. Endpoints are inset on Y by
    /// `buffer` so corner rays do not see the floor or ceiling.
    pub fn left(bounds: Rect, buffer: f32) -> Self {
        Self {
            start: Vec2::new(bounds.min.x, bounds.min.y + buffer),
            end: Vec2::new(bounds.min.x, bounds.max.y - buffer),
            dir: Vec2::NEG_X,
        }
    }

    /// Fan along the right edge, casting right.
    pub fn right(bounds: Rect, buffer: f32) -> Self {
        Self {
            start: Vec2::new(bounds.max.x, bounds.min.y + buffer),
            end: Vec2::new(bounds.max.x, bounds.max.y - buffer),
            dir: Vec2::X,
        }
    }

    /// Cast `detectors` rays evenly along the fan, endpoints inclusive.
    /// Returns true on the first hit. `detectors` must be >= 2
    /// ([`ControllerConfig::detectors`] guarantees this).
    pub fn any_hit(&self, detectors: u32, hit: &mut impl FnMut(Vec2, Vec2) -> bool) -> bool {
        for i in 0..detectors {
            let t = i as f32 / (detectors - 1) as f32;
            let origin = self.start.lerp(self.end, t);
            if hit(origin, self.dir) {
                return true;
            }
        }
        false
    }
}

/// Results of the four-direction probe, plus grounded-transition
/// bookkeeping. One per controller, written only by the probe.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct CollisionState {
    /// Ceiling contact within detection range.
    pub up: bool,
    /// Wall contact on the right within detection range.
    pub right: bool,
    /// Ground contact within detection range.
    pub down: bool,
    /// Wall contact on the left within detection range.
    pub left: bool,
    /// Timestamp of the most recent grounded-to-airborne transition.
    /// `f32::MIN` until the first such transition, and reset to `f32::MIN`
    /// when a jump consumes the coyote window.
    pub time_left_grounded: f32,
    /// Ground contact began this frame.
    pub landed_this_frame: bool,
    /// Ground contact ended this frame.
    pub left_ground_this_frame: bool,
}

impl Default for CollisionState {
    fn default() -> Self {
        Self {
            up: false,
            right: false,
            down: false,
            left: false,
            time_left_grounded: f32::MIN,
            landed_this_frame: false,
            left_ground_this_frame: false,
        }
    }
}

impl CollisionState {
    /// Ground contact on the down face.
    pub fn grounded(&self) -> bool {
        self.down
    }

    /// Any face blocked.
    pub fn any(&self) -> bool {
        self.up || self.right || self.down || self.left
    }
}

impl PlatformerController {
    /// Run the four-direction probe from the box centered at `center`.
    ///
    /// `ray_hit(origin, dir)` answers whether a ray of the configured
    /// detection length hits solid geometry; the backend builds it, and a
    /// backend without a live query service answers false everywhere.
    pub(crate) fn run_collision_probe(
        &mut self,
        center: Vec2,
        config: &ControllerConfig,
        now: f32,
        mut ray_hit: impl FnMut(Vec2, Vec2) -> bool,
    ) {
        let bounds = Rect::from_center_size(center, config.bounds);
        let buffer = config.ray_buffer;
        let detectors = config.detectors();

        self.collision.landed_this_frame = false;
        self.collision.left_ground_this_frame = false;

        let grounded = RayFan::down(bounds, buffer).any_hit(detectors, &mut ray_hit);

        if self.collision.down && !grounded {
            // Walked off a ledge: start the coyote window.
            self.collision.time_left_grounded = now;
            self.collision.left_ground_this_frame = true;
        } else if !self.collision.down && grounded {
            // Touched down: re-arm coyote for the next ledge.
            self.motion.coyote_usable = true;
            self.collision.landed_this_frame = true;
        }

        self.collision.down = grounded;
        self.collision.up = RayFan::up(bounds, buffer).any_hit(detectors, &mut ray_hit);
        self.collision.left = RayFan::left(bounds, buffer).any_hit(detectors, &mut ray_hit);
        self.collision.right = RayFan::right(bounds, buffer).any_hit(detectors, &mut ray_hit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ControllerConfig {
        ControllerConfig::default().with_bounds(Vec2::new(1.0, 2.0))
    }

    // ==================== Fan Geometry Tests ====================

    #[test]
    fn fans_sit_on_faces_with_inset() {
        let bounds = Rect::from_center_size(Vec2::new(10.0, 20.0), Vec2::new(1.0, 2.0));
        let buffer = 0.1;

        let down = RayFan::down(bounds, buffer);
        assert_eq!(down.start, Vec2::new(9.6, 19.0));
        assert_eq!(down.end, Vec2::new(10.4, 19.0));
        assert_eq!(down.dir, Vec2::NEG_Y);

        let up = RayFan::up(bounds, buffer);
        assert_eq!(up.start.y, 21.0);
        assert_eq!(up.dir, Vec2::Y);

        let left = RayFan::left(bounds, buffer);
        assert_eq!(left.start, Vec2::new(9.5, 19.1));
        assert_eq!(left.end, Vec2::new(9.5, 20.9));
        assert_eq!(left.dir, Vec2::NEG_X);

        let right = RayFan::right(bounds, buffer);
        assert_eq!(right.start.x, 10.5);
        assert_eq!(right.dir, Vec2::X);
    }

    #[test]
    fn any_hit_samples_inclusive_endpoints() {
        let fan = RayFan {
            start: Vec2::ZERO,
            end: Vec2::new(1.0, 0.0),
            dir: Vec2::NEG_Y,
        };

        let mut origins = Vec::new();
        fan.any_hit(3, &mut |origin, _| {
            origins.push(origin);
            false
        });

        // PROOF: 3 detectors sample t = 0, 0.5, 1 including both endpoints.
        assert_eq!(
            origins,
            vec![Vec2::ZERO, Vec2::new(0.5, 0.0), Vec2::new(1.0, 0.0)]
        );
    }

    #[test]
    fn any_hit_stops_at_first_hit() {
        let fan = RayFan {
            start: Vec2::ZERO,
            end: Vec2::new(1.0, 0.0),
            dir: Vec2::NEG_Y,
        };

        let mut casts = 0;
        let hit = fan.any_hit(5, &mut |origin, _| {
            casts += 1;
            origin.x >= 0.25
        });

        assert!(hit);
        // t = 0 misses, t = 0.25 hits; the remaining three rays are skipped.
        assert_eq!(casts, 2);
    }

    #[test]
    fn any_hit_middle_only() {
        let fan = RayFan {
            start: Vec2::new(-1.0, 0.0),
            end: Vec2::new(1.0, 0.0),
            dir: Vec2::NEG_Y,
        };

        // Hit only near x = 0: two detectors (endpoints only) miss it,
        // three find it.
        let mut narrow = |origin: Vec2, _| origin.x.abs() < 0.1;
        assert!(!fan.any_hit(2, &mut narrow));
        assert!(fan.any_hit(3, &mut narrow));
    }

    // ==================== Probe State Tests ====================

    #[test]
    fn faces_report_independently() {
        let mut controller = PlatformerController::new();
        let config = test_config();

        // Solid geometry below and to the right only.
        controller.run_collision_probe(Vec2::ZERO, &config, 0.0, |_, dir| {
            dir == Vec2::NEG_Y || dir == Vec2::X
        });

        assert!(controller.collision.down);
        assert!(controller.collision.right);
        assert!(!controller.collision.up);
        assert!(!controller.collision.left);
    }

    #[test]
    fn fail_open_when_queries_miss() {
        let mut controller = PlatformerController::new();
        controller.collision.down = true;
        let config = test_config();

        // PROOF: an unavailable query service reports every face unblocked
        // rather than keeping stale contact flags.
        controller.run_collision_probe(Vec2::ZERO, &config, 1.0, |_, _| false);

        assert!(!controller.collision.any());
        assert!(controller.collision.left_ground_this_frame);
    }

    #[test]
    fn leaving_ground_stamps_coyote_window() {
        let mut controller = PlatformerController::new();
        let config = test_config();

        controller.run_collision_probe(Vec2::ZERO, &config, 1.0, |_, dir| dir == Vec2::NEG_Y);
        assert!(controller.collision.grounded());
        assert_eq!(controller.collision.time_left_grounded, f32::MIN);

        controller.run_collision_probe(Vec2::ZERO, &config, 2.5, |_, _| false);
        assert!(!controller.collision.grounded());
        assert!(controller.collision.left_ground_this_frame);
        assert_eq!(controller.collision.time_left_grounded, 2.5);

        // Still airborne next frame: the stamp is not refreshed.
        controller.run_collision_probe(Vec2::ZERO, &config, 3.0, |_, _| false);
        assert!(!controller.collision.left_ground_this_frame);
        assert_eq!(controller.collision.time_left_grounded, 2.5);
    }

    #[test]
    fn landing_arms_coyote_and_flags_once() {
        let mut controller = PlatformerController::new();
        let config = test_config();
        assert!(!controller.motion.coyote_usable);

        controller.run_collision_probe(Vec2::ZERO, &config, 1.0, |_, dir| dir == Vec2::NEG_Y);
        assert!(controller.collision.landed_this_frame);
        assert!(controller.motion.coyote_usable);

        // PROOF: the landing flag is true only on the transition frame.
        controller.run_collision_probe(Vec2::ZERO, &config, 1.1, |_, dir| dir == Vec2::NEG_Y);
        assert!(!controller.collision.landed_this_frame);
        assert!(controller.collision.grounded());
    }

    #[test]
    fn detector_count_below_two_still_samples_both_endpoints() {
        let mut controller = PlatformerController::new();
        let config = test_config().with_detector_count(1);

        let mut per_face = 0;
        controller.run_collision_probe(Vec2::ZERO, &config, 0.0, |_, dir| {
            if dir == Vec2::NEG_Y {
                per_face += 1;
            }
            false
        });

        assert_eq!(per_face, 2);
    }
}
