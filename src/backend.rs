//! Scene-query backend abstraction.
//!
//! The controller never talks to a physics engine directly: it needs two
//! queries (a short raycast and a box overlap test) and a way to commit the
//! resolved position. A backend packages those as systems in the
//! [`PlatformerSet::Probe`](crate::PlatformerSet::Probe) and
//! [`PlatformerSet::Resolve`](crate::PlatformerSet::Resolve) phases:
//!
//! - the probe system feeds
//!   `PlatformerController::run_collision_probe` with a real ray-hit closure;
//! - the resolve system feeds `PlatformerController::move_character` with a
//!   real overlap closure and writes the returned position to the entity's
//!   `Transform`.
//!
//! Both closures are fail-open: when the backend's query service is
//! unavailable, rays miss and overlaps report free space, and the frame
//! proceeds as if the world were empty.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::controller::PlatformerController;
use crate::PlatformerSet;

/// Abstraction over the physics engine's scene queries.
///
/// Implement this trait for each supported physics backend. The crate ships
/// [`Rapier2dBackend`](crate::rapier::Rapier2dBackend) behind the `rapier2d`
/// feature, and [`NoSceneBackend`] for headless logic tests.
pub trait SceneQueryBackend: 'static + Send + Sync {
    /// The plugin registering the backend's probe and resolve systems.
    fn plugin() -> impl Plugin;
}

/// A backend with no scene: every ray misses and every overlap reports free
/// space. Characters accelerate and fall unobstructed.
///
/// Useful for unit-testing controller logic in a real `App` without a
/// physics engine, and as the reference for the fail-open contract.
pub struct NoSceneBackend;

impl SceneQueryBackend for NoSceneBackend {
    fn plugin() -> impl Plugin {
        NoSceneBackendPlugin
    }
}

/// Plugin for [`NoSceneBackend`].
pub struct NoSceneBackendPlugin;

impl Plugin for NoSceneBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                probe_empty_scene.in_set(PlatformerSet::Probe),
                resolve_in_empty_scene.in_set(PlatformerSet::Resolve),
            ),
        );
    }
}

/// Probe against nothing: all faces end up unblocked.
fn probe_empty_scene(
    time: Res<Time>,
    mut query: Query<(&Transform, &ControllerConfig, &mut PlatformerController)>,
) {
    let now = time.elapsed_secs();
    for (transform, config, mut controller) in &mut query {
        if !controller.is_active() {
            continue;
        }
        let center = transform.translation.xy();
        controller.run_collision_probe(center, config, now, |_, _| false);
    }
}

/// Commit the full displacement: nothing to collide with.
fn resolve_in_empty_scene(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &ControllerConfig, &mut PlatformerController)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    for (mut transform, config, mut controller) in &mut query {
        if !controller.is_active() {
            continue;
        }
        let position = transform.translation.xy();
        let next = controller.move_character(position, config, dt, |_| None);
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}
