//! Rapier2D scene-query backend.
//!
//! This module provides the scene-query backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.
//!
//! The backend never steps the character through Rapier's dynamics: the
//! character carries a kinematic position-based body, the probe system
//! raycasts with `RapierContext::cast_ray`, and the resolve system tests
//! candidate positions with `RapierContext::intersection_with_shape` before
//! committing the result straight to the `Transform`.

use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;

use crate::backend::SceneQueryBackend;
use crate::config::ControllerConfig;
use crate::controller::PlatformerController;
use crate::PlatformerSet;

/// Rapier2D scene-query backend for the platformer controller.
///
/// Collision probing and movement resolution are handled by dedicated
/// Rapier systems that receive `RapierContext` as a system parameter; when
/// no context is available yet (e.g. the first frames after startup) the
/// queries fail open and the world is treated as empty.
pub struct Rapier2dBackend;

impl SceneQueryBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }
}

/// Plugin that sets up the Rapier2D-specific systems for the controller.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                rapier_collision_probe.in_set(PlatformerSet::Probe),
                rapier_resolve_movement.in_set(PlatformerSet::Resolve),
            ),
        );
    }
}

/// Query filter for a character's scene queries: never hit the character's
/// own body or any sensor, and respect its collision groups if it has any.
fn character_filter(
    entity: Entity,
    collision_groups: Option<(Group, Group)>,
) -> QueryFilter<'static> {
    let mut filter = QueryFilter::default()
        .exclude_rigid_body(entity)
        .exclude_sensors();

    if let Some((memberships, filters)) = collision_groups {
        filter = filter.groups(CollisionGroups::new(memberships, filters));
    }

    filter
}

/// Fill each controller's collision state from four raycast fans.
fn rapier_collision_probe(
    rapier_context: ReadRapierContext,
    time: Res<Time>,
    mut q_controllers: Query<(
        Entity,
        &Transform,
        &ControllerConfig,
        &mut PlatformerController,
        Option<&CollisionGroups>,
    )>,
) {
    let context = rapier_context.single().ok();
    let now = time.elapsed_secs();

    for (entity, transform, config, mut controller, collision_groups) in &mut q_controllers {
        if !controller.is_active() {
            continue;
        }

        let center = transform.translation.xy();
        let max_distance = config.detection_ray_length;

        // Inherit collision groups from the character's collider
        let collision_groups_tuple = collision_groups.map(|cg| (cg.memberships, cg.filters));

        let ray_hit = |origin: Vec2, direction: Vec2| -> bool {
            let Some(context) = context.as_ref() else {
                // No query service yet: fail open.
                return false;
            };
            context
                .cast_ray(
                    origin,
                    direction,
                    max_distance,
                    true, // solid = true for solid hits
                    character_filter(entity, collision_groups_tuple),
                )
                .is_some()
        };

        controller.run_collision_probe(center, config, now, ray_hit);
    }
}

/// Resolve each controller's displacement against solid geometry and commit
/// the result to its `Transform`.
fn rapier_resolve_movement(
    rapier_context: ReadRapierContext,
    time: Res<Time>,
    q_obstacles: Query<&GlobalTransform>,
    mut q_controllers: Query<(
        Entity,
        &mut Transform,
        &ControllerConfig,
        &mut PlatformerController,
        Option<&CollisionGroups>,
    )>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let context = rapier_context.single().ok();

    for (entity, mut transform, config, mut controller, collision_groups) in &mut q_controllers {
        if !controller.is_active() {
            continue;
        }

        let position = transform.translation.xy();
        let half = config.half_extents();
        let shape = Collider::cuboid(half.x, half.y);
        let collision_groups_tuple = collision_groups.map(|cg| (cg.memberships, cg.filters));

        let overlap = |center: Vec2| -> Option<Vec2> {
            let context = context.as_ref()?;
            let hit = context.query_pipeline.intersection_with_shape(
                context.colliders,
                context.rigidbody_set,
                center,
                0.0,
                &shape,
                character_filter(entity, collision_groups_tuple),
            )?;
            // The obstacle's center drives the ledge nudge. Falling back to
            // the query point makes the nudge a no-op rather than garbage
            // when the hit entity has no transform.
            let obstacle_center = q_obstacles
                .get(hit)
                .map(|t| t.translation().xy())
                .unwrap_or(center);
            Some(obstacle_center)
        };

        let next = controller.move_character(position, config, dt, overlap);
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

/// Physics components for a kinematic platformer character.
///
/// The controller owns the character's position, so the body is kinematic
/// position-based: Rapier tracks the `Transform` the resolve system writes
/// and never applies forces to it.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use bevy_raycast_platformer::prelude::*;
///
/// fn spawn_player(mut commands: Commands) {
///     let config = ControllerConfig::player();
///     let half = config.half_extents();
///     commands.spawn((
///         Transform::from_xyz(0.0, 2.0, 0.0),
///         PlatformerController::new(),
///         config,
///         FrameInput::new(),
///         KinematicCharacterBundle::default(),
///         Collider::cuboid(half.x, half.y),
///     ));
/// }
/// ```
#[derive(Bundle)]
pub struct KinematicCharacterBundle {
    /// The rigid body type; kinematic position-based.
    pub rigid_body: RigidBody,
    /// Collision groups, inherited by the character's scene queries.
    pub collision_groups: CollisionGroups,
}

impl Default for KinematicCharacterBundle {
    fn default() -> Self {
        Self {
            rigid_body: RigidBody::KinematicPositionBased,
            collision_groups: CollisionGroups::default(),
        }
    }
}

impl KinematicCharacterBundle {
    /// Create the bundle with specific collision groups.
    pub fn with_collision_groups(memberships: Group, filters: Group) -> Self {
        Self {
            collision_groups: CollisionGroups::new(memberships, filters),
            ..Self::default()
        }
    }
}
