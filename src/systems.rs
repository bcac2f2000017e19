//! Core controller systems.
//!
//! These run in `FixedUpdate` between the backend's probe and resolve
//! systems (see the phase ordering in [`crate::PlatformerSet`]). Each system
//! is a thin iteration layer; the actual math lives on
//! [`PlatformerController`] so it stays directly unit-testable.

use bevy::log::debug;
use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::controller::PlatformerController;
use crate::input::FrameInput;
use crate::state::{Airborne, Grounded, TouchingWall};

/// Stamp spawn times and flip controllers active once their delay elapses.
pub fn tick_activation(
    time: Res<Time>,
    mut query: Query<(Entity, &ControllerConfig, &mut PlatformerController)>,
) {
    let now = time.elapsed_secs();
    for (entity, config, mut controller) in &mut query {
        let was_active = controller.is_active();
        if controller.tick_activation(now, config.activation_delay) && !was_active {
            debug!("platformer controller {entity} activated");
        }
    }
}

/// Derive the observed velocity from the position delta since last frame.
/// Runs before this frame's movement so it reports what actually happened.
pub fn derive_velocity(
    time: Res<Time>,
    mut query: Query<(&Transform, &mut PlatformerController)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    for (transform, mut controller) in &mut query {
        if !controller.is_active() {
            continue;
        }
        let position = transform.translation.xy();
        controller.update_observed_velocity(position, dt);
    }
}

/// Copy this frame's input snapshot into the controller and stamp the
/// jump-buffer timestamp on a press edge.
pub fn ingest_input(
    time: Res<Time>,
    mut query: Query<(&FrameInput, &mut PlatformerController)>,
) {
    let now = time.elapsed_secs();
    for (input, mut controller) in &mut query {
        if !controller.is_active() {
            continue;
        }
        controller.ingest_input(*input, now);
    }
}

/// Integrate horizontal speed from the input axis.
pub fn calculate_walk(
    time: Res<Time>,
    mut query: Query<(&ControllerConfig, &mut PlatformerController)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    for (config, mut controller) in &mut query {
        if !controller.is_active() {
            continue;
        }
        controller.calculate_walk(config, dt);
    }
}

/// Update the apex point and integrate vertical speed.
pub fn calculate_gravity(
    time: Res<Time>,
    mut query: Query<(&ControllerConfig, &mut PlatformerController)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    for (config, mut controller) in &mut query {
        if !controller.is_active() {
            continue;
        }
        controller.calculate_jump_apex(config);
        controller.calculate_gravity(config, dt);
    }
}

/// Fire, cut off, and ceiling-limit jumps.
pub fn calculate_jump(
    time: Res<Time>,
    mut query: Query<(&ControllerConfig, &mut PlatformerController)>,
) {
    let now = time.elapsed_secs();
    for (config, mut controller) in &mut query {
        if !controller.is_active() {
            continue;
        }
        controller.calculate_jump(config, now);
    }
}

/// Mirror the probe results onto the marker components.
pub fn sync_state_markers(
    mut commands: Commands,
    query: Query<(
        Entity,
        &PlatformerController,
        Has<Grounded>,
        Has<Airborne>,
        Option<&TouchingWall>,
    )>,
) {
    for (entity, controller, has_grounded, has_airborne, wall) in &query {
        if !controller.is_active() {
            continue;
        }
        let collision = controller.collision();

        if collision.grounded() {
            if !has_grounded {
                commands.entity(entity).insert(Grounded).remove::<Airborne>();
            }
        } else if !has_airborne {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }

        if collision.left || collision.right {
            let contact = TouchingWall::new(collision.left, collision.right);
            if wall != Some(&contact) {
                commands.entity(entity).insert(contact);
            }
        } else if wall.is_some() {
            commands.entity(entity).remove::<TouchingWall>();
        }
    }
}
