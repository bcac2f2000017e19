//! # `bevy_raycast_platformer`
//!
//! A raycast-probed kinematic 2D platformer character controller with
//! physics backend abstraction.
//!
//! This crate provides a tight, tuneable platformer movement core that:
//! - Probes the environment with fans of short raycasts on all four faces
//!   of the character's bounding box
//! - Accelerates, clamps, and decelerates horizontal movement, with an
//!   extra speed bonus near the jump apex
//! - Runs a jump state machine with coyote time, jump buffering,
//!   early-release cutoff, and apex-sensitive gravity
//! - Resolves movement kinematically with a sub-stepped overlap search, so
//!   the character never tunnels and catches ledges it grazes
//! - Abstracts the physics backend for easy swapping (Rapier2D included)
//!
//! ## Architecture
//!
//! The controller is **kinematic**: the physics engine is only a scene-query
//! service. Each fixed update:
//! 1. Raycast fans fill the controller's collision state (backend)
//! 2. Walk, gravity, and jump passes integrate the speeds (core)
//! 3. A sub-stepped overlap search resolves the displacement and commits it
//!    to the `Transform` (backend)
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use bevy_raycast_platformer::prelude::*;
//!
//! // Components for a playable character
//! let controller = PlatformerController::new();
//! let config = ControllerConfig::player();
//! let input = FrameInput::new();
//!
//! // Spawn these together with a Transform and the backend's physics
//! // components, then rebuild `FrameInput` from your input layer each frame.
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod controller;
pub mod input;
pub mod motion;
pub mod mover;
pub mod probe;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{NoSceneBackend, SceneQueryBackend};
    pub use crate::config::ControllerConfig;
    pub use crate::controller::{PlatformerController, PlatformerView};
    pub use crate::input::FrameInput;
    pub use crate::probe::CollisionState;
    pub use crate::state::{Airborne, Grounded, TouchingWall};
    pub use crate::{PlatformerControllerPlugin, PlatformerSet};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{KinematicCharacterBundle, Rapier2dBackend};
}

/// Phases of the per-frame controller pipeline, chained in `FixedUpdate`.
///
/// Core systems fill `Prepare`, `Motion`, and `Finalize`; the active backend
/// contributes `Probe` (collision detection) and `Resolve` (movement
/// commitment).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformerSet {
    /// Activation, velocity observation, input ingestion.
    Prepare,
    /// Four-direction raycast probe (backend).
    Probe,
    /// Walk, gravity, and jump integration.
    Motion,
    /// Sub-stepped movement resolution and position commit (backend).
    Resolve,
    /// State marker synchronization.
    Finalize,
}

/// Main plugin for the platformer controller.
///
/// Generic over a [`SceneQueryBackend`] `B` which supplies the raycast and
/// overlap queries (e.g. [`Rapier2dBackend`](rapier::Rapier2dBackend)).
///
/// # Examples
///
/// With the Rapier2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use bevy_raycast_platformer::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(PlatformerControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct PlatformerControllerPlugin<B: backend::SceneQueryBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::SceneQueryBackend> Default for PlatformerControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::SceneQueryBackend> Plugin for PlatformerControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::ControllerConfig>();
        app.register_type::<controller::PlatformerController>();
        app.register_type::<input::FrameInput>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<state::TouchingWall>();

        // Phase ordering for the whole pipeline; the backend slots its
        // systems into Probe and Resolve.
        app.configure_sets(
            FixedUpdate,
            (
                PlatformerSet::Prepare,
                PlatformerSet::Probe,
                PlatformerSet::Motion,
                PlatformerSet::Resolve,
                PlatformerSet::Finalize,
            )
                .chain(),
        );

        // Add the scene-query backend plugin
        app.add_plugins(B::plugin());

        app.add_systems(
            FixedUpdate,
            (
                systems::tick_activation,
                systems::derive_velocity,
                systems::ingest_input,
            )
                .chain()
                .in_set(PlatformerSet::Prepare),
        );
        app.add_systems(
            FixedUpdate,
            (
                systems::calculate_walk,
                systems::calculate_gravity,
                systems::calculate_jump,
            )
                .chain()
                .in_set(PlatformerSet::Motion),
        );
        app.add_systems(
            FixedUpdate,
            systems::sync_state_markers.in_set(PlatformerSet::Finalize),
        );
    }
}
