//! State marker components.
//!
//! These components mirror the controller's probe results as markers so
//! game systems can filter queries on them (`With<Grounded>`,
//! `Added<Grounded>`, and so on). They are added and removed by
//! `sync_state_markers` each fixed update; nothing else should write them.

use bevy::prelude::*;

/// Marker component indicating the character is grounded.
///
/// Present while the down-face probe reports ground contact. Mutually
/// exclusive with [`Airborne`].
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use bevy_raycast_platformer::prelude::*;
///
/// fn play_landing_dust(query: Query<&Transform, Added<Grounded>>) {
///     for transform in &query {
///         // landing effect at transform.translation
///     }
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Present while the down-face probe reports no ground contact.
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Marker component indicating a side face is in wall contact.
///
/// Present while the left and/or right probe reports a hit.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component)]
pub struct TouchingWall {
    /// The left face is blocked.
    pub left: bool,
    /// The right face is blocked.
    pub right: bool,
}

impl TouchingWall {
    /// Create a wall-contact marker.
    pub fn new(left: bool, right: bool) -> Self {
        Self { left, right }
    }

    /// Wall on the left only.
    pub fn is_left(&self) -> bool {
        self.left && !self.right
    }

    /// Wall on the right only.
    pub fn is_right(&self) -> bool {
        self.right && !self.left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_wall_sides() {
        let wall = TouchingWall::new(true, false);
        assert!(wall.is_left());
        assert!(!wall.is_right());

        let wall = TouchingWall::new(false, true);
        assert!(wall.is_right());
        assert!(!wall.is_left());
    }

    #[test]
    fn touching_wall_both_sides_is_neither_exclusive() {
        // Squeezed in a shaft: both faces blocked.
        let wall = TouchingWall::new(true, true);
        assert!(!wall.is_left());
        assert!(!wall.is_right());
    }
}
