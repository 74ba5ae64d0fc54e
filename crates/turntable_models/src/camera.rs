use bevy::prelude::*;

/// Marks the camera the turntable moves. Exactly one is expected.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct TurntableCamera;

/// Marks the object the turntable orbits. Exactly one is expected.
///
/// Captures are named after the entity's [`Name`]; entities without one use
/// [`TurntableTarget::FALLBACK_NAME`].
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct TurntableTarget;

impl TurntableTarget {
    pub const FALLBACK_NAME: &'static str = "Target";
}
