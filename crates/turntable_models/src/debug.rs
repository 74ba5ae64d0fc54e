use bevy::prelude::*;

/// Represents the state of the World Inspector UI.
///
/// This resource holds a single boolean value indicating whether the World Inspector UI
/// is currently visible or hidden. The state is toggled by the inspector hotkey from
/// the input config.
///
/// The `WorldInspectorState` is initialized to `false` (hidden) by default.
#[derive(Resource, Default, Debug)]
pub struct WorldInspectorState(pub bool);

/// Returns whether the world inspector is currently visible.
/// Safe to call when the resource is absent; defaults to `false`.
pub fn inspector_visible(state: Option<Res<WorldInspectorState>>) -> bool {
    state.is_some_and(|s| s.0)
}
