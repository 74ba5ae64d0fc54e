use bevy::prelude::*;
use turntable_models::config::GlobalConfig;
use turntable_models::debug::WorldInspectorState;

pub struct DebugLogicComponent;

impl Plugin for DebugLogicComponent {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldInspectorState>();
        app.add_systems(Update, toggle_world_inspector);
    }

}

/// Flips [`WorldInspectorState`] when the configured inspector key is pressed.
///
/// # Parameters
/// * `keys` - Keyboard state, absent in headless apps.
/// * `global_config` - Source of the inspector key binding.
/// * `state` - Visibility flag read by the inspector's run condition.
#[cfg_attr(coverage_nightly, coverage(off))]
fn toggle_world_inspector(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    global_config: Res<GlobalConfig>,
    mut state: ResMut<WorldInspectorState>,
) {
    let Some(keys) = keys else {
        return;
    };

    if keys.just_pressed(global_config.input_config.get_inspector_key()) {
        state.0 = !state.0;
        debug!("World inspector visible: {}", state.0);
    }
}
