#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod capture_logic;
pub mod debug_logic;
pub mod orbit;
pub mod orbit_logic;
pub mod rig;
pub mod scene_logic;

use bevy::prelude::*;
use crate::capture_logic::CaptureLogicComponent;
use crate::debug_logic::DebugLogicComponent;
use crate::orbit_logic::OrbitLogicComponent;

/// All turntable behaviour: commands, the orbit driver, screenshots and the
/// inspector toggle. Insert a [`turntable_models::config::GlobalConfig`]
/// resource before adding it, otherwise the defaults are used.
pub struct TurntableLogicPlugin;

impl Plugin for TurntableLogicPlugin {

    #[cfg_attr(coverage_nightly, coverage(off))]
    fn build(&self, app: &mut App) {
        app.add_plugins((OrbitLogicComponent, CaptureLogicComponent, DebugLogicComponent));
    }
}
