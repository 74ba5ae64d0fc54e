#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod camera;
pub mod capture;
pub mod config;
pub mod debug;
pub mod error;
pub mod key_utils;
pub mod session;

use bevy::prelude::*;
use crate::camera::{TurntableCamera, TurntableTarget};
use crate::config::OrbitSettings;
use crate::session::OrbitSession;

/// Core of all turntable relevant resources and structures. This Plugin registers the
/// marker components and the orbit state for reflection so they show up in the world
/// inspector. This Plugin is registered in the main.rs file.
pub struct TurntableCorePlugin;

impl Plugin for TurntableCorePlugin {

    #[cfg_attr(coverage_nightly, coverage(off))]
    fn build(&self, app: &mut App) {
        app
            .register_type::<TurntableCamera>()
            .register_type::<TurntableTarget>()
            .register_type::<OrbitSettings>()
            .register_type::<OrbitSession>();
    }

}
