use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot};
use turntable_models::config::GlobalConfig;
use crate::orbit_logic::{TurntablePassFinished, TurntableSystems};
use crate::rig::CaptureRequested;

/// Set once a finished pass should close the app. The exit waits until the
/// last screenshot has been written.
#[derive(Resource, Default, Debug)]
pub struct PendingExit(pub bool);

pub struct CaptureLogicComponent;

impl Plugin for CaptureLogicComponent {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingExit>();

        app.add_systems(Update,
                        (
                            issue_screenshots,
                            schedule_exit_after_pass
                        )
                            .chain()
                            .in_set(TurntableSystems::Capture));
        app.add_systems(Last, exit_when_captures_written);
    }
}

/// Turns each [`CaptureRequested`] into a screenshot of the primary window
/// that is saved to the requested path.
fn issue_screenshots(mut commands: Commands, mut requests: MessageReader<CaptureRequested>) {
    for requested in requests.read() {
        debug!("Taking screenshot '{}'", requested.path.display());
        commands
            .spawn(Screenshot::primary_window())
            .observe(save_to_disk(requested.path.clone()));
    }
}

/// Arms [`PendingExit`] when a pass finishes and `exit_when_done` is set.
fn schedule_exit_after_pass(
    config: Res<GlobalConfig>,
    mut finished: MessageReader<TurntablePassFinished>,
    mut pending: ResMut<PendingExit>,
) {
    if finished.read().count() > 0 && config.turntable_config.exit_when_done {
        info!("Turntable done, closing once all screenshots are written");
        pending.0 = true;
    }
}

/// Exits the app once armed and no screenshot is in flight anymore.
fn exit_when_captures_written(
    pending: Res<PendingExit>,
    screenshots: Query<(), With<Screenshot>>,
    mut exit: MessageWriter<AppExit>,
) {
    if pending.0 && screenshots.is_empty() {
        exit.write(AppExit::Success);
    }
}
