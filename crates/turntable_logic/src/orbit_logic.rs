use bevy::camera::primitives::Aabb;
use bevy::prelude::*;
use turntable_models::camera::{TurntableCamera, TurntableTarget};
use turntable_models::capture::CaptureDirectory;
use turntable_models::config::{GlobalConfig, OrbitSettings};
use turntable_models::error::TurntableError;
use crate::orbit::{OrbitController, StepReport, TickOutcome};
use crate::rig::{CaptureRequested, EntityTarget, ScreenshotSink, TransformCamera};

/// External requests to the turntable.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurntableCommand {
    /// Start a pass. Restarts from 0 degrees if one is already running.
    Start,
    /// Abort the running pass.
    Stop,
}

/// Sent once when a pass completes its full revolution.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct TurntablePassFinished {
    pub target_name: String,
    pub captures: u32,
}

/// Ordering of the turntable systems inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurntableSystems {
    /// Hotkeys and other sources of [`TurntableCommand`]s.
    Input,
    /// Commands are applied and the controller is ticked.
    Orbit,
    /// Capture requests are turned into screenshots.
    Capture,
}

pub struct OrbitLogicComponent;

impl Plugin for OrbitLogicComponent {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<GlobalConfig>()
            .cloned()
            .unwrap_or_default();

        let settings = config.turntable_config.settings().unwrap_or_else(|err| {
            error!("Invalid turntable config, using defaults: {err}");
            OrbitSettings::default()
        });

        app
            .insert_resource(OrbitController::new(settings))
            .insert_resource(config.turntable_config.capture_directory())
            .insert_resource(config)
            .register_type::<OrbitController>()
            .add_message::<TurntableCommand>()
            .add_message::<CaptureRequested>()
            .add_message::<TurntablePassFinished>();

        app.configure_sets(
            Update,
            (TurntableSystems::Input, TurntableSystems::Orbit, TurntableSystems::Capture).chain(),
        );

        app.add_systems(Startup, start_on_launch);
        app.add_systems(Update, read_turntable_hotkeys.in_set(TurntableSystems::Input));
        app.add_systems(Update,
                        (
                            apply_turntable_commands,
                            drive_turntable
                        )
                            .chain()
                            .in_set(TurntableSystems::Orbit));
    }
}

/// Queues the first pass when `start_on_launch` is set.
fn start_on_launch(config: Res<GlobalConfig>, mut commands: MessageWriter<TurntableCommand>) {
    if config.turntable_config.start_on_launch {
        commands.write(TurntableCommand::Start);
    }
}

/// Maps the configured start / stop keys to [`TurntableCommand`]s.
/// Does nothing in apps without keyboard input.
fn read_turntable_hotkeys(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    config: Res<GlobalConfig>,
    mut commands: MessageWriter<TurntableCommand>,
) {
    let Some(keys) = keys else {
        return;
    };

    if keys.just_pressed(config.input_config.get_start_key()) {
        commands.write(TurntableCommand::Start);
    }
    if keys.just_pressed(config.input_config.get_stop_key()) {
        commands.write(TurntableCommand::Stop);
    }
}

/// Applies queued commands to the controller in the order they were sent.
fn apply_turntable_commands(
    time: Res<Time>,
    mut commands: MessageReader<TurntableCommand>,
    mut controller: ResMut<OrbitController>,
) {
    for command in commands.read() {
        match command {
            TurntableCommand::Start => {
                match controller.start(time.elapsed()) {
                    Some(angle) => warn!("Turntable restarted, abandoned the running pass at {angle} degrees"),
                    None => info!("Turntable pass started"),
                }
            }
            TurntableCommand::Stop => {
                if controller.stop() {
                    info!("Turntable pass stopped at {} degrees", controller.angle_degrees());
                }
            }
        }
    }
}

/// Ticks the controller with the current clock reading.
///
/// Target and camera are only looked up when a step is due, so an idle
/// turntable never touches them. A missing or ambiguous target or camera
/// stops the pass. The pose is written to the camera's local `Transform`, so
/// only a root camera (one without a parent) counts as the turntable camera.
///
/// # Parameters
/// * `time` - Clock the step interval is measured against.
/// * `controller` - Orbit state, ticked at most once per frame.
/// * `directory` - Folder the captures go to.
/// * `targets` - The entity marked with [`TurntableTarget`].
/// * `cameras` - The root entity marked with [`TurntableCamera`].
fn drive_turntable(
    time: Res<Time>,
    mut controller: ResMut<OrbitController>,
    directory: Res<CaptureDirectory>,
    targets: Query<(&GlobalTransform, Option<&Aabb>, Option<&Name>), With<TurntableTarget>>,
    mut cameras: Query<&mut Transform, (With<TurntableCamera>, Without<TurntableTarget>, Without<ChildOf>)>,
    mut requests: MessageWriter<CaptureRequested>,
    mut finished: MessageWriter<TurntablePassFinished>,
) {
    let now = time.elapsed();
    if !controller.is_due(now) {
        return;
    }

    let (transform, aabb, name) = match targets.single() {
        Ok(target) => target,
        Err(err) => {
            abort_pass(&mut controller, TurntableError::Configuration(format!("turntable target: {err}")));
            return;
        }
    };
    let mut camera_transform = match cameras.single_mut() {
        Ok(camera) => camera,
        Err(err) => {
            abort_pass(&mut controller, TurntableError::Configuration(format!("turntable camera: {err}")));
            return;
        }
    };

    let target = EntityTarget {
        name: name.map_or(TurntableTarget::FALLBACK_NAME, Name::as_str),
        transform,
        aabb,
    };
    let mut camera = TransformCamera(&mut *camera_transform);
    let mut sink = ScreenshotSink { directory: &directory, requests: &mut requests };

    let TickOutcome::Stepped(report) = controller.tick(now, &target, &mut camera, &mut sink) else {
        return;
    };
    log_step(&report);

    if report.finished {
        let captures = controller.settings().steps_per_pass();
        info!("Turntable pass for '{}' finished with {captures} captures", report.request.target_name);
        finished.write(TurntablePassFinished {
            target_name: report.request.target_name,
            captures,
        });
    }
}

fn abort_pass(controller: &mut OrbitController, err: TurntableError) {
    error!("{err}, stopping the turntable pass");
    controller.stop();
}

fn log_step(report: &StepReport) {
    match &report.capture {
        Ok(path) => debug!(
            "Turntable step at {} degrees, camera at {}, capturing '{}'",
            report.angle_degrees,
            report.pose.position,
            path.display()
        ),
        Err(err) => error!("Turntable capture at {} degrees failed: {err}", report.angle_degrees),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs::remove_dir_all;
    use std::path::PathBuf;
    use std::time::Duration;
    use bevy::time::TimeUpdateStrategy;
    use turntable_models::config::TurntableConfig;

    #[derive(Resource, Default)]
    struct Collected {
        files: Vec<String>,
        finished: Vec<TurntablePassFinished>,
    }

    fn collect(
        mut requests: MessageReader<CaptureRequested>,
        mut finished: MessageReader<TurntablePassFinished>,
        mut collected: ResMut<Collected>,
    ) {
        for requested in requests.read() {
            collected.files.push(requested.request.file_name());
        }
        collected.finished.extend(finished.read().cloned());
    }

    fn scratch_name(test: &str) -> String {
        format!("turntable-logic-{}-{test}", std::process::id())
    }

    fn test_app(config: TurntableConfig) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .insert_resource(GlobalConfig { turntable_config: config, ..default() })
            .add_plugins(OrbitLogicComponent)
            .init_resource::<Collected>()
            .add_systems(Update, collect.after(TurntableSystems::Orbit));
        app
    }

    fn config(test: &str, increment: u32, start_on_launch: bool) -> TurntableConfig {
        TurntableConfig {
            angular_increment: increment,
            output_root: Some(env::temp_dir()),
            output_dir_name: scratch_name(test),
            start_on_launch,
            ..default()
        }
    }

    fn spawn_rig(app: &mut App) -> Entity {
        let transform = Transform::from_xyz(0.0, 1.0, 0.0);
        app.world_mut().spawn((
            TurntableTarget,
            Name::new("Cube"),
            transform,
            GlobalTransform::from(transform),
            Aabb::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5)),
        ));
        app.world_mut().spawn((TurntableCamera, Transform::default())).id()
    }

    fn run_until_idle(app: &mut App) {
        for _ in 0..200 {
            app.update();
            if !app.world().resource::<OrbitController>().is_active() {
                return;
            }
        }
    }

    fn output_dir(test: &str) -> PathBuf {
        env::temp_dir().join(scratch_name(test))
    }

    #[test]
    fn launch_pass_captures_each_angle() {
        let mut app = test_app(config("launch", 90, true));
        let camera = spawn_rig(&mut app);

        app.update();
        assert!(app.world().resource::<OrbitController>().is_active());
        run_until_idle(&mut app);
        app.update();

        let collected = app.world().resource::<Collected>();
        assert_eq!(collected.files, vec!["Cube-0.png", "Cube-90.png", "Cube-180.png", "Cube-270.png"]);
        assert_eq!(
            collected.finished,
            vec![TurntablePassFinished { target_name: String::from("Cube"), captures: 4 }]
        );
        assert!(output_dir("launch").is_dir());

        // Last step sits at 270 degrees: range = sqrt(3) * 3, height = sqrt(3) * 0.5.
        let size = 3.0_f32.sqrt();
        let transform = app.world().get::<Transform>(camera).unwrap();
        let expected = Vec3::new(0.0, 1.0 + size * 0.5, -size * 3.0);
        assert!(transform.translation.abs_diff_eq(expected, 1e-3));

        remove_dir_all(output_dir("launch")).unwrap();
    }

    #[test]
    fn idle_turntable_leaves_disk_alone() {
        let mut app = test_app(config("idle", 90, false));
        let camera = spawn_rig(&mut app);

        for _ in 0..20 {
            app.update();
        }

        assert!(app.world().resource::<Collected>().files.is_empty());
        assert!(!output_dir("idle").exists());
        assert_eq!(app.world().get::<Transform>(camera).unwrap().translation, Vec3::ZERO);
    }

    #[test]
    fn start_and_stop_commands() {
        let mut app = test_app(config("commands", 45, false));
        spawn_rig(&mut app);
        app.update();

        app.world_mut().write_message(TurntableCommand::Start);
        for _ in 0..6 {
            app.update();
        }
        let captured = app.world().resource::<Collected>().files.len();
        assert!(captured > 0);

        app.world_mut().write_message(TurntableCommand::Stop);
        app.update();
        assert!(!app.world().resource::<OrbitController>().is_active());

        let captured_at_stop = app.world().resource::<Collected>().files.len();
        for _ in 0..10 {
            app.update();
        }
        assert_eq!(app.world().resource::<Collected>().files.len(), captured_at_stop);
        assert!(app.world().resource::<Collected>().finished.is_empty());

        remove_dir_all(output_dir("commands")).unwrap();
    }

    #[test]
    fn missing_target_stops_pass() {
        let mut app = test_app(config("missing", 90, true));
        app.world_mut().spawn((TurntableCamera, Transform::default()));

        run_until_idle(&mut app);

        assert!(!app.world().resource::<OrbitController>().is_active());
        assert!(app.world().resource::<Collected>().files.is_empty());
        assert!(!output_dir("missing").exists());
    }

    #[test]
    fn parented_camera_is_not_driven() {
        let mut app = test_app(config("parented", 90, true));
        let transform = Transform::from_xyz(0.0, 1.0, 0.0);
        let target = app.world_mut().spawn((
            TurntableTarget,
            Name::new("Cube"),
            transform,
            GlobalTransform::from(transform),
            Aabb::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5)),
        )).id();
        let camera = app.world_mut().spawn((TurntableCamera, Transform::default(), ChildOf(target))).id();

        run_until_idle(&mut app);

        assert!(!app.world().resource::<OrbitController>().is_active());
        assert!(app.world().resource::<Collected>().files.is_empty());
        assert_eq!(app.world().get::<Transform>(camera).unwrap().translation, Vec3::ZERO);
        assert!(!output_dir("parented").exists());
    }

    #[test]
    fn uneven_increment_reports_every_capture() {
        let mut app = test_app(config("uneven", 100, true));
        spawn_rig(&mut app);

        run_until_idle(&mut app);

        let collected = app.world().resource::<Collected>();
        assert_eq!(collected.files, vec!["Cube-0.png", "Cube-100.png", "Cube-200.png", "Cube-300.png"]);
        assert_eq!(collected.finished[0].captures, 4);

        remove_dir_all(output_dir("uneven")).unwrap();
    }

    #[test]
    fn controller_is_reflected_as_resource() {
        let app = test_app(config("reflect", 90, false));
        let registry = app.world().resource::<AppTypeRegistry>().read();
        assert!(registry.get_type_data::<ReflectResource>(std::any::TypeId::of::<OrbitController>()).is_some());
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let mut app = test_app(config("invalid", 0, false));
        app.update();
        assert_eq!(app.world().resource::<OrbitController>().settings(), &OrbitSettings::default());
    }
}
