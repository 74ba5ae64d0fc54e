use std::env;
use std::fs::{create_dir_all, File};
use std::path::PathBuf;
use std::sync::Mutex;
use bevy::log::{BoxedLayer, LogPlugin};
use bevy::prelude::*;
use bevy_inspector_egui::bevy_egui::EguiPlugin;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use tracing_subscriber::Layer;
use turntable_logic::scene_logic::DemoSceneComponent;
use turntable_logic::TurntableLogicPlugin;
use turntable_models::config::{GlobalConfig, DEFAULT_CONFIG_DIR};
use turntable_models::debug::inspector_visible;
use turntable_models::TurntableCorePlugin;

/// Folder log files are written to when `TURNTABLE_LOG_DIR` is unset.
const DEFAULT_LOG_DIR: &str = "logs";

fn main() {
    // A missing .env is fine, the defaults apply.
    dotenvy::dotenv().ok();

    let config_dir = env::var("TURNTABLE_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(LogPlugin {
                custom_layer: file_log_layer,
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: String::from("Turntable"),
                    ..default()
                }),
                ..default()
            }),
    );

    // Loaded after the LogPlugin so config warnings end up in the log file.
    let config = GlobalConfig::from_dir(&config_dir);
    info!("Loaded config from '{}'", config_dir.display());
    app.insert_resource(config);

    app.add_plugins((TurntableCorePlugin, TurntableLogicPlugin, DemoSceneComponent));
    app.add_plugins(EguiPlugin::default());
    app.add_plugins(WorldInspectorPlugin::new().run_if(inspector_visible));

    app.run();
}

/// Mirrors every log line into `<log dir>/turntable_<timestamp>.log`.
/// Console logging keeps working when the file cannot be created.
fn file_log_layer(_app: &mut App) -> Option<BoxedLayer> {
    let log_dir = env::var("TURNTABLE_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR));

    if let Err(err) = create_dir_all(&log_dir) {
        eprintln!("Cannot create log folder '{}': {err}", log_dir.display());
        return None;
    }

    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = log_dir.join(format!("turntable_{stamp}.log"));
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Cannot create log file '{}': {err}", path.display());
            return None;
        }
    };

    Some(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .boxed(),
    )
}
