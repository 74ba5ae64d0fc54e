use std::env;
use std::fs::create_dir;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use bevy::prelude::*;
use crate::error::TurntableError;

/// File extension of every capture. The screenshot encoder picks the format
/// from it.
pub const CAPTURE_EXTENSION: &str = "png";

/// One screenshot the controller asks for: which target, at which angle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub target_name: String,
    pub angle_degrees: u32,
}

impl CaptureRequest {
    pub fn new(target_name: impl Into<String>, angle_degrees: u32) -> Self {
        Self { target_name: target_name.into(), angle_degrees }
    }

    /// `{target}-{angle}.png`, e.g. `Cube-45.png`.
    pub fn file_name(&self) -> String {
        capture_file_name(&self.target_name, self.angle_degrees)
    }
}

/// Builds the file name for a capture of `target_name` at `angle_degrees`.
pub fn capture_file_name(target_name: &str, angle_degrees: u32) -> String {
    format!("{target_name}-{angle_degrees}.{CAPTURE_EXTENSION}")
}

/// Folder a pass writes its screenshots to.
///
/// The folder is created lazily right before each capture, never on startup,
/// so an idle turntable leaves the file system alone.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct CaptureDirectory {
    path: PathBuf,
}

impl CaptureDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full path of the file a request will be written to.
    pub fn file_path(&self, request: &CaptureRequest) -> PathBuf {
        self.path.join(request.file_name())
    }

    /// Creates the folder if it does not exist yet. Only the last path
    /// component is created, the parent has to exist.
    ///
    /// # Errors
    /// [`TurntableError::CaptureWrite`] when the folder cannot be created.
    pub fn ensure(&self) -> Result<(), TurntableError> {
        if self.path.is_dir() {
            return Ok(());
        }
        match create_dir(&self.path) {
            Ok(()) => {
                info!("Created capture directory '{}'", self.path.display());
                Ok(())
            }
            // Lost a race against another writer, that is fine.
            Err(err) if err.kind() == ErrorKind::AlreadyExists && self.path.is_dir() => Ok(()),
            Err(source) => Err(TurntableError::CaptureWrite { path: self.path.clone(), source }),
        }
    }
}

/// Best guess of the user's desktop folder.
///
/// Uses `%USERPROFILE%\Desktop` on Windows and `$HOME/Desktop` elsewhere.
/// Falls back to the home folder when there is no desktop, and to the
/// working directory when there is no home either.
pub fn desktop_dir() -> PathBuf {
    let home = env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from);

    match home {
        Some(home) => {
            let desktop = home.join("Desktop");
            if desktop.is_dir() { desktop } else { home }
        }
        None => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::remove_dir;

    fn scratch_dir(name: &str) -> PathBuf {
        env::temp_dir().join(format!("turntable-capture-{}-{name}", std::process::id()))
    }

    #[test]
    fn file_name_is_target_dash_angle() {
        assert_eq!(capture_file_name("Cube", 45), "Cube-45.png");
        assert_eq!(CaptureRequest::new("Teapot", 0).file_name(), "Teapot-0.png");
        assert_eq!(CaptureRequest::new("Teapot", 355).file_name(), "Teapot-355.png");
    }

    #[test]
    fn file_path_joins_directory() {
        let dir = CaptureDirectory::new("renders");
        let request = CaptureRequest::new("Cube", 90);
        assert_eq!(dir.file_path(&request), Path::new("renders").join("Cube-90.png"));
    }

    #[test]
    fn ensure_creates_missing_folder_once() {
        let path = scratch_dir("ensure");
        let _ = remove_dir(&path);
        let dir = CaptureDirectory::new(&path);

        dir.ensure().unwrap();
        assert!(path.is_dir());
        // Second call is a no-op.
        dir.ensure().unwrap();

        remove_dir(&path).unwrap();
    }

    #[test]
    fn ensure_is_single_level() {
        let root = scratch_dir("nested");
        let dir = CaptureDirectory::new(root.join("a").join("b"));

        let err = dir.ensure().unwrap_err();
        assert!(matches!(err, TurntableError::CaptureWrite { .. }));
        assert!(!root.exists());
    }
}
