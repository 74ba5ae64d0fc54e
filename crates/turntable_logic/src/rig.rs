//! Capabilities the orbit controller needs from its host, and their Bevy
//! implementations.
//!
//! The controller only ever talks to these traits, so it runs the same
//! against ECS data and against plain structs in tests.

use std::path::PathBuf;
use bevy::camera::primitives::Aabb;
use bevy::math::Vec3A;
use bevy::prelude::*;
use turntable_models::capture::{CaptureDirectory, CaptureRequest};
use turntable_models::error::TurntableError;

/// Where the camera should sit and what it should look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// The object being orbited.
pub trait OrbitTarget {
    /// Name used for capture files.
    fn name(&self) -> &str;
    /// World position the orbit is centred on.
    fn position(&self) -> Vec3;
    /// Scalar size of the object's world bounds, scales radius and height.
    fn bounding_size(&self) -> f32;
}

/// The viewpoint being moved.
pub trait OrbitCamera {
    /// Moves the camera to `pose.position` and points it at `pose.look_at`
    /// with +Y as up.
    fn apply_pose(&mut self, pose: CameraPose);
}

/// Something that turns a capture request into a file.
pub trait CaptureSink {
    /// Requests a capture and returns the path it will be written to.
    ///
    /// # Errors
    /// [`TurntableError::CaptureWrite`] if the request cannot be issued.
    fn capture(&mut self, request: &CaptureRequest) -> Result<PathBuf, TurntableError>;
}

// =================================================================================================
//
//                                          Bevy adapters
//
// =================================================================================================

/// A target entity seen through its name, world transform and bounds.
pub struct EntityTarget<'a> {
    pub name: &'a str,
    pub transform: &'a GlobalTransform,
    pub aabb: Option<&'a Aabb>,
}

impl OrbitTarget for EntityTarget<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn position(&self) -> Vec3 {
        self.transform.translation()
    }

    /// Entities without an `Aabb` report a size of zero, which collapses the
    /// orbit onto the target's position.
    fn bounding_size(&self) -> f32 {
        self.aabb.map_or(0.0, |aabb| world_bounding_size(aabb, self.transform))
    }
}

/// Length of the diagonal of the world-space axis-aligned box around `aabb`
/// after applying `transform` (scale and rotation included).
pub fn world_bounding_size(aabb: &Aabb, transform: &GlobalTransform) -> f32 {
    let matrix = transform.affine().matrix3;
    let half = aabb.half_extents;
    let world_half: Vec3A = matrix.x_axis.abs() * half.x
        + matrix.y_axis.abs() * half.y
        + matrix.z_axis.abs() * half.z;
    (world_half * 2.0).length()
}

/// Drives a camera entity's local [`Transform`]. The pose is in world space,
/// so this is only correct for a camera without a parent.
pub struct TransformCamera<'a>(pub &'a mut Transform);

impl OrbitCamera for TransformCamera<'_> {
    fn apply_pose(&mut self, pose: CameraPose) {
        self.0.translation = pose.position;
        self.0.look_at(pose.look_at, Vec3::Y);
    }
}

/// Sent for every capture the turntable wants taken. The screenshot system
/// turns these into actual screenshots.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequested {
    pub request: CaptureRequest,
    pub path: PathBuf,
}

/// Makes sure the capture folder exists, then queues a [`CaptureRequested`].
pub struct ScreenshotSink<'a, 'w> {
    pub directory: &'a CaptureDirectory,
    pub requests: &'a mut MessageWriter<'w, CaptureRequested>,
}

impl CaptureSink for ScreenshotSink<'_, '_> {
    fn capture(&mut self, request: &CaptureRequest) -> Result<PathBuf, TurntableError> {
        self.directory.ensure()?;
        let path = self.directory.file_path(request);
        self.requests.write(CaptureRequested { request: request.clone(), path: path.clone() });
        Ok(path)
    }
}
