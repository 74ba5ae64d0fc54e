use std::path::PathBuf;
use std::time::Duration;
use bevy::prelude::*;
use turntable_models::capture::CaptureRequest;
use turntable_models::config::OrbitSettings;
use turntable_models::error::TurntableError;
use turntable_models::session::OrbitSession;
use crate::rig::{CameraPose, CaptureSink, OrbitCamera, OrbitTarget};

/// Steps a camera around a target in fixed angular increments, asking for a
/// capture at every step.
///
/// The controller does no work on its own. The host calls [`OrbitController::tick`]
/// once per frame with the current clock reading and the controller decides
/// whether enough time has passed for the next step.
#[derive(Resource, Debug, Clone, Default, Reflect)]
#[reflect(Resource)]
pub struct OrbitController {
    settings: OrbitSettings,
    session: OrbitSession,
}

/// What a single [`OrbitController::tick`] did.
#[derive(Debug)]
pub enum TickOutcome {
    /// No pass is running. Nothing was read or written.
    Idle,
    /// A pass is running but the step interval has not elapsed yet.
    Waiting,
    /// One step was executed.
    Stepped(StepReport),
}

/// Everything that happened during one step.
#[derive(Debug)]
pub struct StepReport {
    /// Angle the camera was placed at and the capture was tagged with.
    pub angle_degrees: u32,
    pub pose: CameraPose,
    pub request: CaptureRequest,
    /// Path the capture goes to, or why it could not be requested.
    pub capture: Result<PathBuf, TurntableError>,
    /// This step completed the pass.
    pub finished: bool,
}

impl OrbitController {

    pub fn new(settings: OrbitSettings) -> Self {
        Self { settings, session: OrbitSession::default() }
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    pub fn session(&self) -> &OrbitSession {
        &self.session
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    pub fn angle_degrees(&self) -> u32 {
        self.session.angle_degrees
    }

    /// `true` if a pass is running and the next step may execute at `now`.
    pub fn is_due(&self, now: Duration) -> bool {
        self.session.active && self.session.is_due(now, self.settings.step_interval)
    }

    /// Starts a new pass at angle 0. A pass that is already running is
    /// abandoned and restarted from the beginning.
    ///
    /// Returns the angle the abandoned pass had reached, if any.
    pub fn start(&mut self, now: Duration) -> Option<u32> {
        let abandoned = self.session.active.then_some(self.session.angle_degrees);
        self.session.begin(now);
        abandoned
    }

    /// Ends the running pass without further captures. The angle is kept.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.session.active, false)
    }

    /// Runs at most one step of the pass.
    ///
    /// Reads the target and touches camera and sink only when a step is due.
    /// A failed capture is reported in the [`StepReport`] and does not hold
    /// the pass back.
    pub fn tick<T, C, S>(&mut self, now: Duration, target: &T, camera: &mut C, sink: &mut S) -> TickOutcome
    where
        T: OrbitTarget + ?Sized,
        C: OrbitCamera + ?Sized,
        S: CaptureSink + ?Sized,
    {
        if !self.session.active {
            return TickOutcome::Idle;
        }
        if !self.session.is_due(now, self.settings.step_interval) {
            return TickOutcome::Waiting;
        }
        self.session.last_step_time = now;

        let size = target.bounding_size();
        let range = size * self.settings.radius_multiplier;
        let height = size * self.settings.height_multiplier;

        let angle_degrees = self.session.angle_degrees;
        let pose = orbit_pose(target.position(), angle_degrees, range, height);
        camera.apply_pose(pose);

        let request = CaptureRequest::new(target.name(), angle_degrees);
        let capture = sink.capture(&request);

        let finished = self.session.advance(self.settings.angular_increment);

        TickOutcome::Stepped(StepReport { angle_degrees, pose, request, capture, finished })
    }
}

/// Camera pose on a horizontal circle of radius `range` around `target`,
/// raised by `height` and facing the target.
///
/// 0 degrees lies on +X, 90 degrees on +Z.
pub fn orbit_pose(target: Vec3, angle_degrees: u32, range: f32, height: f32) -> CameraPose {
    let radians = (angle_degrees as f32).to_radians();
    let position = Vec3::new(
        target.x + range * radians.cos(),
        target.y + height,
        target.z + range * radians.sin(),
    );
    CameraPose { position, look_at: target }
}
