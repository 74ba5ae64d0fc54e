use std::time::Duration;
use bevy::prelude::*;

/// A full revolution. A pass ends once the angle reaches it.
pub const FULL_TURN_DEGREES: u32 = 360;

/// Mutable state of one turntable: whether a pass runs, where it is and
/// when it last stepped.
///
/// `last_step_time` is a reading of a monotonic clock measured from app
/// start (Bevy's `Time::elapsed`), not wall time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Reflect)]
pub struct OrbitSession {
    pub active: bool,
    pub angle_degrees: u32,
    pub last_step_time: Duration,
}

impl OrbitSession {

    /// Resets to the start of a new pass.
    pub fn begin(&mut self, now: Duration) {
        self.active = true;
        self.angle_degrees = 0;
        self.last_step_time = now;
    }

    /// `true` once at least `interval` has passed since the last step.
    /// A clock reading older than the last step never counts as due.
    pub fn is_due(&self, now: Duration, interval: Duration) -> bool {
        now.saturating_sub(self.last_step_time) >= interval && now >= self.last_step_time
    }

    /// Moves the angle on by `increment` and ends the pass on a full turn.
    /// Returns `true` if this step finished the pass.
    pub fn advance(&mut self, increment: u32) -> bool {
        self.angle_degrees = self.angle_degrees.saturating_add(increment);
        if self.angle_degrees >= FULL_TURN_DEGREES {
            self.active = false;
        }
        !self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_resets_progress() {
        let mut session = OrbitSession { active: true, angle_degrees: 120, last_step_time: Duration::from_secs(3) };
        session.begin(Duration::from_secs(10));
        assert!(session.active);
        assert_eq!(session.angle_degrees, 0);
        assert_eq!(session.last_step_time, Duration::from_secs(10));
    }

    #[test]
    fn due_only_after_interval() {
        let session = OrbitSession { active: true, angle_degrees: 0, last_step_time: Duration::from_secs(1) };
        let interval = Duration::from_millis(250);
        assert!(!session.is_due(Duration::from_millis(1249), interval));
        assert!(session.is_due(Duration::from_millis(1250), interval));
        assert!(!session.is_due(Duration::from_millis(500), Duration::ZERO));
    }

    #[test]
    fn advance_stops_on_full_turn() {
        let mut session = OrbitSession::default();
        session.begin(Duration::ZERO);
        assert!(!session.advance(180));
        assert!(session.advance(180));
        assert!(!session.active);
        assert_eq!(session.angle_degrees, 360);
    }
}
