use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors produced while configuring or running a turntable pass.
///
/// None of these are fatal to the host app. Configuration errors make the
/// app fall back to defaults, capture errors are logged and the pass goes on.
#[derive(Debug)]
pub enum TurntableError {
    /// A target or camera the controller needs is not bound (or not unique).
    Configuration(String),
    /// The capture directory could not be prepared or the capture request failed.
    CaptureWrite {
        path: PathBuf,
        source: io::Error,
    },
    /// The angular increment must be in `1..360`.
    InvalidIncrement(u32),
    /// The step interval must be a finite, non-negative number of seconds.
    InvalidInterval(f32),
    /// The TOML config could not be parsed or serialized.
    ConfigParse(String),
    /// Generic I/O failure (config files).
    Io(io::Error),
}

impl fmt::Display for TurntableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "turntable configuration error: {msg}"),
            Self::CaptureWrite { path, source } => {
                write!(f, "failed to write capture '{}': {source}", path.display())
            }
            Self::InvalidIncrement(value) => {
                write!(f, "angular increment must be between 1 and 359 degrees, got {value}")
            }
            Self::InvalidInterval(value) => {
                write!(f, "step interval must be a finite number >= 0 seconds, got {value}")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for TurntableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CaptureWrite { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TurntableError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_write_keeps_io_source() {
        let err = TurntableError::CaptureWrite {
            path: PathBuf::from("Turntable/Cube-0.png"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("Cube-0.png"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn increment_message_names_value() {
        let err = TurntableError::InvalidIncrement(360);
        assert!(err.to_string().contains("360"));
        assert!(std::error::Error::source(&err).is_none());
    }
}
