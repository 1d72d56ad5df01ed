/// Malformed touch payloads. The interpreter logs these and drops the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureError {
    MissingCoordinates,
    TooFewTouches { expected: usize, actual: usize },
    /// Two touches at the same spot; no pinch ratio can be derived.
    DegenerateDistance,
}

impl std::fmt::Display for GestureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GestureError::MissingCoordinates => write!(f, "touch is missing coordinates"),
            GestureError::TooFewTouches { expected, actual } => {
                write!(f, "expected {expected} touches, got {actual}")
            }
            GestureError::DegenerateDistance => write!(f, "pinch touches coincide"),
        }
    }
}

impl std::error::Error for GestureError {}
