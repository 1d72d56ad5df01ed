//! Gesture interpretation for a single zoomable image page.
//!
//! [`GestureInterpreter`] turns raw multi-touch events into pinch, pan,
//! tap, double-tap and long-press gestures and owns the page's
//! [`Transform`](glance_geometry::Transform). [`SwipeCloseTracker`] decides
//! when a vertical drag should dismiss the viewer.
//!
//! Both are plain state machines: they never read a clock. Timestamps come
//! in with every event, and pending timeouts are exposed as deadlines for
//! the owner to arm.

mod config;
mod error;
pub mod gesture_constants;
mod input;
mod interpreter;
mod recognizers;
mod swipe;
mod velocity_tracker;

pub use config::{GestureCapabilities, GestureConfig};
pub use error::GestureError;
pub use input::{TouchEvent, TouchId, TouchPhase, TouchPoint};
pub use interpreter::{GestureInterpreter, GesturePhase, GestureSignal, GestureSignals};
pub use swipe::{SwipeCloseTracker, SwipeOutcome};
pub use velocity_tracker::VelocityTracker1D;
