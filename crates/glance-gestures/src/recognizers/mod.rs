//! Single-purpose recognisers composed by the interpreter.

mod long_press;
mod pan;
mod pinch;
mod tap;

pub(crate) use long_press::LongPressTimer;
pub(crate) use pan::{pan_by, SlopDetector};
pub(crate) use pinch::PinchAnchor;
pub(crate) use tap::{TapOutcome, TapTracker};
