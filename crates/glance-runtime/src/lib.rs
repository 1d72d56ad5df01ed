//! Cooperative single-threaded runtime for Glance.
//!
//! Everything the gesture core waits on (long-press delays, double-tap
//! windows, tweens, orientation debounce) is a callback scheduled here.
//! Hosts drive the runtime by advancing its clock; nothing ever blocks.

mod frame_clock;
mod runtime;
mod state;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use runtime::{
    MonotonicClock, Runtime, RuntimeHandle, TimerId, TimerRegistration, FRAME_INTERVAL_MILLIS,
};
pub use state::{MutableState, State, Subscription};

pub type FrameCallbackId = u64;

/// Converts runtime milliseconds into frame nanoseconds.
#[inline]
pub fn millis_to_nanos(millis: u64) -> u64 {
    millis.saturating_mul(1_000_000)
}
