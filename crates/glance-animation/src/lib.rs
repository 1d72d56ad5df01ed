//! Time-based animations for Glance.
//!
//! [`Tween`] is a pure sampler that components can own directly; [`Animatable`]
//! drives a tween from the runtime's frame clock and publishes each frame into
//! a [`glance_runtime::MutableState`].

mod animation;

pub use animation::*;
