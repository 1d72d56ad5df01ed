//! Testing utilities and harness for Glance

pub mod harness;
pub mod pager;
pub mod robot;
pub mod robot_assertions;

pub use harness::*;
pub use pager::RecordingPager;
pub use robot::*;

pub mod prelude {
    pub use crate::harness::*;
    pub use crate::pager::RecordingPager;
    pub use crate::robot::*;
    pub use crate::robot_assertions;
}
