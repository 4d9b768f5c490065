//! Small shared utilities.

pub mod frame_timing;

pub use frame_timing::FrameTiming;
