//! Frame pacing and frame-to-frame timing, independent of the window loop.

mod frame_clock;
mod frame_pacer;

pub use frame_clock::{FrameClock, FrameTime};
pub use frame_pacer::{FramePacer, Pace};
