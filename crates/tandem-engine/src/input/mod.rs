//! Keyboard and pointer input, independent of the windowing backend.
//!
//! The runtime feeds translated events into [`InputState`], which records
//! the presses of the current frame in an [`InputFrame`].

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, MouseButton, Press};
