//! The contract between the window runtime and the binary driving it.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};

pub(crate) use ctx::render_ctx;
