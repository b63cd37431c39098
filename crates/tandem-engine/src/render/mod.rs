//! What scene objects borrow from the GPU layer.

mod ctx;

pub use ctx::RenderCtx;
