use anyhow::Result;

use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Returned by [`App::on_frame`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// What the window runtime drives.
///
/// Any error is fatal: the runtime logs it once, stops the event loop and
/// returns it from `Runtime::run`.
pub trait App {
    /// The window and its device exist; build GPU resources here.
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> Result<()>;

    /// The surface now has a new non-zero size.
    fn on_resize(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;
}
