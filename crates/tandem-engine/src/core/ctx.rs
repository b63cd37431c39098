use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::Gpu;
use crate::input::{InputFrame, InputState};
use crate::paint::Color;
use crate::render::RenderCtx;
use crate::sim::{SceneObject, SimError};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Logical window size.
    pub fn viewport(&self) -> Viewport {
        logical_viewport(self.window)
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Pointer position in NDC (`[-1, 1]`, +Y up), if over the window.
    pub fn pointer_ndc(&self) -> Option<[f32; 2]> {
        self.input.pointer_ndc(self.window.viewport())
    }

    /// Runs one frame of `obj`: update, compute pass, render pass, submit.
    ///
    /// Both passes are recorded into the frame's single encoder, so the
    /// render pass observes everything the compute pass wrote. Surface errors
    /// skip the frame (or exit when fatal); simulation errors are returned.
    pub fn run_scene<O>(&mut self, obj: &mut O, clear: Color) -> Result<AppControl, SimError>
    where
        O: SceneObject + ?Sized,
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let recovery = self.gpu.recover(err);
                return Ok(if recovery.is_fatal() { AppControl::Exit } else { AppControl::Continue });
            }
        };

        let rctx = render_ctx(self.gpu);
        obj.update(&rctx, self.time.dt)?;

        {
            let mut cpass = frame.encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(obj.name()),
                timestamp_writes: None,
            });
            obj.compute(&mut cpass)?;
        }

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(obj.name()),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            obj.render(&mut rpass)?;
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        Ok(AppControl::Continue)
    }
}

/// Borrows `gpu` for scene object calls.
pub(crate) fn render_ctx<'a>(gpu: &'a Gpu<'_>) -> RenderCtx<'a> {
    let size = gpu.size();
    RenderCtx {
        device: gpu.device(),
        queue: gpu.queue(),
        surface_format: gpu.surface_format(),
        surface_size: (size.width, size.height),
    }
}

fn logical_viewport(window: &Window) -> Viewport {
    let logical: winit::dpi::LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
    Viewport::new(logical.width as f32, logical.height as f32)
}
