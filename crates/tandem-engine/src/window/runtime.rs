use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{render_ctx, App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::{FrameClock, FramePacer, Pace};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Redraw rate; frames are paced on the host, independent of vsync.
    pub target_fps: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tandem".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            target_fps: 60,
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs `app` until it exits, and returns the first
    /// fatal error raised by GPU setup or by an app callback. Every returned
    /// error has already been logged.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new()
            .context("failed to create winit EventLoop")
            .inspect_err(|err| log::error!("{err:#}"))?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")
            .inspect_err(|err| log::error!("{err:#}"))?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
    pacer: FramePacer,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    started: bool,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            started: false,
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    /// Records the first fatal error and stops the loop. Logged exactly once.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        if self.fatal.is_none() {
            log::error!("{err:#}");
            self.fatal = Some(err);
        }
        self.request_exit(event_loop);
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let pacer = FramePacer::new(self.config.target_fps.max(1));

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::new(pacer.interval()),
            pacer,
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()?;

        self.window = Some(entry);
        Ok(())
    }

    fn start_app(&mut self) -> Result<()> {
        let (app, Some(entry)) = (&mut self.app, self.window.as_ref()) else {
            return Ok(());
        };
        entry.with(|fields| app.on_start(&render_ctx(fields.gpu)))
    }

    fn resize(&mut self) -> Result<()> {
        let (app, Some(entry)) = (&mut self.app, self.window.as_mut()) else {
            return Ok(());
        };

        entry.with_mut(|fields| {
            let size = fields.window.inner_size();
            fields.gpu.resize(size);
            fields.window.request_redraw();
            if size.width == 0 || size.height == 0 {
                return Ok(());
            }
            app.on_resize(&render_ctx(fields.gpu))
        })
    }

    fn redraw(&mut self, window_id: WindowId) -> Result<AppControl> {
        let (app, Some(entry)) = (&mut self.app, self.window.as_mut()) else {
            return Ok(AppControl::Continue);
        };

        let mut runtime_ctx = RuntimeCtx::default();

        let control = entry.with_mut(|fields| {
            let time = fields.clock.tick();

            let control = {
                let mut ctx = FrameCtx {
                    window: WindowCtx {
                        id: window_id,
                        window: fields.window,
                    },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time,
                    runtime: &mut runtime_ctx,
                };
                app.on_frame(&mut ctx)
            };

            // Per-frame deltas are consumed whether or not the frame succeeded.
            fields.input_frame.clear();
            control
        })?;

        if runtime_ctx.exit {
            return Ok(AppControl::Exit);
        }
        Ok(control)
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        if let Err(err) = self.create_window_entry(event_loop) {
            self.fail(event_loop, err);
            return;
        }

        if !self.started {
            self.started = true;
            if let Err(err) = self.start_app() {
                self.fail(event_loop, err);
                return;
            }
        }

        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.window.as_mut() else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        let now = Instant::now();
        let pace = entry.with_pacer_mut(|pacer| pacer.poll(now));
        match pace {
            Pace::Render { .. } => {
                entry.with_window(|w| w.request_redraw());
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Pace::Wait(deadline) => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if let Some(entry) = self.window.as_mut() {
            entry.with_mut(|fields| {
                if let Some(ev) = translate_window_event(fields.window, &event) {
                    fields.input_state.apply_event(fields.input_frame, ev);
                }
            });
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.window = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Err(err) = self.resize() {
                    self.fail(event_loop, err);
                }
            }

            WindowEvent::RedrawRequested => match self.redraw(window_id) {
                Ok(AppControl::Continue) => {}
                Ok(AppControl::Exit) => self.request_exit(event_loop),
                Err(err) => self.fail(event_loop, err),
            },

            _ => {}
        }
    }
}
