mod bindings;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use tandem_engine::core::{App, AppControl, FrameCtx};
use tandem_engine::device::GpuInit;
use tandem_engine::input::Key;
use tandem_engine::logging::{init_logging, LoggingConfig};
use tandem_engine::paint::Color;
use tandem_engine::render::RenderCtx;
use tandem_engine::scene::{Demo, SceneConfig, SceneKind};
use tandem_engine::sim::{initialize, input_channel, InputChannel, SceneObject};
use tandem_engine::window::{Runtime, RuntimeConfig};

struct Studio {
    demo: Demo,
    scene: SceneKind,
    input: InputChannel,
    focal_step: f32,
    clear: Color,
}

impl Studio {
    fn new(demo: Demo) -> Self {
        let config = SceneConfig::default();
        let focal_step = config.ray_box.focal_step;
        let input = input_channel();

        Self {
            demo,
            scene: SceneKind::new(demo, config, input.clone()),
            input,
            focal_step,
            clear: Color::from_srgb_u8(12, 12, 18, 255),
        }
    }
}

impl App for Studio {
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        initialize(&mut self.scene, ctx).with_context(|| format!("initializing {}", self.demo))
    }

    fn on_resize(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        self.scene.resize(ctx).context("resizing scene")
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        if ctx.input_frame.pressed(Key::Escape) {
            log::info!("escape pressed, exiting");
            return Ok(AppControl::Exit);
        }

        let pointer = ctx.pointer_ndc();
        {
            let mut input = self.input.borrow_mut();
            input.pointer = pointer;
            for action in bindings::actions(self.demo, ctx.input_frame, pointer, self.focal_step) {
                input.push(action);
            }
        }

        ctx.run_scene(&mut self.scene, self.clear)
            .with_context(|| format!("{} frame", self.demo))
    }
}

/// Interactive ping-pong GPU simulation demos.
#[derive(Parser, Debug, PartialEq)]
#[command(name = "tandem-studio", version)]
struct Args {
    /// Demo to run: particles, automaton (life) or raybox (ray-box)
    #[arg(default_value_t = Demo::Particles)]
    demo: Demo,

    /// Log engine and studio at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let Args { demo, verbose } = Args::parse();
    init_logging(LoggingConfig {
        verbose,
        ..LoggingConfig::default()
    });
    log::info!("starting {demo}");

    let config = RuntimeConfig {
        title: format!("tandem: {demo}"),
        ..RuntimeConfig::default()
    };

    // the runtime has already logged whatever stopped it
    match Runtime::run(config, GpuInit::default(), Studio::new(demo)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("tandem-studio").chain(list.iter().copied()))
    }

    #[test]
    fn defaults_to_particles() {
        let expected = Args {
            demo: Demo::Particles,
            verbose: false,
        };
        assert_eq!(args(&[]).ok(), Some(expected));
    }

    #[test]
    fn demo_and_verbose_in_any_order() {
        let expected = || Args {
            demo: Demo::RayBox,
            verbose: true,
        };
        assert_eq!(args(&["-v", "raybox"]).ok(), Some(expected()));
        assert_eq!(args(&["ray-box", "--verbose"]).ok(), Some(expected()));
        assert_eq!(args(&["life"]).ok().map(|a| a.demo), Some(Demo::Automaton));
    }

    #[test]
    fn rejects_unknown_and_extra_arguments() {
        assert!(args(&["quest"]).is_err());
        assert!(args(&["life", "raybox"]).is_err());
        assert!(args(&["--fullscreen"]).is_err());
    }
}
