//! The demo scene objects and the closed set that dispatches between them.

mod pipeline;

pub mod automaton;
pub mod particles;
pub mod ray_box;

#[cfg(test)]
mod scenario;

use std::fmt;
use std::str::FromStr;

use crate::render::RenderCtx;
use crate::sim::{InputChannel, Lifecycle, SceneObject, SimError};

use automaton::{Automaton, AutomatonConfig};
use particles::{ParticleConfig, ParticleSystem};
use ray_box::{RayBox, RayBoxConfig};

/// Which demo to run.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Demo {
    #[default]
    Particles,
    Automaton,
    RayBox,
}

impl Demo {
    pub const ALL: [Demo; 3] = [Demo::Particles, Demo::Automaton, Demo::RayBox];

    pub fn name(self) -> &'static str {
        match self {
            Demo::Particles => "particles",
            Demo::Automaton => "automaton",
            Demo::RayBox => "raybox",
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownDemo(pub String);

impl fmt::Display for UnknownDemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown demo `{}` (expected particles, automaton or raybox)", self.0)
    }
}

impl std::error::Error for UnknownDemo {}

impl FromStr for Demo {
    type Err = UnknownDemo;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "particles" => Ok(Demo::Particles),
            "automaton" | "life" => Ok(Demo::Automaton),
            "raybox" | "ray-box" => Ok(Demo::RayBox),
            _ => Err(UnknownDemo(s.to_string())),
        }
    }
}

/// Per-demo settings.
#[derive(Debug, Clone, Default)]
pub struct SceneConfig {
    pub particles: ParticleConfig,
    pub automaton: AutomatonConfig,
    pub ray_box: RayBoxConfig,
}

/// One of the demo scene objects.
pub enum SceneKind {
    Particles(ParticleSystem),
    Automaton(Automaton),
    RayBox(RayBox),
}

impl SceneKind {
    pub fn new(demo: Demo, config: SceneConfig, input: InputChannel) -> Self {
        match demo {
            Demo::Particles => SceneKind::Particles(ParticleSystem::new(config.particles, input)),
            Demo::Automaton => SceneKind::Automaton(Automaton::new(config.automaton, input)),
            Demo::RayBox => SceneKind::RayBox(RayBox::new(config.ray_box, input)),
        }
    }

    pub fn demo(&self) -> Demo {
        match self {
            SceneKind::Particles(_) => Demo::Particles,
            SceneKind::Automaton(_) => Demo::Automaton,
            SceneKind::RayBox(_) => Demo::RayBox,
        }
    }

    fn inner(&self) -> &dyn SceneObject {
        match self {
            SceneKind::Particles(o) => o,
            SceneKind::Automaton(o) => o,
            SceneKind::RayBox(o) => o,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SceneObject {
        match self {
            SceneKind::Particles(o) => o,
            SceneKind::Automaton(o) => o,
            SceneKind::RayBox(o) => o,
        }
    }
}

impl SceneObject for SceneKind {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.inner().lifecycle()
    }

    fn create_geometry(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.inner_mut().create_geometry(ctx)
    }

    fn create_shaders(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.inner_mut().create_shaders(ctx)
    }

    fn create_compute_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.inner_mut().create_compute_pipeline(ctx)
    }

    fn create_render_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.inner_mut().create_render_pipeline(ctx)
    }

    fn update(&mut self, ctx: &RenderCtx<'_>, dt: f32) -> Result<(), SimError> {
        self.inner_mut().update(ctx, dt)
    }

    fn compute(&mut self, pass: &mut wgpu::ComputePass<'_>) -> Result<(), SimError> {
        self.inner_mut().compute(pass)
    }

    fn render(&mut self, pass: &mut wgpu::RenderPass<'_>) -> Result<(), SimError> {
        self.inner_mut().render(pass)
    }

    fn resize(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.inner_mut().resize(ctx)
    }
}
