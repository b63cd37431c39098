//! GPU particle system.
//!
//! Particles live in a ping-pong storage pair. The kernel ages, attracts and
//! moves every live particle; the host only emits (full re-upload) and keeps
//! a liveness mirror. Drawn as a point list straight from the storage buffer.

mod host;

pub use host::{Particle, ParticleConfig, ParticleHost, ParticleUniforms};

use crate::render::RenderCtx;
use crate::sim::{
    Allocator, BindSets, BindSlots, BlockSize, BufferDesc, ComputeStage, Domain, DoubleBuffered,
    DrawShape, GpuBuffer, InputChannel, Lifecycle, LifecycleTracker, RenderStage, SceneObject,
    SimError,
};

use super::pipeline::{self, RenderPipelineDesc};

const SHADER: &str = include_str!("particles.wgsl");

struct Geometry {
    state: DoubleBuffered<GpuBuffer>,
    uniforms: GpuBuffer,
}

struct Shaders {
    module: wgpu::ShaderModule,
    compute_layout: wgpu::BindGroupLayout,
    render_layout: wgpu::BindGroupLayout,
}

pub struct ParticleSystem {
    host: ParticleHost,
    input: InputChannel,
    tracker: LifecycleTracker,

    geometry: Option<Geometry>,
    shaders: Option<Shaders>,
    compute: Option<ComputeStage<wgpu::ComputePipeline, wgpu::BindGroup>>,
    render: Option<RenderStage<wgpu::RenderPipeline, wgpu::BindGroup>>,
}

impl ParticleSystem {
    pub fn new(config: ParticleConfig, input: InputChannel) -> Self {
        Self {
            host: ParticleHost::new(config),
            input,
            tracker: LifecycleTracker::new("particles"),
            geometry: None,
            shaders: None,
            compute: None,
            render: None,
        }
    }

    pub fn host(&self) -> &ParticleHost {
        &self.host
    }

    /// Current simulation step, `0` before geometry exists.
    pub fn step(&self) -> u64 {
        self.geometry.as_ref().map_or(0, |g| g.state.step())
    }
}

impl SceneObject for ParticleSystem {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.tracker.phase()
    }

    fn create_geometry(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.tracker.ensure(Lifecycle::Uninitialized)?;

        let alloc = ctx.allocator();
        let state = DoubleBuffered::allocate(
            &alloc,
            "particles",
            self.host.config().count,
            std::mem::size_of::<Particle>() as u64,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        )?;
        let uniforms = alloc.create_buffer(&BufferDesc {
            label: "particle uniforms",
            size: std::mem::size_of::<ParticleUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })?;

        self.host.mirror().sync(&alloc, &state)?;
        self.geometry = Some(Geometry { state, uniforms });
        self.tracker.geometry_created()
    }

    fn create_shaders(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.tracker.ensure(Lifecycle::GeometryReady)?;

        let compute = wgpu::ShaderStages::COMPUTE;
        let compute_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particles compute bgl"),
            entries: &[
                pipeline::storage_entry(0, compute, true),
                pipeline::storage_entry(1, compute, false),
                pipeline::uniform_entry::<ParticleUniforms>(2, compute),
            ],
        });

        let render_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particles render bgl"),
            entries: &[pipeline::storage_entry(0, wgpu::ShaderStages::VERTEX, true)],
        });

        self.shaders = Some(Shaders {
            module: pipeline::shader_module(ctx.device, "particles shader", SHADER),
            compute_layout,
            render_layout,
        });
        self.tracker.shaders_created()
    }

    fn create_compute_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.tracker.ensure(Lifecycle::ShadersReady)?;
        let (Some(geo), Some(shaders)) = (&self.geometry, &self.shaders) else {
            return Err(self.tracker.missing(Lifecycle::ShadersReady));
        };

        let pipeline = pipeline::compute_pipeline(
            ctx.device,
            "particles compute",
            &shaders.compute_layout,
            &shaders.module,
            "cs_main",
        );
        let bind_sets = BindSets::build_wgpu(
            ctx.device,
            "particles compute",
            &shaders.compute_layout,
            &geo.state,
            BindSlots { read: 0, write: Some(1) },
            &[(2, &geo.uniforms)],
        );

        self.compute = Some(ComputeStage::new(
            pipeline,
            bind_sets,
            Domain::Linear(geo.state.element_count()),
            BlockSize::LINEAR_256,
        ));
        self.tracker.compute_pipeline_created()
    }

    fn create_render_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.tracker.ensure(Lifecycle::ShadersReady)?;
        let (Some(geo), Some(shaders)) = (&self.geometry, &self.shaders) else {
            return Err(self.tracker.missing(Lifecycle::ShadersReady));
        };

        let pipeline = pipeline::render_pipeline(
            ctx.device,
            &RenderPipelineDesc {
                label: "particles render",
                layout: &shaders.render_layout,
                module: &shaders.module,
                vs_entry: "vs_main",
                fs_entry: "fs_main",
                vertex_buffers: &[],
                topology: wgpu::PrimitiveTopology::PointList,
                format: ctx.surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
            },
        );
        let bind_sets = BindSets::build_wgpu(
            ctx.device,
            "particles render",
            &shaders.render_layout,
            &geo.state,
            BindSlots { read: 0, write: None },
            &[],
        );

        self.render = Some(RenderStage::new(
            pipeline,
            bind_sets,
            DrawShape::Points { count: geo.state.element_count() },
        ));
        self.tracker.render_pipeline_created()
    }

    fn update(&mut self, ctx: &RenderCtx<'_>, dt: f32) -> Result<(), SimError> {
        self.tracker.require_pipelines()?;
        let Some(geo) = &self.geometry else {
            return Err(self.tracker.missing(Lifecycle::GeometryReady));
        };

        let (actions, pointer) = {
            let mut input = self.input.borrow_mut();
            (input.drain(), input.pointer)
        };

        let mut dirty = false;
        for action in actions {
            dirty |= self.host.apply(action);
        }
        dirty |= self.host.emit_due(dt);

        if dirty {
            self.host.mirror().sync(&ctx.allocator(), &geo.state)?;
        }
        self.host.age(dt);

        let uniforms = self.host.uniforms(pointer.unwrap_or([0.0, 0.0]), dt);
        ctx.write_uniform(geo.uniforms.raw(), &uniforms);
        Ok(())
    }

    fn compute(&mut self, pass: &mut wgpu::ComputePass<'_>) -> Result<(), SimError> {
        self.tracker.require_pipelines()?;
        let (Some(geo), Some(stage)) = (self.geometry.as_mut(), &self.compute) else {
            return Err(self.tracker.missing(Lifecycle::PipelinesReady));
        };

        stage.dispatch(pass, &mut geo.state, self.host.control())?;
        Ok(())
    }

    fn render(&mut self, pass: &mut wgpu::RenderPass<'_>) -> Result<(), SimError> {
        self.tracker.require_pipelines()?;
        let (Some(geo), Some(stage)) = (&self.geometry, &self.render) else {
            return Err(self.tracker.missing(Lifecycle::PipelinesReady));
        };

        stage.draw(pass, &geo.state, None)
    }
}
