//! Game of Life on a toroidal grid.
//!
//! Cells ping-pong between two storage buffers; each dispatch computes one
//! generation in 4x4 tiles. Every cell is drawn as an instanced quad whose
//! corners come from a small vertex buffer.

mod host;

pub use host::{cell_at, life_step, AutomatonConfig, AutomatonHost, Cell, GridUniforms};

use crate::render::RenderCtx;
use crate::sim::{
    Allocator, BindSets, BindSlots, BlockSize, BufferDesc, ComputeStage, Domain, DoubleBuffered,
    DrawShape, GpuBuffer, InputChannel, Lifecycle, LifecycleTracker, RenderStage, SceneObject,
    SimError,
};

use super::pipeline::{self, RenderPipelineDesc};

const SHADER: &str = include_str!("automaton.wgsl");

/// Unit quad corners, triangle strip order.
const QUAD: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

struct Geometry {
    state: DoubleBuffered<GpuBuffer>,
    grid: GpuBuffer,
    quad: GpuBuffer,
}

struct Shaders {
    module: wgpu::ShaderModule,
    compute_layout: wgpu::BindGroupLayout,
    render_layout: wgpu::BindGroupLayout,
}

pub struct Automaton {
    host: AutomatonHost,
    input: InputChannel,
    tracker: LifecycleTracker,

    geometry: Option<Geometry>,
    shaders: Option<Shaders>,
    compute: Option<ComputeStage<wgpu::ComputePipeline, wgpu::BindGroup>>,
    render: Option<RenderStage<wgpu::RenderPipeline, wgpu::BindGroup>>,
}

impl Automaton {
    pub fn new(config: AutomatonConfig, input: InputChannel) -> Self {
        Self {
            host: AutomatonHost::new(config),
            input,
            tracker: LifecycleTracker::new("automaton"),
            geometry: None,
            shaders: None,
            compute: None,
            render: None,
        }
    }

    pub fn host(&self) -> &AutomatonHost {
        &self.host
    }

    pub fn step(&self) -> u64 {
        self.geometry.as_ref().map_or(0, |g| g.state.step())
    }
}

impl SceneObject for Automaton {
    fn name(&self) -> &'static str {
        "automaton"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.tracker.phase()
    }

    fn create_geometry(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.tracker.ensure(Lifecycle::Uninitialized)?;

        let alloc = ctx.allocator();
        let state = DoubleBuffered::allocate(
            &alloc,
            "cells",
            self.host.cell_count(),
            std::mem::size_of::<Cell>() as u64,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        )?;
        let grid = alloc.create_buffer(&BufferDesc {
            label: "grid uniforms",
            size: std::mem::size_of::<GridUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })?;
        let quad = alloc.create_buffer(&BufferDesc {
            label: "cell quad",
            size: std::mem::size_of_val(&QUAD) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        })?;

        alloc.write_buffer(&quad, 0, bytemuck::cast_slice(&QUAD));
        ctx.write_uniform(grid.raw(), &self.host.uniforms());
        self.host.mirror().sync(&alloc, &state)?;

        self.geometry = Some(Geometry { state, grid, quad });
        self.tracker.geometry_created()
    }

    fn create_shaders(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.tracker.ensure(Lifecycle::GeometryReady)?;

        let compute = wgpu::ShaderStages::COMPUTE;
        let compute_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("automaton compute bgl"),
            entries: &[
                pipeline::uniform_entry::<GridUniforms>(0, compute),
                pipeline::storage_entry(1, compute, true),
                pipeline::storage_entry(2, compute, false),
            ],
        });

        let vertex = wgpu::ShaderStages::VERTEX;
        let render_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("automaton render bgl"),
            entries: &[
                pipeline::uniform_entry::<GridUniforms>(0, vertex),
                pipeline::storage_entry(1, vertex, true),
            ],
        });

        self.shaders = Some(Shaders {
            module: pipeline::shader_module(ctx.device, "automaton shader", SHADER),
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
            "automaton compute",
            &shaders.compute_layout,
            &shaders.module,
            "cs_main",
        );
        let bind_sets = BindSets::build_wgpu(
            ctx.device,
            "automaton compute",
            &shaders.compute_layout,
            &geo.state,
            BindSlots { read: 1, write: Some(2) },
            &[(0, &geo.grid)],
        );

        let config = self.host.config();
        self.compute = Some(ComputeStage::new(
            pipeline,
            bind_sets,
            Domain::Grid { width: config.width, height: config.height },
            BlockSize::TILE_4X4,
        ));
        self.tracker.compute_pipeline_created()
    }

    fn create_render_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.tracker.ensure(Lifecycle::ShadersReady)?;
        let (Some(geo), Some(shaders)) = (&self.geometry, &self.shaders) else {
            return Err(self.tracker.missing(Lifecycle::ShadersReady));
        };

        let quad_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x2],
        };

        let pipeline = pipeline::render_pipeline(
            ctx.device,
            &RenderPipelineDesc {
                label: "automaton render",
                layout: &shaders.render_layout,
                module: &shaders.module,
                vs_entry: "vs_main",
                fs_entry: "fs_main",
                vertex_buffers: &[quad_layout],
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                format: ctx.surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
            },
        );
        let bind_sets = BindSets::build_wgpu(
            ctx.device,
            "automaton render",
            &shaders.render_layout,
            &geo.state,
            BindSlots { read: 1, write: None },
            &[(0, &geo.grid)],
        );

        self.render = Some(RenderStage::new(
            pipeline,
            bind_sets,
            DrawShape::Instanced {
                vertices: QUAD.len() as u32,
                instances: geo.state.element_count(),
            },
        ));
        self.tracker.render_pipeline_created()
    }

    fn update(&mut self, ctx: &RenderCtx<'_>, _dt: f32) -> Result<(), SimError> {
        self.tracker.require_pipelines()?;
        let Some(geo) = &self.geometry else {
            return Err(self.tracker.missing(Lifecycle::GeometryReady));
        };

        let actions = self.input.borrow_mut().drain();
        let mut dirty = false;
        for action in actions {
            dirty |= self.host.apply(action);
        }
        if dirty {
            self.host.mirror().sync(&ctx.allocator(), &geo.state)?;
        }

        // keep the mirror one generation ahead, matching this frame's dispatch
        self.host.step();
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

        stage.draw(pass, &geo.state, Some(&geo.quad))
    }
}
