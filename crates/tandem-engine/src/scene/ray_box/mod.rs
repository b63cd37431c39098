//! Ray-traced box.
//!
//! A compute kernel casts one ray per pixel into a storage image sized to the
//! surface; a fullscreen triangle then blits that image. Nothing here is
//! double-buffered. The image is replaced on resize, which invalidates both
//! bind groups built against it.

mod host;
mod tracer;

pub use host::{BoxUniform, Camera, CameraUniform, LightUniform, Pulse, RayBoxConfig, RayBoxHost};
pub use tracer::{RayTracer, TargetBinding, TargetInfo};

use crate::render::RenderCtx;
use crate::sim::{
    Allocator, BufferDesc, GpuBuffer, InputChannel, Lifecycle, LifecycleTracker, ResourceId,
    SceneObject, SimError,
};

use super::pipeline::{self, RenderPipelineDesc};

const TRACE_SHADER: &str = include_str!("ray_box.wgsl");
const BLIT_SHADER: &str = include_str!("blit.wgsl");
const IMAGE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

struct Uniforms {
    camera: GpuBuffer,
    cube: GpuBuffer,
    light: GpuBuffer,
}

struct Target {
    info: TargetInfo,
    // keeps the image alive for `view`
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct Shaders {
    trace: wgpu::ShaderModule,
    blit: wgpu::ShaderModule,
    trace_layout: wgpu::BindGroupLayout,
    blit_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

struct Blit {
    pipeline: wgpu::RenderPipeline,
    binding: TargetBinding<wgpu::BindGroup>,
}

pub struct RayBox {
    host: RayBoxHost,
    input: InputChannel,
    tracker: LifecycleTracker,

    uniforms: Option<Uniforms>,
    target: Option<Target>,
    shaders: Option<Shaders>,
    tracer: Option<RayTracer<wgpu::ComputePipeline, wgpu::BindGroup>>,
    blit: Option<Blit>,
}

fn create_target(ctx: &RenderCtx<'_>) -> Result<Target, SimError> {
    let (width, height) = (ctx.surface_size.0.max(1), ctx.surface_size.1.max(1));
    let limit = ctx.max_texture_side();
    if width > limit || height > limit {
        return Err(SimError::Allocation {
            label: "ray box image".to_string(),
            requested: u64::from(width) * u64::from(height) * 4,
            limit: u64::from(limit) * u64::from(limit) * 4,
        });
    }

    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("ray box image"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: IMAGE_FORMAT,
        usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    log::debug!("ray box image {width}x{height}");
    Ok(Target {
        info: TargetInfo { id: ResourceId::fresh(), width, height },
        _texture: texture,
        view,
    })
}

fn trace_binding(
    device: &wgpu::Device,
    shaders: &Shaders,
    uniforms: &Uniforms,
    target: &Target,
) -> TargetBinding<wgpu::BindGroup> {
    let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("ray box trace"),
        layout: &shaders.trace_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.camera.raw().as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: uniforms.cube.raw().as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&target.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: uniforms.light.raw().as_entire_binding(),
            },
        ],
    });
    TargetBinding::new("ray box trace", target.info.id, group)
}

fn blit_binding(device: &wgpu::Device, shaders: &Shaders, target: &Target) -> TargetBinding<wgpu::BindGroup> {
    let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("ray box blit"),
        layout: &shaders.blit_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&target.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&shaders.sampler),
            },
        ],
    });
    TargetBinding::new("ray box blit", target.info.id, group)
}

impl RayBox {
    pub fn new(config: RayBoxConfig, input: InputChannel) -> Self {
        Self {
            host: RayBoxHost::new(config),
            input,
            tracker: LifecycleTracker::new("ray box"),
            uniforms: None,
            target: None,
            shaders: None,
            tracer: None,
            blit: None,
        }
    }

    pub fn host(&self) -> &RayBoxHost {
        &self.host
    }

    /// Current output image, once geometry exists.
    pub fn target(&self) -> Option<TargetInfo> {
        self.target.as_ref().map(|t| t.info)
    }
}

impl SceneObject for RayBox {
    fn name(&self) -> &'static str {
        "ray box"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.tracker.phase()
    }

    fn create_geometry(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.tracker.ensure(Lifecycle::Uninitialized)?;

        let alloc = ctx.allocator();
        let uniform = |label, size: usize| {
            alloc.create_buffer(&BufferDesc {
                label,
                size: size as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };
        let uniforms = Uniforms {
            camera: uniform("camera", std::mem::size_of::<CameraUniform>())?,
            cube: uniform("box", std::mem::size_of::<BoxUniform>())?,
            light: uniform("light", std::mem::size_of::<LightUniform>())?,
        };

        let target = create_target(ctx)?;
        self.host.set_resolution(target.info.width, target.info.height);

        ctx.write_uniform(uniforms.camera.raw(), &self.host.camera_uniform());
        ctx.write_uniform(uniforms.cube.raw(), &self.host.box_uniform());
        ctx.write_uniform(uniforms.light.raw(), &self.host.light_uniform());

        self.uniforms = Some(uniforms);
        self.target = Some(target);
        self.tracker.geometry_created()
    }

    fn create_shaders(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.tracker.ensure(Lifecycle::GeometryReady)?;

        let compute = wgpu::ShaderStages::COMPUTE;
        let trace_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ray box trace bgl"),
            entries: &[
                pipeline::uniform_entry::<CameraUniform>(0, compute),
                pipeline::uniform_entry::<BoxUniform>(1, compute),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: compute,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: IMAGE_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                pipeline::uniform_entry::<LightUniform>(3, compute),
            ],
        });

        let fragment = wgpu::ShaderStages::FRAGMENT;
        let blit_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ray box blit bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: fragment,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: fragment,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ray box sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        self.shaders = Some(Shaders {
            trace: pipeline::shader_module(ctx.device, "ray box trace shader", TRACE_SHADER),
            blit: pipeline::shader_module(ctx.device, "ray box blit shader", BLIT_SHADER),
            trace_layout,
            blit_layout,
            sampler,
        });
        self.tracker.shaders_created()
    }

    fn create_compute_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.tracker.ensure(Lifecycle::ShadersReady)?;
        let (Some(uniforms), Some(target), Some(shaders)) = (&self.uniforms, &self.target, &self.shaders) else {
            return Err(self.tracker.missing(Lifecycle::ShadersReady));
        };

        let make = |label, entry| {
            pipeline::compute_pipeline(ctx.device, label, &shaders.trace_layout, &shaders.trace, entry)
        };
        self.tracer = Some(RayTracer::new(
            make("ray box orthographic", "cs_orthographic"),
            make("ray box projective", "cs_projective"),
            trace_binding(ctx.device, shaders, uniforms, target),
        ));
        self.tracker.compute_pipeline_created()
    }

    fn create_render_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        self.tracker.ensure(Lifecycle::ShadersReady)?;
        let (Some(target), Some(shaders)) = (&self.target, &self.shaders) else {
            return Err(self.tracker.missing(Lifecycle::ShadersReady));
        };

        let pipeline = pipeline::render_pipeline(
            ctx.device,
            &RenderPipelineDesc {
                label: "ray box blit",
                layout: &shaders.blit_layout,
                module: &shaders.blit,
                vs_entry: "vs_blit",
                fs_entry: "fs_blit",
                vertex_buffers: &[],
                topology: wgpu::PrimitiveTopology::TriangleList,
                format: ctx.surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
            },
        );

        self.blit = Some(Blit {
            pipeline,
            binding: blit_binding(ctx.device, shaders, target),
        });
        self.tracker.render_pipeline_created()
    }

    fn update(&mut self, ctx: &RenderCtx<'_>, _dt: f32) -> Result<(), SimError> {
        self.tracker.require_pipelines()?;
        let Some(uniforms) = &self.uniforms else {
            return Err(self.tracker.missing(Lifecycle::GeometryReady));
        };

        let actions = self.input.borrow_mut().drain();
        for action in actions {
            self.host.apply(action);
        }
        self.host.tick();

        ctx.write_uniform(uniforms.camera.raw(), &self.host.camera_uniform());
        ctx.write_uniform(uniforms.cube.raw(), &self.host.box_uniform());
        ctx.write_uniform(uniforms.light.raw(), &self.host.light_uniform());
        Ok(())
    }

    fn compute(&mut self, pass: &mut wgpu::ComputePass<'_>) -> Result<(), SimError> {
        self.tracker.require_pipelines()?;
        let (Some(target), Some(tracer)) = (&self.target, &self.tracer) else {
            return Err(self.tracker.missing(Lifecycle::PipelinesReady));
        };

        let groups = tracer.dispatch(pass, target.info, self.host.camera().projective)?;
        log::trace!("ray box: {}x{} workgroups", groups.x, groups.y);
        Ok(())
    }

    fn render(&mut self, pass: &mut wgpu::RenderPass<'_>) -> Result<(), SimError> {
        self.tracker.require_pipelines()?;
        let (Some(target), Some(blit)) = (&self.target, &self.blit) else {
            return Err(self.tracker.missing(Lifecycle::PipelinesReady));
        };

        let group = blit.binding.select(target.info.id)?;
        pass.set_pipeline(&blit.pipeline);
        pass.set_bind_group(0, group, &[]);
        pass.draw(0..3, 0..1);
        Ok(())
    }

    fn resize(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        if self.tracker.phase() < Lifecycle::GeometryReady {
            return Ok(());
        }

        let target = create_target(ctx)?;
        self.host.set_resolution(target.info.width, target.info.height);

        if let (Some(shaders), Some(uniforms)) = (&self.shaders, &self.uniforms) {
            if let Some(tracer) = self.tracer.as_mut() {
                tracer.rebind(trace_binding(ctx.device, shaders, uniforms, &target));
            }
            if let Some(blit) = self.blit.as_mut() {
                blit.binding = blit_binding(ctx.device, shaders, &target);
            }
        }

        self.target = Some(target);
        Ok(())
    }
}
