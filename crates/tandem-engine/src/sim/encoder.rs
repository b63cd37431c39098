//! Pass-recording seams.
//!
//! Stages talk to these traits instead of wgpu passes directly, so the same
//! stage code records into a live pass or into a [`CommandLog`](super::record::CommandLog).

use std::ops::Range;

use super::handle::GpuBuffer;
use super::workgroups::Workgroups;

/// Commands a compute stage records.
pub trait ComputeEncoder {
    type Pipeline;
    type BindGroup;

    fn set_pipeline(&mut self, pipeline: &Self::Pipeline);
    fn set_bind_group(&mut self, index: u32, group: &Self::BindGroup);
    fn dispatch(&mut self, groups: Workgroups);
}

/// Commands a render stage records.
pub trait DrawEncoder {
    type Pipeline;
    type BindGroup;
    type Buffer;

    fn set_pipeline(&mut self, pipeline: &Self::Pipeline);
    fn set_bind_group(&mut self, index: u32, group: &Self::BindGroup);
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &Self::Buffer);
    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>);
}

impl ComputeEncoder for wgpu::ComputePass<'_> {
    type Pipeline = wgpu::ComputePipeline;
    type BindGroup = wgpu::BindGroup;

    fn set_pipeline(&mut self, pipeline: &wgpu::ComputePipeline) {
        wgpu::ComputePass::set_pipeline(self, pipeline);
    }

    fn set_bind_group(&mut self, index: u32, group: &wgpu::BindGroup) {
        wgpu::ComputePass::set_bind_group(self, index, group, &[]);
    }

    fn dispatch(&mut self, groups: Workgroups) {
        self.dispatch_workgroups(groups.x, groups.y, groups.z);
    }
}

impl DrawEncoder for wgpu::RenderPass<'_> {
    type Pipeline = wgpu::RenderPipeline;
    type BindGroup = wgpu::BindGroup;
    type Buffer = GpuBuffer;

    fn set_pipeline(&mut self, pipeline: &wgpu::RenderPipeline) {
        wgpu::RenderPass::set_pipeline(self, pipeline);
    }

    fn set_bind_group(&mut self, index: u32, group: &wgpu::BindGroup) {
        wgpu::RenderPass::set_bind_group(self, index, group, &[]);
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &GpuBuffer) {
        wgpu::RenderPass::set_vertex_buffer(self, slot, buffer.raw().slice(..));
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        wgpu::RenderPass::draw(self, vertices, instances);
    }
}
