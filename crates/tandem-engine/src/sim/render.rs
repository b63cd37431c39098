use super::bind_sets::BindSets;
use super::encoder::DrawEncoder;
use super::handle::ResourceHandle;
use super::ping_pong::DoubleBuffered;
use super::SimError;

/// Vertex/instance layout of a simulation draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawShape {
    /// One point per element.
    Points { count: u32 },
    /// `vertices` per instance, one instance per element.
    Instanced { vertices: u32, instances: u32 },
}

impl DrawShape {
    #[inline]
    pub fn vertex_count(self) -> u32 {
        match self {
            DrawShape::Points { count } => count,
            DrawShape::Instanced { vertices, .. } => vertices,
        }
    }

    #[inline]
    pub fn instance_count(self) -> u32 {
        match self {
            DrawShape::Points { .. } => 1,
            DrawShape::Instanced { instances, .. } => instances,
        }
    }
}

/// Draws the current state of a ping-pong pair.
///
/// Only the read side of each render bind set is ever bound, so the draw sees
/// the handle most recently completed by compute and never the in-flight one.
#[derive(Debug)]
pub struct RenderStage<P, B> {
    pipeline: P,
    bind_sets: BindSets<B>,
    shape: DrawShape,
}

impl<P, B> RenderStage<P, B> {
    pub fn new(pipeline: P, bind_sets: BindSets<B>, shape: DrawShape) -> Self {
        Self { pipeline, bind_sets, shape }
    }

    #[inline]
    pub fn shape(&self) -> DrawShape {
        self.shape
    }

    pub fn draw<E, H>(
        &self,
        encoder: &mut E,
        state: &DoubleBuffered<H>,
        vertex_buffer: Option<&E::Buffer>,
    ) -> Result<(), SimError>
    where
        E: DrawEncoder<Pipeline = P, BindGroup = B>,
        H: ResourceHandle,
    {
        let set = self.bind_sets.select(state)?;

        encoder.set_pipeline(&self.pipeline);
        encoder.set_bind_group(0, set);
        if let Some(buffer) = vertex_buffer {
            encoder.set_vertex_buffer(0, buffer);
        }
        encoder.draw(0..self.shape.vertex_count(), 0..self.shape.instance_count());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::handle::ResourceId;
    use crate::sim::host::{HostAllocator, HostBuffer};
    use crate::sim::record::{CommandLog, Recorded};

    fn pair(host: &HostAllocator) -> DoubleBuffered<HostBuffer> {
        DoubleBuffered::allocate(
            host,
            "cells",
            256 * 256,
            4,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        )
        .unwrap()
    }

    #[test]
    fn binds_current_handle_only() {
        let host = HostAllocator::default();
        let mut state = pair(&host);
        let sets = BindSets::build("cells render", &state, |o| o.read.id());
        let stage = RenderStage::new(
            "vs_main".to_string(),
            sets,
            DrawShape::Instanced { vertices: 4, instances: 256 * 256 },
        );

        for _ in 0..3 {
            let mut log: CommandLog<ResourceId> = CommandLog::new();
            stage.draw(&mut log, &state, None).unwrap();
            assert_eq!(log.bind_groups().copied().collect::<Vec<_>>(), vec![state.current().id()]);
            state.advance();
        }
    }

    #[test]
    fn instanced_quad_per_cell() {
        let host = HostAllocator::default();
        let state = pair(&host);
        let sets = BindSets::build("cells render", &state, |o| o.index);
        let stage = RenderStage::new(
            "vs_main".to_string(),
            sets,
            DrawShape::Instanced { vertices: 4, instances: 65536 },
        );

        let mut log = CommandLog::new();
        stage.draw(&mut log, &state, None).unwrap();
        assert_eq!(
            log.commands.last(),
            Some(&Recorded::Draw { vertices: 0..4, instances: 0..65536 })
        );
    }

    #[test]
    fn points_with_vertex_buffer() {
        let host = HostAllocator::default();
        let state = pair(&host);
        let sets = BindSets::build("points", &state, |o| o.index);
        let stage = RenderStage::new("vs_main".to_string(), sets, DrawShape::Points { count: 2048 });

        let mut log = CommandLog::new();
        let [first, _] = state.handles();
        stage.draw(&mut log, &state, Some(first)).unwrap();

        assert_eq!(
            log.commands,
            vec![
                Recorded::Pipeline("vs_main".into()),
                Recorded::BindGroup { index: 0, group: 0 },
                Recorded::VertexBuffer { slot: 0, buffer: first.id() },
                Recorded::Draw { vertices: 0..2048, instances: 0..1 },
            ]
        );
    }
}
