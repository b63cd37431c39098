use std::ops::Range;

use super::encoder::{ComputeEncoder, DrawEncoder};
use super::handle::{ResourceHandle, ResourceId};
use super::host::HostBuffer;
use super::workgroups::Workgroups;

/// One recorded pass command.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded<B> {
    Pipeline(String),
    BindGroup { index: u32, group: B },
    VertexBuffer { slot: u32, buffer: ResourceId },
    Dispatch(Workgroups),
    Draw { vertices: Range<u32>, instances: Range<u32> },
}

/// Encoder that stores commands instead of sending them to a device.
///
/// Pipelines are named by string; bind groups are any clonable value the
/// caller chose when building its bind sets.
#[derive(Debug)]
pub struct CommandLog<B> {
    pub commands: Vec<Recorded<B>>,
}

impl<B> CommandLog<B> {
    pub fn new() -> Self {
        Self { commands: Vec::new() }
    }

    /// Bind groups recorded so far, in order.
    pub fn bind_groups(&self) -> impl Iterator<Item = &B> {
        self.commands.iter().filter_map(|c| match c {
            Recorded::BindGroup { group, .. } => Some(group),
            _ => None,
        })
    }

    /// Number of recorded dispatches.
    pub fn dispatch_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Recorded::Dispatch(_)))
            .count()
    }
}

impl<B> Default for CommandLog<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Clone> ComputeEncoder for CommandLog<B> {
    type Pipeline = String;
    type BindGroup = B;

    fn set_pipeline(&mut self, pipeline: &String) {
        self.commands.push(Recorded::Pipeline(pipeline.clone()));
    }

    fn set_bind_group(&mut self, index: u32, group: &B) {
        self.commands.push(Recorded::BindGroup { index, group: group.clone() });
    }

    fn dispatch(&mut self, groups: Workgroups) {
        self.commands.push(Recorded::Dispatch(groups));
    }
}

impl<B: Clone> DrawEncoder for CommandLog<B> {
    type Pipeline = String;
    type BindGroup = B;
    type Buffer = HostBuffer;

    fn set_pipeline(&mut self, pipeline: &String) {
        self.commands.push(Recorded::Pipeline(pipeline.clone()));
    }

    fn set_bind_group(&mut self, index: u32, group: &B) {
        self.commands.push(Recorded::BindGroup { index, group: group.clone() });
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &HostBuffer) {
        self.commands.push(Recorded::VertexBuffer { slot, buffer: buffer.id() });
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        self.commands.push(Recorded::Draw { vertices, instances });
    }
}
