use super::bind_sets::BindSets;
use super::control::SimControl;
use super::encoder::ComputeEncoder;
use super::handle::ResourceHandle;
use super::ping_pong::DoubleBuffered;
use super::workgroups::{BlockSize, Domain, Workgroups};
use super::SimError;

/// Result of one compute tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DispatchOutcome {
    /// A dispatch was recorded; `step` is the counter after the advance.
    Dispatched { step: u64, groups: Workgroups },
    /// Paused: nothing recorded, step unchanged.
    Paused,
}

/// Advances a ping-pong state by one step per call.
///
/// Each dispatch reads only the current handle and writes only the next one,
/// through the bind set selected by step parity. The step advances as soon as
/// the dispatch is recorded; ordering against the following render is left to
/// the device queue.
#[derive(Debug)]
pub struct ComputeStage<P, B> {
    pipeline: P,
    bind_sets: BindSets<B>,
    domain: Domain,
    block: BlockSize,
}

impl<P, B> ComputeStage<P, B> {
    pub fn new(pipeline: P, bind_sets: BindSets<B>, domain: Domain, block: BlockSize) -> Self {
        Self { pipeline, bind_sets, domain, block }
    }

    #[inline]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    #[inline]
    pub fn workgroups(&self) -> Workgroups {
        self.domain.workgroups(self.block)
    }

    #[inline]
    pub fn bind_sets(&self) -> &BindSets<B> {
        &self.bind_sets
    }

    pub fn dispatch<E, H>(
        &self,
        encoder: &mut E,
        state: &mut DoubleBuffered<H>,
        control: &SimControl,
    ) -> Result<DispatchOutcome, SimError>
    where
        E: ComputeEncoder<Pipeline = P, BindGroup = B>,
        H: ResourceHandle,
    {
        if control.is_paused() {
            return Ok(DispatchOutcome::Paused);
        }

        let set = self.bind_sets.select(state)?;
        let groups = self.workgroups();

        encoder.set_pipeline(&self.pipeline);
        encoder.set_bind_group(0, set);
        encoder.dispatch(groups);

        state.advance();

        log::trace!(
            "{}: step {} (reported {})",
            self.bind_sets.label(),
            state.step(),
            control.reported_step(state.step())
        );

        Ok(DispatchOutcome::Dispatched { step: state.step(), groups })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::handle::ResourceId;
    use crate::sim::host::{HostAllocator, HostBuffer};
    use crate::sim::record::{CommandLog, Recorded};

    type GroupIds = (ResourceId, ResourceId);

    fn setup(host: &HostAllocator) -> (DoubleBuffered<HostBuffer>, ComputeStage<String, GroupIds>) {
        let state = DoubleBuffered::allocate(
            host,
            "particles",
            2048,
            32,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        )
        .unwrap();
        let sets = BindSets::build("particles", &state, |o| (o.read.id(), o.write.id()));
        let stage = ComputeStage::new(
            "cs_main".to_string(),
            sets,
            Domain::Linear(2048),
            BlockSize::LINEAR_256,
        );
        (state, stage)
    }

    #[test]
    fn dispatch_records_and_advances() {
        let host = HostAllocator::default();
        let (mut state, stage) = setup(&host);
        let control = SimControl::new();
        let mut log = CommandLog::new();

        let (cur, next) = (state.current().id(), state.next().id());
        let out = stage.dispatch(&mut log, &mut state, &control).unwrap();

        let groups = Workgroups { x: 8, y: 1, z: 1 };
        assert_eq!(out, DispatchOutcome::Dispatched { step: 1, groups });
        assert_eq!(
            log.commands,
            vec![
                Recorded::Pipeline("cs_main".into()),
                Recorded::BindGroup { index: 0, group: (cur, next) },
                Recorded::Dispatch(groups),
            ]
        );
        assert_eq!(state.current().id(), next);
    }

    #[test]
    fn read_of_next_step_is_write_of_this_step() {
        let host = HostAllocator::default();
        let (mut state, stage) = setup(&host);
        let control = SimControl::new();
        let mut log = CommandLog::new();

        for _ in 0..6 {
            stage.dispatch(&mut log, &mut state, &control).unwrap();
        }

        let groups: Vec<GroupIds> = log.bind_groups().copied().collect();
        for pair in groups.windows(2) {
            let (_, written) = pair[0];
            let (read, _) = pair[1];
            assert_eq!(read, written);
        }
    }

    #[test]
    fn paused_dispatch_is_skipped() {
        let host = HostAllocator::default();
        let (mut state, stage) = setup(&host);
        let mut control = SimControl::new();
        control.set_paused(true);
        let mut log = CommandLog::new();

        assert_eq!(
            stage.dispatch(&mut log, &mut state, &control).unwrap(),
            DispatchOutcome::Paused
        );
        assert!(log.commands.is_empty());
        assert_eq!(state.step(), 0);
    }

    #[test]
    fn speed_factor_does_not_change_dispatch_count() {
        let host = HostAllocator::default();
        let (mut state, stage) = setup(&host);
        let mut control = SimControl::new();
        control.speed_up();
        control.speed_up();
        let mut log = CommandLog::new();

        for _ in 0..5 {
            stage.dispatch(&mut log, &mut state, &control).unwrap();
        }
        assert_eq!(log.dispatch_count(), 5);
        assert_eq!(state.step(), 5);
    }

    #[test]
    fn stale_bind_sets_refuse_to_dispatch() {
        let host = HostAllocator::default();
        let (_, stage) = setup(&host);
        let (mut other, _) = setup(&host);
        let mut log = CommandLog::new();

        let err = stage
            .dispatch(&mut log, &mut other, &SimControl::new())
            .unwrap_err();
        assert!(matches!(err, SimError::StaleBinding { .. }));
        assert_eq!(other.step(), 0);
        assert!(log.commands.is_empty());
    }
}
