//! Whole-frame sequences driven through the host allocator and command log.

use crate::sim::{
    BindSets, BlockSize, CommandLog, ComputeStage, Domain, DoubleBuffered, DrawShape, HostAllocator,
    HostBuffer, Recorded, RenderStage, ResourceHandle, ResourceId, SimAction, SimControl, Workgroups,
};

use super::automaton::{AutomatonConfig, AutomatonHost, Cell};
use super::particles::{Particle, ParticleConfig, ParticleHost};

type GroupIds = (ResourceId, Option<ResourceId>);

struct Rig {
    alloc: HostAllocator,
    state: DoubleBuffered<HostBuffer>,
    compute: ComputeStage<String, GroupIds>,
    render: RenderStage<String, GroupIds>,
}

impl Rig {
    fn new(label: &str, count: u32, record: usize, domain: Domain, block: BlockSize, shape: DrawShape) -> Self {
        let alloc = HostAllocator::default();
        let state = DoubleBuffered::allocate(
            &alloc,
            label,
            count,
            record as u64,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        )
        .unwrap();
        let compute = ComputeStage::new(
            "cs_main".to_string(),
            BindSets::build(label, &state, |o| (o.read.id(), Some(o.write.id()))),
            domain,
            block,
        );
        let render = RenderStage::new(
            "vs_main".to_string(),
            BindSets::build(label, &state, |o| (o.read.id(), None)),
            shape,
        );
        Self { alloc, state, compute, render }
    }

    fn particles(count: u32) -> Self {
        Self::new(
            "particles",
            count,
            std::mem::size_of::<Particle>(),
            Domain::Linear(count),
            BlockSize::LINEAR_256,
            DrawShape::Points { count },
        )
    }

    fn current<T: bytemuck::Pod>(&self) -> Vec<T> {
        bytemuck::pod_collect_to_vec(&self.alloc.read(self.state.current()))
    }

    /// One frame: compute then draw, both recorded into `log`.
    fn frame(&mut self, log: &mut CommandLog<GroupIds>, control: &SimControl) {
        self.compute.dispatch(log, &mut self.state, control).unwrap();
        self.render.draw(log, &self.state, None).unwrap();
    }
}

#[test]
fn particle_emission_pause_and_resume() {
    let mut rig = Rig::particles(2048);
    let mut host = ParticleHost::new(ParticleConfig {
        auto_rate: 0.0,
        seed: Some(11),
        ..ParticleConfig::default()
    });
    assert_eq!(rig.compute.workgroups(), Workgroups { x: 8, y: 1, z: 1 });

    assert!(host.apply(SimAction::Emit(100)));
    host.mirror().sync(&rig.alloc, &rig.state).unwrap();

    let uploaded: Vec<Particle> = rig.current();
    assert_eq!(uploaded.iter().filter(|p| p.alive == 1).count(), 100);
    assert!(uploaded[..100].iter().all(|p| p.alive == 1));
    assert!(uploaded[100..].iter().all(|p| *p == Particle::default()));
    assert_eq!(uploaded.len() - 100, 1948);

    let mut log = CommandLog::new();
    for _ in 0..10 {
        rig.frame(&mut log, host.control());
    }
    assert_eq!(rig.state.step(), 10);

    host.apply(SimAction::TogglePause);
    for _ in 0..5 {
        rig.frame(&mut log, host.control());
    }
    assert_eq!(rig.state.step(), 10);
    assert_eq!(log.dispatch_count(), 10);

    host.apply(SimAction::TogglePause);
    rig.frame(&mut log, host.control());
    assert_eq!(rig.state.step(), 11);
}

#[test]
fn draws_always_read_the_latest_write() {
    let mut rig = Rig::particles(512);
    let control = SimControl::new();
    let mut log = CommandLog::new();

    for _ in 0..4 {
        rig.frame(&mut log, &control);
    }

    // compute binds (read, Some(write)); draws bind (read, None)
    let mut last_write = None;
    for group in log.bind_groups() {
        match *group {
            (_, Some(write)) => last_write = Some(write),
            (read, None) => assert_eq!(Some(read), last_write),
        }
    }
    assert!(log.commands.iter().any(|c| matches!(c, Recorded::Draw { .. })));
}

#[test]
fn emission_saturates_at_capacity() {
    let rig = Rig::particles(150);
    let mut host = ParticleHost::new(ParticleConfig {
        count: 150,
        auto_rate: 0.0,
        seed: Some(2),
        ..ParticleConfig::default()
    });

    assert!(host.apply(SimAction::Emit(100)));
    assert!(host.apply(SimAction::Emit(100)));
    assert!(!host.apply(SimAction::Emit(100)));
    host.mirror().sync(&rig.alloc, &rig.state).unwrap();

    let uploaded: Vec<Particle> = rig.current();
    assert!(uploaded.iter().all(|p| p.alive == 1));
}

#[test]
fn click_uploads_into_current_handle_after_steps() {
    let mut host = AutomatonHost::new(AutomatonConfig {
        width: 16,
        height: 16,
        seed_density: 0.0,
        seed: Some(5),
    });
    let mut rig = Rig::new(
        "cells",
        host.cell_count(),
        std::mem::size_of::<Cell>(),
        Domain::Grid { width: 16, height: 16 },
        BlockSize::TILE_4X4,
        DrawShape::Instanced { vertices: 4, instances: 256 },
    );
    assert_eq!(rig.compute.workgroups(), Workgroups { x: 4, y: 4, z: 1 });

    let mut log = CommandLog::new();
    for _ in 0..3 {
        host.step();
        rig.frame(&mut log, host.control());
    }
    assert_eq!(rig.state.current_index(), 1);

    assert!(host.apply(SimAction::Click([0.0, 0.0])));
    host.mirror().sync(&rig.alloc, &rig.state).unwrap();

    assert_eq!(rig.alloc.write_log().last(), Some(&rig.state.current().id()));
    let cells: Vec<Cell> = rig.current();
    assert_eq!(cells, host.mirror().elements());
    assert_eq!(cells.iter().filter(|c| c.alive == 1).count(), 1);
}
