use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sim::{Element, HostMirror, SimAction, SimControl};

/// One particle as stored on the device (32 bytes, matches `Particle` in WGSL).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub age: f32,
    pub lifespan: f32,
    pub alive: u32,
    pub _pad: u32,
}

impl Element for Particle {
    fn is_inactive(&self) -> bool {
        self.alive == 0
    }
}

/// Per-frame parameters of the particle kernel.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleUniforms {
    /// Pointer in NDC.
    pub pointer: [f32; 2],
    /// Seconds simulated by this dispatch.
    pub dt: f32,
    /// Non-zero pulls particles towards `pointer`.
    pub attract: u32,
}

#[derive(Debug, Clone)]
pub struct ParticleConfig {
    pub count: u32,
    /// Particles emitted per `Emit` key press.
    pub burst: u32,
    /// Particles emitted by each automatic emission.
    pub auto_batch: u32,
    /// Automatic emissions per second; `0` disables them.
    pub auto_rate: f32,
    /// Seconds a particle lives.
    pub lifespan: f32,
    /// Particles spawn on a circle of this radius around the origin.
    pub spawn_radius: f32,
    /// Upper bound of each initial velocity component.
    pub max_speed: f32,
    pub attract: bool,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 2048,
            burst: 100,
            auto_batch: 10,
            auto_rate: 10.0,
            lifespan: 5.0,
            spawn_radius: 0.1,
            max_speed: 0.1,
            attract: true,
            seed: None,
        }
    }
}

/// Host side of the particle system: the authoritative liveness mirror,
/// run control and emission.
///
/// Positions evolve only on the device. The mirror tracks which slots are
/// alive by ageing them with the same `dt` the kernel receives, so emission
/// finds free slots without reading anything back. A frame runs
/// [`emit_due`](Self::emit_due), then the upload, then [`age`](Self::age):
/// the upload carries the ages the kernel is about to advance, and after
/// `age` the mirror equals what the dispatch writes.
#[derive(Debug)]
pub struct ParticleHost {
    config: ParticleConfig,
    mirror: HostMirror<Particle>,
    control: SimControl,
    attract: bool,
    emit_timer: f32,
    rng: StdRng,
}

impl ParticleHost {
    pub fn new(config: ParticleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            mirror: HostMirror::new(config.count),
            control: SimControl::new(),
            attract: config.attract,
            emit_timer: 0.0,
            rng,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    #[inline]
    pub fn mirror(&self) -> &HostMirror<Particle> {
        &self.mirror
    }

    #[inline]
    pub fn control(&self) -> &SimControl {
        &self.control
    }

    #[inline]
    pub fn control_mut(&mut self) -> &mut SimControl {
        &mut self.control
    }

    #[inline]
    pub fn attract(&self) -> bool {
        self.attract
    }

    /// Activates up to `n` free particles; returns how many were activated.
    pub fn emit(&mut self, n: u32) -> usize {
        let ParticleConfig { lifespan, spawn_radius, max_speed, .. } = self.config;
        let rng = &mut self.rng;

        self.mirror.activate(n as usize, |_, p| {
            let angle = rng.gen_range(0.0..TAU);
            *p = Particle {
                position: [angle.cos() * spawn_radius, angle.sin() * spawn_radius],
                velocity: [
                    rng.gen_range(-max_speed..=max_speed),
                    rng.gen_range(-max_speed..=max_speed),
                ],
                age: 0.0,
                lifespan,
                alive: 1,
                _pad: 0,
            };
        })
    }

    /// Applies one user action. Returns `true` when the mirror changed and
    /// must be uploaded.
    pub fn apply(&mut self, action: SimAction) -> bool {
        match action {
            SimAction::TogglePause => {
                self.control.toggle_pause();
                false
            }
            SimAction::SpeedUp => {
                self.control.speed_up();
                false
            }
            SimAction::SlowDown => {
                self.control.slow_down();
                false
            }
            SimAction::Emit(n) => {
                let emitted = self.emit(n);
                log::info!("emitted {emitted} particles ({} alive)", self.mirror.active_count());
                emitted > 0
            }
            SimAction::ToggleAttract => {
                self.attract = !self.attract;
                log::info!("pointer attraction: {}", if self.attract { "on" } else { "off" });
                false
            }
            other => {
                log::debug!("particles: ignoring {other:?}");
                false
            }
        }
    }

    /// Runs automatic emission for a frame of `dt` seconds. Does nothing
    /// while paused. Returns `true` when the mirror must be uploaded.
    pub fn emit_due(&mut self, dt: f32) -> bool {
        if self.control.is_paused() || self.config.auto_rate <= 0.0 {
            return false;
        }

        self.emit_timer += dt;
        if self.emit_timer < 1.0 / self.config.auto_rate {
            return false;
        }
        self.emit_timer = 0.0;

        let emitted = self.emit(self.config.auto_batch);
        log::trace!("auto-emitted {emitted} particles");
        emitted > 0
    }

    /// Ages live particles by `dt` and frees the expired ones, as the kernel
    /// does in the same frame's dispatch. Does nothing while paused.
    pub fn age(&mut self, dt: f32) {
        if self.control.is_paused() {
            return;
        }

        for p in self.mirror.elements_mut() {
            if p.is_inactive() {
                continue;
            }
            p.age += dt;
            if p.age >= p.lifespan {
                *p = Particle::zeroed();
            }
        }
    }

    /// Uniform record for a frame of `dt` seconds.
    pub fn uniforms(&self, pointer: [f32; 2], dt: f32) -> ParticleUniforms {
        ParticleUniforms {
            pointer,
            dt,
            attract: u32::from(self.attract),
        }
    }
}
