use bytemuck::{Pod, Zeroable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sim::{Element, HostMirror, SimAction, SimControl};

/// One grid cell (matches `Cell` in WGSL).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Cell {
    pub alive: u32,
}

impl Cell {
    pub const ALIVE: Self = Self { alive: 1 };
    pub const DEAD: Self = Self { alive: 0 };
}

impl Element for Cell {
    fn is_inactive(&self) -> bool {
        self.alive == 0
    }
}

/// Static grid parameters shared by the kernel and the cell shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct GridUniforms {
    pub size: [u32; 2],
    pub _pad: [u32; 2],
}

#[derive(Debug, Clone)]
pub struct AutomatonConfig {
    pub width: u32,
    pub height: u32,
    /// Fraction of cells alive after (re)seeding.
    pub seed_density: f64,
    pub seed: Option<u64>,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            seed_density: 0.25,
            seed: None,
        }
    }
}

/// Maps an NDC position to `(column, row)`; row 0 is the top of the grid.
pub fn cell_at(ndc: [f32; 2], width: u32, height: u32) -> Option<(u32, u32)> {
    let u = (ndc[0] + 1.0) * 0.5;
    let v = (1.0 - ndc[1]) * 0.5;
    if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
        return None;
    }
    let col = ((u * width as f32) as u32).min(width.saturating_sub(1));
    let row = ((v * height as f32) as u32).min(height.saturating_sub(1));
    Some((col, row))
}

/// One generation of B3/S23 on a torus, written into `out`.
pub fn life_step(cells: &[Cell], width: u32, height: u32, out: &mut [Cell]) {
    debug_assert_eq!(cells.len(), (width * height) as usize);
    debug_assert_eq!(cells.len(), out.len());

    let (w, h) = (width as i64, height as i64);
    for y in 0..h {
        for x in 0..w {
            let mut neighbours = 0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = (x + dx).rem_euclid(w);
                    let ny = (y + dy).rem_euclid(h);
                    neighbours += cells[(ny * w + nx) as usize].alive;
                }
            }

            let i = (y * w + x) as usize;
            let alive = matches!((cells[i].alive, neighbours), (1, 2) | (1, 3) | (0, 3));
            out[i] = if alive { Cell::ALIVE } else { Cell::DEAD };
        }
    }
}

/// Host side of the automaton.
///
/// The mirror replays every generation the kernel computes, so it always
/// equals the device's current handle and a click can re-upload it whole.
#[derive(Debug)]
pub struct AutomatonHost {
    config: AutomatonConfig,
    mirror: HostMirror<Cell>,
    scratch: Vec<Cell>,
    control: SimControl,
    rng: StdRng,
}

impl AutomatonHost {
    pub fn new(config: AutomatonConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let count = config.width * config.height;

        let mut host = Self {
            mirror: HostMirror::new(count),
            scratch: vec![Cell::DEAD; count as usize],
            control: SimControl::new(),
            rng,
            config,
        };
        host.reseed();
        host
    }

    #[inline]
    pub fn config(&self) -> &AutomatonConfig {
        &self.config
    }

    #[inline]
    pub fn mirror(&self) -> &HostMirror<Cell> {
        &self.mirror
    }

    #[inline]
    pub fn control(&self) -> &SimControl {
        &self.control
    }

    pub fn cell_count(&self) -> u32 {
        self.config.width * self.config.height
    }

    /// Randomly refills the whole grid at the configured density.
    pub fn reseed(&mut self) {
        let density = self.config.seed_density.clamp(0.0, 1.0);
        self.mirror.clear();
        for cell in self.mirror.elements_mut() {
            if self.rng.gen_bool(density) {
                *cell = Cell::ALIVE;
            }
        }
        log::info!("grid seeded: {} of {} cells alive", self.mirror.active_count(), self.mirror.len());
    }

    /// Turns the cell under `ndc` alive. Ignored while paused or off-grid.
    pub fn click(&mut self, ndc: [f32; 2]) -> bool {
        if self.control.is_paused() {
            return false;
        }
        let AutomatonConfig { width, height, .. } = self.config;
        let Some((col, row)) = cell_at(ndc, width, height) else {
            return false;
        };

        let activated = self.mirror.activate_at((row * width + col) as usize, |c| *c = Cell::ALIVE);
        if activated {
            log::info!("cell ({col}, {row}) turned alive");
        }
        activated
    }

    /// Applies one user action. Returns `true` when the mirror must be uploaded.
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
            SimAction::Click(ndc) => self.click(ndc),
            SimAction::Reseed => {
                self.reseed();
                true
            }
            other => {
                log::debug!("automaton: ignoring {other:?}");
                false
            }
        }
    }

    /// Replays the generation the next dispatch computes. No-op while paused.
    pub fn step(&mut self) {
        if self.control.is_paused() {
            return;
        }
        let AutomatonConfig { width, height, .. } = self.config;
        life_step(self.mirror.elements(), width, height, &mut self.scratch);
        self.mirror.elements_mut().copy_from_slice(&self.scratch);
    }

    pub fn uniforms(&self) -> GridUniforms {
        GridUniforms {
            size: [self.config.width, self.config.height],
            _pad: [0; 2],
        }
    }
}
