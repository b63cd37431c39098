use bytemuck::{Pod, Zeroable};

use crate::paint::Color;
use crate::sim::{LightKind, ShadingMode, SimAction, SimControl};

/// Camera block at binding 0 (matches `Camera` in WGSL, 96 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    /// Camera-to-world transform, column-major.
    pub pose: [f32; 16],
    pub focal: [f32; 2],
    /// Output image size in pixels.
    pub resolution: [f32; 2],
    pub projective: u32,
    pub _pad: [u32; 3],
}

/// Box block at binding 1 (128 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BoxUniform {
    pub center: [f32; 4],
    /// Half-extent scale per axis; the unit box spans `[-0.5, 0.5]`.
    pub scales: [f32; 4],
    /// Front, back, left, right, top, bottom.
    pub faces: [[f32; 4]; 6],
}

/// Light block at binding 3 (80 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub intensity: [f32; 4],
    pub position: [f32; 4],
    pub direction: [f32; 4],
    /// Constant, linear, quadratic falloff, then the spot cone cosine.
    pub attenuation: [f32; 4],
    pub kind: u32,
    pub shading: u32,
    pub _pad: [u32; 2],
}

#[derive(Debug, Clone)]
pub struct RayBoxConfig {
    /// Camera distance from the box center along -z.
    pub camera_distance: f32,
    pub focal: f32,
    pub min_focal: f32,
    /// Focal change per key press.
    pub focal_step: f32,
    pub scale_min: f32,
    pub scale_max: f32,
    /// Scale change per frame.
    pub scale_step: f32,
    pub faces: [Color; 6],
}

impl Default for RayBoxConfig {
    fn default() -> Self {
        Self {
            camera_distance: 3.0,
            focal: 1.0,
            min_focal: 0.1,
            focal_step: 0.1,
            scale_min: 0.5,
            scale_max: 1.5,
            scale_step: 0.005,
            faces: [
                Color::rgb(0.90, 0.25, 0.25),
                Color::rgb(0.25, 0.80, 0.35),
                Color::rgb(0.25, 0.45, 0.95),
                Color::rgb(0.95, 0.85, 0.25),
                Color::rgb(0.85, 0.35, 0.90),
                Color::rgb(0.25, 0.85, 0.90),
            ],
        }
    }
}

/// Pinhole or orthographic camera with a rigid pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub pose: [f32; 16],
    pub focal: f32,
    pub projective: bool,
}

impl Camera {
    /// Looks down +z from `distance` units in front of the origin.
    pub fn looking_at_origin(distance: f32, focal: f32) -> Self {
        #[rustfmt::skip]
        let pose = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, -distance, 1.0,
        ];
        Self { pose, focal, projective: false }
    }

    pub fn position(&self) -> [f32; 3] {
        [self.pose[12], self.pose[13], self.pose[14]]
    }
}

/// Box scale bouncing between two bounds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pulse {
    pub scale: f32,
    direction: f32,
}

impl Pulse {
    pub fn new() -> Self {
        Self { scale: 1.0, direction: 1.0 }
    }

    /// Moves one step and turns around once a bound is crossed.
    pub fn advance(&mut self, step: f32, min: f32, max: f32) {
        self.scale += step * self.direction;
        if self.scale > max || self.scale < min {
            self.direction = -self.direction;
        }
    }
}

impl Default for Pulse {
    fn default() -> Self {
        Self::new()
    }
}

/// Host side of the ray-traced box: camera, light selection and the pulse.
#[derive(Debug)]
pub struct RayBoxHost {
    config: RayBoxConfig,
    control: SimControl,
    camera: Camera,
    light: LightKind,
    shading: ShadingMode,
    pulse: Pulse,
    resolution: (u32, u32),
}

impl RayBoxHost {
    pub fn new(config: RayBoxConfig) -> Self {
        Self {
            camera: Camera::looking_at_origin(config.camera_distance, config.focal),
            control: SimControl::new(),
            light: LightKind::Point,
            shading: ShadingMode::Lambert,
            pulse: Pulse::new(),
            resolution: (1, 1),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &RayBoxConfig {
        &self.config
    }

    #[inline]
    pub fn control(&self) -> &SimControl {
        &self.control
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn light(&self) -> LightKind {
        self.light
    }

    #[inline]
    pub fn shading(&self) -> ShadingMode {
        self.shading
    }

    #[inline]
    pub fn pulse(&self) -> Pulse {
        self.pulse
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = (width.max(1), height.max(1));
    }

    pub fn apply(&mut self, action: SimAction) {
        match action {
            SimAction::TogglePause => {
                self.control.toggle_pause();
            }
            SimAction::SpeedUp => self.control.speed_up(),
            SimAction::SlowDown => self.control.slow_down(),
            SimAction::ToggleProjection => {
                self.camera.projective = !self.camera.projective;
                log::info!(
                    "camera: {}",
                    if self.camera.projective { "projective" } else { "orthographic" }
                );
            }
            SimAction::SelectLight(kind) => {
                self.light = kind;
                log::info!("light: {kind:?}");
            }
            SimAction::SelectShading(mode) => {
                self.shading = mode;
                log::info!("shading: {mode:?}");
            }
            SimAction::ChangeFocal(delta) => {
                self.camera.focal = (self.camera.focal + delta).max(self.config.min_focal);
                log::debug!("focal length {:.2}", self.camera.focal);
            }
            SimAction::ResetCamera => {
                let projective = self.camera.projective;
                self.camera = Camera::looking_at_origin(self.config.camera_distance, self.config.focal);
                self.camera.projective = projective;
            }
            other => log::debug!("ray box: ignoring {other:?}"),
        }
    }

    /// Advances the pulse by one frame. No-op while paused.
    pub fn tick(&mut self) {
        if self.control.is_paused() {
            return;
        }
        let RayBoxConfig { scale_step, scale_min, scale_max, .. } = self.config;
        self.pulse.advance(scale_step, scale_min, scale_max);
    }

    pub fn camera_uniform(&self) -> CameraUniform {
        CameraUniform {
            pose: self.camera.pose,
            focal: [self.camera.focal; 2],
            resolution: [self.resolution.0 as f32, self.resolution.1 as f32],
            projective: u32::from(self.camera.projective),
            _pad: [0; 3],
        }
    }

    pub fn box_uniform(&self) -> BoxUniform {
        let s = self.pulse.scale;
        BoxUniform {
            center: [0.0, 0.0, 0.0, 1.0],
            scales: [s, s, s, 0.0],
            faces: self.config.faces.map(Color::to_array),
        }
    }

    pub fn light_uniform(&self) -> LightUniform {
        let (position, direction, attenuation) = match self.light {
            LightKind::Point => ([2.0, 2.0, -2.0, 1.0], [0.0; 4], [1.0, 0.05, 0.02, 0.0]),
            LightKind::Directional => ([0.0; 4], normalize([-1.0, -1.0, 1.0]), [1.0, 0.0, 0.0, 0.0]),
            LightKind::Spot => (
                [0.0, 2.5, -1.5, 1.0],
                normalize([0.0, -2.5, 1.5]),
                [1.0, 0.02, 0.01, 0.9],
            ),
        };

        LightUniform {
            intensity: [1.0, 1.0, 1.0, 1.0],
            position,
            direction,
            attenuation,
            kind: self.light.code(),
            shading: self.shading.code(),
            _pad: [0; 2],
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 4] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len, 0.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_shader() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 96);
        assert_eq!(std::mem::size_of::<BoxUniform>(), 128);
        assert_eq!(std::mem::size_of::<LightUniform>(), 80);
    }

    #[test]
    fn pulse_stays_near_bounds() {
        let mut p = Pulse::new();
        let (mut lo, mut hi) = (f32::MAX, f32::MIN);
        for _ in 0..2000 {
            p.advance(0.005, 0.5, 1.5);
            lo = lo.min(p.scale);
            hi = hi.max(p.scale);
        }
        assert!(lo >= 0.495 - 1e-3 && lo < 0.5);
        assert!(hi <= 1.505 + 1e-3 && hi > 1.5);
    }

    #[test]
    fn paused_pulse_holds() {
        let mut h = RayBoxHost::new(RayBoxConfig::default());
        h.tick();
        let before = h.pulse().scale;
        h.apply(SimAction::TogglePause);
        h.tick();
        assert_eq!(h.pulse().scale, before);
        assert_eq!(h.box_uniform().scales[0], before);
    }

    #[test]
    fn second_pause_toggle_resumes_pulse() {
        let mut h = RayBoxHost::new(RayBoxConfig::default());
        h.apply(SimAction::TogglePause);
        assert!(h.control().is_paused());
        h.tick();
        assert_eq!(h.pulse().scale, Pulse::new().scale);

        h.apply(SimAction::TogglePause);
        assert!(!h.control().is_paused());
        h.tick();
        assert_ne!(h.pulse().scale, Pulse::new().scale);
    }

    #[test]
    fn focal_is_clamped_and_reset_keeps_projection() {
        let mut h = RayBoxHost::new(RayBoxConfig::default());
        h.apply(SimAction::ChangeFocal(-5.0));
        assert_eq!(h.camera().focal, 0.1);

        h.apply(SimAction::ToggleProjection);
        h.apply(SimAction::ResetCamera);
        assert_eq!(h.camera().focal, 1.0);
        assert!(h.camera().projective);
        assert_eq!(h.camera_uniform().projective, 1);
        assert_eq!(h.camera().position(), [0.0, 0.0, -3.0]);
    }

    #[test]
    fn light_and_shading_codes() {
        let mut h = RayBoxHost::new(RayBoxConfig::default());
        h.apply(SimAction::SelectLight(LightKind::Spot));
        h.apply(SimAction::SelectShading(ShadingMode::Toon));
        let l = h.light_uniform();
        assert_eq!((l.kind, l.shading), (2, 2));
        let d = l.direction;
        assert!((d[0] * d[0] + d[1] * d[1] + d[2] * d[2] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn resolution_never_zero() {
        let mut h = RayBoxHost::new(RayBoxConfig::default());
        h.set_resolution(0, 720);
        assert_eq!(h.camera_uniform().resolution, [1.0, 720.0]);
    }
}
