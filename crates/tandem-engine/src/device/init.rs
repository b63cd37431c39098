use anyhow::{ensure, Result};

/// How the GPU layer picks its adapter and configures the window surface.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,

    /// Present with vsync (FIFO). Without it the surface uses
    /// `AutoNoVsync` and only the host pacer limits the frame rate.
    pub vsync: bool,

    /// Pick an sRGB surface format when one is offered.
    pub prefer_srgb: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            vsync: true,
            prefer_srgb: true,
        }
    }
}

impl GpuInit {
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

// Smallest per-stage resources any demo binds: two storage buffers and one
// storage texture in a compute stage, 16x16 invocations per workgroup.
pub(crate) const MIN_STORAGE_BUFFERS: u32 = 2;
pub(crate) const MIN_STORAGE_TEXTURES: u32 = 1;
pub(crate) const MIN_INVOCATIONS: u32 = 256;

/// Rejects adapters that cannot run the demos' compute passes or draw
/// straight from storage buffers.
pub(crate) fn check_adapter(flags: wgpu::DownlevelFlags, limits: &wgpu::Limits) -> Result<()> {
    ensure!(
        flags.contains(wgpu::DownlevelFlags::COMPUTE_SHADERS),
        "adapter has no compute shader support"
    );
    ensure!(
        flags.contains(wgpu::DownlevelFlags::VERTEX_STORAGE),
        "adapter cannot read storage buffers in vertex shaders"
    );
    ensure!(
        limits.max_storage_buffers_per_shader_stage >= MIN_STORAGE_BUFFERS,
        "adapter allows {} storage buffers per stage, need {MIN_STORAGE_BUFFERS}",
        limits.max_storage_buffers_per_shader_stage
    );
    ensure!(
        limits.max_storage_textures_per_shader_stage >= MIN_STORAGE_TEXTURES,
        "adapter has no storage texture support"
    );
    ensure!(
        limits.max_compute_invocations_per_workgroup >= MIN_INVOCATIONS,
        "adapter allows {} invocations per workgroup, need {MIN_INVOCATIONS}",
        limits.max_compute_invocations_per_workgroup
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_selects_fifo() {
        let mut init = GpuInit::default();
        assert_eq!(init.present_mode(), wgpu::PresentMode::Fifo);
        init.vsync = false;
        assert_eq!(init.present_mode(), wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn downlevel_defaults_are_enough() {
        let flags = wgpu::DownlevelFlags::COMPUTE_SHADERS | wgpu::DownlevelFlags::VERTEX_STORAGE;
        assert!(check_adapter(flags, &wgpu::Limits::downlevel_defaults()).is_ok());
    }

    #[test]
    fn webgl_class_adapters_are_rejected() {
        let limits = wgpu::Limits::downlevel_webgl2_defaults();
        assert!(check_adapter(wgpu::DownlevelFlags::empty(), &limits).is_err());
        assert!(check_adapter(wgpu::DownlevelFlags::compliant(), &limits).is_err());
    }
}
