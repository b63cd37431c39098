use winit::dpi::PhysicalSize;

/// What the frame loop does after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceRecovery {
    /// Surface was reconfigured; the next frame should succeed.
    Reconfigured,
    /// Drop this frame and try again next time.
    Skip,
    /// Out of memory; the window loop stops.
    Fatal,
}

impl SurfaceRecovery {
    pub(crate) fn of(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => SurfaceRecovery::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceRecovery::Skip,
        }
    }

    #[inline]
    pub fn is_fatal(self) -> bool {
        self == SurfaceRecovery::Fatal
    }
}

/// sRGB variants first when asked for, otherwise whatever the surface
/// lists first.
pub(crate) fn pick_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| prefer_srgb && f.is_srgb())
        .or_else(|| formats.first().copied())
}

/// Size to configure the surface with, or `None` while minimized.
pub(crate) fn configurable(size: PhysicalSize<u32>) -> Option<(u32, u32)> {
    (size.width > 0 && size.height > 0).then_some((size.width, size.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    #[test]
    fn srgb_is_picked_only_when_preferred() {
        let formats = [F::Bgra8Unorm, F::Rgba8UnormSrgb];
        assert_eq!(pick_format(&formats, true), Some(F::Rgba8UnormSrgb));
        assert_eq!(pick_format(&formats, false), Some(F::Bgra8Unorm));
        assert_eq!(pick_format(&[F::Rgba16Float], true), Some(F::Rgba16Float));
        assert_eq!(pick_format(&[], true), None);
    }

    #[test]
    fn minimized_surface_is_left_alone() {
        assert_eq!(configurable(PhysicalSize::new(0, 600)), None);
        assert_eq!(configurable(PhysicalSize::new(800, 600)), Some((800, 600)));
    }

    #[test]
    fn recovery_per_error() {
        assert_eq!(SurfaceRecovery::of(&wgpu::SurfaceError::Lost), SurfaceRecovery::Reconfigured);
        assert!(SurfaceRecovery::of(&wgpu::SurfaceError::OutOfMemory).is_fatal());
        assert_eq!(SurfaceRecovery::of(&wgpu::SurfaceError::Timeout), SurfaceRecovery::Skip);
    }
}
