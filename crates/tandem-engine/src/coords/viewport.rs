/// Window size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Maps a logical-pixel position (top-left origin, +Y down) into
    /// `[-1, 1]` with +Y up. `None` while the viewport is degenerate.
    pub fn to_ndc(self, x: f32, y: f32) -> Option<[f32; 2]> {
        if !self.is_valid() {
            return None;
        }
        Some([x / self.width * 2.0 - 1.0, 1.0 - y / self.height * 2.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners_and_center() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_ndc(0.0, 0.0), Some([-1.0, 1.0]));
        assert_eq!(vp.to_ndc(800.0, 600.0), Some([1.0, -1.0]));
        assert_eq!(vp.to_ndc(400.0, 300.0), Some([0.0, 0.0]));
    }

    #[test]
    fn degenerate_viewport_has_no_ndc() {
        assert_eq!(Viewport::new(0.0, 10.0).to_ndc(1.0, 1.0), None);
        assert_eq!(Viewport::new(f32::NAN, 10.0).to_ndc(1.0, 1.0), None);
    }
}
