/// Drawing surface size in logical pixels.
///
/// Renderers upload this to convert logical positions to NDC.
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

    /// Converts a physical pixel size using the window scale factor.
    #[inline]
    pub fn from_physical(width: u32, height: u32, scale_factor: f32) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(width as f32 / scale, height as f32 / scale)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}
