/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are multiplied by `a` (premultiplied alpha).
///
/// User code normally builds colors from straight 8-bit channels through
/// [`Color::rgb`] / [`Color::rgba`] or uses the named constants.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const RED: Color = Color::from_premul(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::from_premul(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::from_premul(0.0, 0.0, 1.0, 1.0);
    pub const YELLOW: Color = Color::from_premul(1.0, 1.0, 0.0, 1.0);
    pub const PURPLE: Color = Color::from_premul(1.0, 0.0, 1.0, 1.0);
    pub const CYAN: Color = Color::from_premul(0.0, 1.0, 1.0, 1.0);

    /// Opaque color from 8-bit channels.
    #[inline]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Color from straight-alpha 8-bit channels.
    #[inline]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Creates a color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components in `[0, 1]`.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Fully transparent colors draw nothing; renderers skip them.
    #[inline]
    pub fn is_visible(self) -> bool {
        self.a > 0.0
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_premultiplies() {
        let c = Color::rgba(255, 0, 0, 51);
        assert!((c.a - 0.2).abs() < 1e-6);
        assert!((c.r - 0.2).abs() < 1e-6);
    }

    #[test]
    fn rgb_matches_named_constant() {
        assert_eq!(Color::rgb(255, 255, 0), Color::YELLOW);
    }

    #[test]
    fn straight_round_trips_for_translucent() {
        let (r, g, b, a) = Color::from_straight(0.5, 0.25, 1.0, 0.5).to_straight();
        assert!((r - 0.5).abs() < 1e-6 && (g - 0.25).abs() < 1e-6 && (b - 1.0).abs() < 1e-6);
        assert!((a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn transparent_is_not_visible() {
        assert!(!Color::TRANSPARENT.is_visible());
        assert!(Color::BLACK.is_visible());
    }
}
