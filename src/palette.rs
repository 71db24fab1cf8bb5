//! Disc colors
//!
//! Sacred discs drift from gold to cyan as `fade_progress` goes 0 → 1.
//! Channels are 0-255, alpha is 0-1, matching CSS `rgba()`.

use glam::Vec4;

use crate::sim::Disc;

/// An sRGB color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }

    /// Linear blend; `t` is clamped to 0..=1
    pub fn mix(self, other: Self, t: f32) -> Self {
        Self::from_vec4(self.to_vec4().lerp(other.to_vec4(), t.clamp(0.0, 1.0)))
    }

    /// CSS `rgba(r, g, b, a)` string, channels rounded and alpha clamped
    pub fn to_css(self) -> String {
        let channel = |c: f32| c.clamp(0.0, 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

pub mod colors {
    use super::Rgba;

    pub const SACRED_BODY_START: Rgba = Rgba::opaque(255.0, 224.0, 103.0);
    pub const SACRED_BODY_END: Rgba = Rgba::opaque(107.0, 228.0, 255.0);
    pub const SACRED_GLOW_START: Rgba = Rgba::new(255.0, 224.0, 103.0, 0.55);
    pub const SACRED_GLOW_END: Rgba = Rgba::new(111.0, 228.0, 255.0, 0.5);
    pub const COMMON_BODY: Rgba = Rgba::opaque(79.0, 195.0, 255.0);
    pub const COMMON_GLOW: Rgba = Rgba::new(78.0, 184.0, 255.0, 0.35);

    /// Label ink on every disc
    pub const LABEL: &str = "#061222";
    /// HUD and splash text
    pub const HUD_TEXT: &str = "#67f3ff";
    pub const HUD_BAR: &str = "rgba(0, 8, 24, 0.55)";
    pub const STATUS_TEXT: &str = "#ffe067";
    pub const STATUS_BAR: &str = "rgba(4, 12, 30, 0.6)";
    pub const SPLASH_SHADE: &str = "rgba(3, 10, 24, 0.75)";
    /// Full-field tint while the sacred-hit flash is active
    pub const FLASH: &str = "rgba(255, 230, 103, 0.12)";
}

/// Fill color for a disc's body
pub fn body_color(disc: &Disc, fade_progress: f32) -> Rgba {
    if disc.sacred {
        colors::SACRED_BODY_START.mix(colors::SACRED_BODY_END, fade_progress)
    } else {
        colors::COMMON_BODY
    }
}

/// Fill color for the halo drawn behind a disc
pub fn glow_color(disc: &Disc, fade_progress: f32) -> Rgba {
    if disc.sacred {
        colors::SACRED_GLOW_START.mix(colors::SACRED_GLOW_END, fade_progress)
    } else {
        colors::COMMON_GLOW
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn disc(sacred: bool) -> Disc {
        Disc {
            id: 1,
            value: if sacred { 67 } else { 12 },
            sacred,
            pos: Vec2::ZERO,
            radius: 20.0,
            speed: 100.0,
        }
    }

    #[test]
    fn test_mix_endpoints_and_midpoint() {
        let a = Rgba::new(0.0, 100.0, 200.0, 0.0);
        let b = Rgba::new(100.0, 200.0, 0.0, 1.0);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        assert_eq!(a.mix(b, 0.5), Rgba::new(50.0, 150.0, 100.0, 0.5));
        // Out-of-range t is clamped
        assert_eq!(a.mix(b, 3.0), b);
    }

    #[test]
    fn test_css_output() {
        assert_eq!(colors::COMMON_GLOW.to_css(), "rgba(78, 184, 255, 0.35)");
        assert_eq!(Rgba::new(300.0, -4.0, 12.6, 2.0).to_css(), "rgba(255, 0, 13, 1)");
    }

    #[test]
    fn test_sacred_disc_fades() {
        let sacred = disc(true);
        assert_eq!(body_color(&sacred, 0.0), colors::SACRED_BODY_START);
        assert_eq!(body_color(&sacred, 1.0), colors::SACRED_BODY_END);
        let glow = glow_color(&sacred, 1.0);
        assert_eq!((glow.r, glow.g, glow.b), (111.0, 228.0, 255.0));
        assert!((glow.a - colors::SACRED_GLOW_END.a).abs() < 1e-6);
    }

    #[test]
    fn test_common_disc_ignores_fade() {
        let common = disc(false);
        assert_eq!(body_color(&common, 0.0), body_color(&common, 1.0));
        assert_eq!(glow_color(&common, 0.7), colors::COMMON_GLOW);
    }
}
