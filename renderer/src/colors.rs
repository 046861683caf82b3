#[derive(Debug, Clone, Copy, PartialEq)]
/// A color with red, green, blue, and alpha components in `[0, 1]`.
pub struct RGBA {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl RGBA {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from the signed `[-1, 1]` rgb space used by many
    /// psychophysics toolkits, where `-1` is black and `0` is mid gray.
    pub fn from_signed(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: (r + 1.0) / 2.0,
            g: (g + 1.0) / 2.0,
            b: (b + 1.0) / 2.0,
            a: 1.0,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Composites `self` over `dst` (source-over, straight alpha).
    pub fn over(self, dst: RGBA) -> RGBA {
        let sa = self.a.clamp(0.0, 1.0);
        let da = dst.a.clamp(0.0, 1.0);
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return RGBA::TRANSPARENT;
        }
        let mix = |s: f32, d: f32| (s * sa + d * da * (1.0 - sa)) / out_a;
        RGBA {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: out_a,
        }
    }

    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const GRAY: Self = Self {
        r: 0.5,
        g: 0.5,
        b: 0.5,
        a: 1.0,
    };
}

impl From<[u8; 4]> for RGBA {
    fn from(px: [u8; 4]) -> Self {
        RGBA {
            r: px[0] as f32 / 255.0,
            g: px[1] as f32 / 255.0,
            b: px[2] as f32 / 255.0,
            a: px[3] as f32 / 255.0,
        }
    }
}
