//! Bar colours
//!
//! Spectrum bars stay in a warm hue band; louder bins get more saturated and
//! brighter.

/// HSL colour with alpha. Hue in degrees, saturation/lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

impl Hsla {
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Convert to 8-bit sRGB (alpha ignored)
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let h = self.hue.rem_euclid(360.0) / 360.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return (v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let channel = |t: f32| -> u8 {
            let t = t.rem_euclid(1.0);
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };

        (channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
    }

    /// Blend towards a background colour by alpha
    pub fn over(&self, background: (u8, u8, u8)) -> (u8, u8, u8) {
        let (r, g, b) = self.to_rgb();
        let mix = |fg: u8, bg: u8| -> u8 {
            (fg as f32 * self.alpha + bg as f32 * (1.0 - self.alpha)).round() as u8
        };
        (mix(r, background.0), mix(g, background.1), mix(b, background.2))
    }
}

impl std::fmt::Display for Hsla {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hsla({:.0}, {:.0}%, {:.0}%, {:.2})",
            self.hue, self.saturation, self.lightness, self.alpha
        )
    }
}

/// Colour of spectrum bar `index` out of `bin_count` at `magnitude`
pub fn bar_color(index: usize, bin_count: usize, magnitude: u8) -> Hsla {
    let position = if bin_count > 0 {
        index as f32 / bin_count as f32
    } else {
        0.0
    };
    let energy = magnitude as f32 / 255.0;
    Hsla::new(47.0 + position * 30.0, 25.0 + energy * 20.0, 45.0 + energy * 15.0)
}
