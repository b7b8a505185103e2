use std::fmt;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// HexColor – renderer-agnostic colour carried inside chart specs
// ---------------------------------------------------------------------------

/// An opaque sRGB colour, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        HexColor([r, g, b])
    }

    fn from_srgb(rgb: Srgb) -> Self {
        let c: Srgb<u8> = rgb.into_format();
        HexColor([c.red, c.green, c.blue])
    }

    fn to_srgb(self) -> Srgb {
        Srgb::new(self.0[0], self.0[1], self.0[2]).into_format()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<HexColor> for Color32 {
    fn from(c: HexColor) -> Self {
        let [r, g, b] = c.0;
        Color32::from_rgb(r, g, b)
    }
}

// Gauge bands: low / medium / high.
pub const BAND_LOW: HexColor = HexColor::rgb(0xe7, 0x4c, 0x3c);
pub const BAND_MEDIUM: HexColor = HexColor::rgb(0xf3, 0x9c, 0x12);
pub const BAND_HIGH: HexColor = HexColor::rgb(0x2e, 0xcc, 0x71);

// Gauge value bars.
pub const BAR_HAPPINESS: HexColor = HexColor::rgb(0x1a, 0xbc, 0x9c);
pub const BAR_GDP: HexColor = HexColor::rgb(0x34, 0x98, 0xdb);
pub const BAR_SOCIAL_SUPPORT: HexColor = HexColor::rgb(0x9b, 0x59, 0xb6);

// ---------------------------------------------------------------------------
// Sequential colour scales
// ---------------------------------------------------------------------------

/// Fixed sequential scale, sampled at evenly spaced stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScale {
    Plasma,
}

const PLASMA: [HexColor; 6] = [
    HexColor::rgb(0x0d, 0x08, 0x87),
    HexColor::rgb(0x5c, 0x01, 0xa6),
    HexColor::rgb(0x9c, 0x17, 0x9e),
    HexColor::rgb(0xcc, 0x47, 0x78),
    HexColor::rgb(0xed, 0x79, 0x53),
    HexColor::rgb(0xf0, 0xf9, 0x21),
];

impl ColorScale {
    fn stops(self) -> &'static [HexColor] {
        match self {
            ColorScale::Plasma => &PLASMA,
        }
    }

    /// Colour at position `t` in `[0, 1]`; out-of-range positions clamp.
    pub fn sample(self, t: f64) -> HexColor {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 };
        let scaled = t * (stops.len() - 1) as f32;
        let lower = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lower as f32;
        let from: LinSrgb = stops[lower].to_srgb().into_linear();
        let to: LinSrgb = stops[lower + 1].to_srgb().into_linear();
        HexColor::from_srgb(Srgb::from_linear(from.mix(to, frac)))
    }

    /// Colour for `value` in the domain `[lo, hi]`. A flat domain maps to
    /// the middle of the scale.
    pub fn color_for(self, value: f64, lo: f64, hi: f64) -> HexColor {
        let span = hi - lo;
        if span.abs() < f64::EPSILON {
            self.sample(0.5)
        } else {
            self.sample((value - lo) / span)
        }
    }
}

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<HexColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            HexColor::from_srgb(rgb)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(BAND_LOW.to_string(), "#e74c3c");
        assert_eq!(serde_json::to_string(&BAR_GDP).unwrap(), "\"#3498db\"");
    }

    #[test]
    fn scale_endpoints_and_clamping() {
        assert_eq!(ColorScale::Plasma.sample(0.0), PLASMA[0]);
        assert_eq!(ColorScale::Plasma.sample(1.0), PLASMA[5]);
        assert_eq!(ColorScale::Plasma.sample(-3.0), PLASMA[0]);
        assert_eq!(ColorScale::Plasma.sample(7.0), PLASMA[5]);
        assert_eq!(
            ColorScale::Plasma.color_for(4.0, 4.0, 4.0),
            ColorScale::Plasma.sample(0.5)
        );
    }

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(10);
        assert_eq!(colors.len(), 10);
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| a != b));
        }
        assert!(generate_palette(0).is_empty());
    }
}
