use std::fmt;

/// Hue step between consecutive zones, in degrees.
const GOLDEN_ANGLE: f64 = 137.50776405;

/// CSS `hsl()` fill: hue in degrees, saturation and lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ZoneColor {
    hue: f64,
    saturation: u8,
    lightness: u8,
}

impl fmt::Display for ZoneColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({:.1},{}%,{}%)", self.hue.rem_euclid(360.0), self.saturation, self.lightness)
    }
}

/// Well-separated fills for consecutive zone indices. Lightness alternates
/// so that zones whose hues wrap close together still differ.
pub(crate) fn golden_angle_color(index: usize) -> ZoneColor {
    ZoneColor {
        hue: index as f64 * GOLDEN_ANGLE,
        saturation: 70,
        lightness: if index % 2 == 0 { 55 } else { 65 },
    }
}
