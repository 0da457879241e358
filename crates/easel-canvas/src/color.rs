//! Solid-fill color as the host canvas consumes it: float channels in [0,1].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Uniform gray, e.g. `Color::gray(0.4)` for secondary labels.
    pub const fn gray(value: f32) -> Self {
        Self::new(value, value, value)
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Uppercase six-digit hex code without a leading `#`.
    pub fn to_hex(&self) -> String {
        let channel = |value: f32| (value * 255.0).round().clamp(0.0, 255.0) as u8;
        format!(
            "{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(Color::from_rgb8(255, 0, 0).to_hex(), "FF0000");
        assert_eq!(Color::WHITE.to_hex(), "FFFFFF");
        assert_eq!(Color::BLACK.to_hex(), "000000");
    }
}
