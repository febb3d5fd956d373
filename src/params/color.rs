//! RGB colors for the water shading stage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WaterError;

/// Linear-blend RGB color with components in [0, 1]
///
/// Serialised as a `#rrggbb` hex string, the format the color pickers and
/// preset files use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Result<Self, WaterError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(WaterError::InvalidColor(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| WaterError::InvalidColor(hex.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Format as `#rrggbb`, rounding and clamping each channel
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array([r, g, b]: [f32; 3]) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation `self → other` by `t` (unclamped)
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }
}

impl FromStr for Rgb {
    type Err = WaterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = WaterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
