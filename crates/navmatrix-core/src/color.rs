use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses any CSS color accepted by `svgtypes` (`#rgb`, `#rrggbb`, `rgb(...)`, named colors).
    /// Alpha is dropped.
    pub fn parse(text: &str) -> Option<Self> {
        let c = svgtypes::Color::from_str(text.trim()).ok()?;
        Some(Self::new(c.red, c.green, c.blue))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channel-wise linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        fn ch(a: u8, b: u8, t: f64) -> u8 {
            let v = (a as f64) + ((b as f64) - (a as f64)) * t;
            v.round().clamp(0.0, 255.0) as u8
        }
        Rgb::new(ch(self.r, other.r, t), ch(self.g, other.g, t), ch(self.b, other.b, t))
    }

    /// Perceived brightness in `[0, 255]` (ITU-R BT.601 weights).
    pub fn brightness(self) -> f64 {
        (self.r as f64 * 299.0 + self.g as f64 * 587.0 + self.b as f64 * 114.0) / 1000.0
    }

    pub fn is_dark(self) -> bool {
        self.brightness() < 128.0
    }

    /// Black or white, whichever reads better on top of `self`.
    pub fn contrasting_text(self) -> Rgb {
        if self.is_dark() { Rgb::WHITE } else { Rgb::BLACK }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Rgb::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid color: {raw}")))
    }
}
