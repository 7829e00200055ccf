use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A color as written in a template stylesheet.
///
/// Two source syntaxes are supported: classic hex RGB (`#RGB`, `#RRGGBB`,
/// `#RRGGBBAA`) and the perceptual `oklch(L C H [/ A])` function. The raster
/// capture backend only understands device RGB; Oklch values reaching it must
/// first go through the capture normalization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb { r: u8, g: u8, b: u8, a: f32 },
    Oklch { l: f32, c: f32, h: f32, a: f32 },
}

impl Color {
    pub const WHITE: Color = Color::Rgb { r: 255, g: 255, b: 255, a: 1.0 };
    pub const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0, a: 1.0 };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b, a: 1.0 }
    }

    /// Whether this color is already in device RGB.
    pub fn is_rgb(&self) -> bool {
        matches!(self, Color::Rgb { .. })
    }

    pub fn alpha(&self) -> f32 {
        match *self {
            Color::Rgb { a, .. } | Color::Oklch { a, .. } => a,
        }
    }

    /// Resolve to 8-bit sRGB components.
    ///
    /// Oklch goes through OKLab -> linear sRGB -> gamma encoding, with
    /// out-of-gamut channels clamped. The vector renderer uses this; the
    /// raster path deliberately does not (it normalizes instead).
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        match *self {
            Color::Rgb { r, g, b, .. } => (r, g, b),
            Color::Oklch { l, c, h, .. } => oklch_to_srgb8(l, c, h),
        }
    }

    fn parse_hex(s: &str) -> Result<Color, String> {
        let s = s.trim();
        if !s.starts_with('#') {
            return Err(format!("color must start with #, got: {}", s));
        }
        let hex = &s[1..];

        let channel = |range: &str, what: &str| -> Result<u8, String> {
            u8::from_str_radix(range, 16).map_err(|e| format!("invalid {} component: {}", what, e))
        };

        match hex.len() {
            3 => {
                let r = channel(&hex[0..1].repeat(2), "red")?;
                let g = channel(&hex[1..2].repeat(2), "green")?;
                let b = channel(&hex[2..3].repeat(2), "blue")?;
                Ok(Color::Rgb { r, g, b, a: 1.0 })
            }
            6 | 8 => {
                let r = channel(&hex[0..2], "red")?;
                let g = channel(&hex[2..4], "green")?;
                let b = channel(&hex[4..6], "blue")?;
                let a = if hex.len() == 8 {
                    channel(&hex[6..8], "alpha")? as f32 / 255.0
                } else {
                    1.0
                };
                Ok(Color::Rgb { r, g, b, a })
            }
            n => Err(format!("invalid hex color length: expected 3, 6 or 8, got {}", n)),
        }
    }

    fn parse_oklch(s: &str) -> Result<Color, String> {
        let inner = s
            .trim()
            .strip_prefix("oklch(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| format!("malformed oklch() value: {}", s))?;

        let (components, alpha) = match inner.split_once('/') {
            Some((head, tail)) => (head, Some(tail.trim())),
            None => (inner, None),
        };

        let mut parts = components.split_whitespace();
        let mut component = |name: &str| -> Result<f32, String> {
            let raw = parts
                .next()
                .ok_or_else(|| format!("oklch() is missing the {} component", name))?;
            parse_css_number(raw).ok_or_else(|| format!("invalid oklch {} component: {}", name, raw))
        };

        let l = component("lightness")?;
        let c = component("chroma")?;
        let h = component("hue")?;
        let a = match alpha {
            Some(raw) => parse_css_number(raw)
                .ok_or_else(|| format!("invalid oklch alpha component: {}", raw))?,
            None => 1.0,
        };
        Ok(Color::Oklch { l, c, h, a })
    }
}

/// Parse a CSS numeric token, resolving a trailing `%` to its 0..1 fraction.
fn parse_css_number(raw: &str) -> Option<f32> {
    if let Some(percent) = raw.strip_suffix('%') {
        percent.trim().parse::<f32>().ok().map(|v| v / 100.0)
    } else {
        raw.parse::<f32>().ok()
    }
}

fn oklch_to_srgb8(l: f32, c: f32, h: f32) -> (u8, u8, u8) {
    let h_rad = h.to_radians();
    let a = c * h_rad.cos();
    let b = c * h_rad.sin();

    // OKLab -> non-linear LMS
    let l_ = l + 0.396_337_78 * a + 0.215_803_76 * b;
    let m_ = l - 0.105_561_346 * a - 0.063_854_17 * b;
    let s_ = l - 0.089_484_18 * a - 1.291_485_5 * b;

    let l3 = l_ * l_ * l_;
    let m3 = m_ * m_ * m_;
    let s3 = s_ * s_ * s_;

    // linear sRGB
    let r = 4.076_741_7 * l3 - 3.307_711_6 * m3 + 0.230_969_94 * s3;
    let g = -1.268_438 * l3 + 2.609_757_4 * m3 - 0.341_319_38 * s3;
    let b = -0.004_196_086_3 * l3 - 0.703_418_6 * m3 + 1.707_614_7 * s3;

    (gamma_encode(r), gamma_encode(g), gamma_encode(b))
}

fn gamma_encode(linear: f32) -> u8 {
    let clamped = linear.clamp(0.0, 1.0);
    let encoded = if clamped <= 0.003_130_8 {
        12.92 * clamped
    } else {
        1.055 * clamped.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Color::Rgb { r, g, b, a } => {
                if a >= 1.0 {
                    serializer.serialize_str(&format!("#{:02x}{:02x}{:02x}", r, g, b))
                } else {
                    let alpha = (a.clamp(0.0, 1.0) * 255.0).round() as u8;
                    serializer.serialize_str(&format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, alpha))
                }
            }
            Color::Oklch { l, c, h, a } => {
                if a >= 1.0 {
                    serializer.serialize_str(&format!("oklch({} {} {})", l, c, h))
                } else {
                    serializer.serialize_str(&format!("oklch({} {} {} / {})", l, c, h, a))
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let trimmed = s.trim();
        if trimmed.starts_with("oklch(") {
            Color::parse_oklch(trimmed).map_err(de::Error::custom)
        } else {
            Color::parse_hex(trimmed).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(Color::parse_hex("#fff").unwrap(), Color::rgb(255, 255, 255));
        assert_eq!(Color::parse_hex("#8b0000").unwrap(), Color::rgb(139, 0, 0));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Color::parse_hex("8b0000").is_err());
        assert!(Color::parse_hex("#12345").is_err());
    }

    #[test]
    fn parses_oklch_with_and_without_alpha() {
        let opaque = Color::parse_oklch("oklch(0.7 0.15 250)").unwrap();
        assert_eq!(opaque, Color::Oklch { l: 0.7, c: 0.15, h: 250.0, a: 1.0 });

        let translucent = Color::parse_oklch("oklch(70% 0.15 250 / 0.5)").unwrap();
        assert_eq!(translucent, Color::Oklch { l: 0.7, c: 0.15, h: 250.0, a: 0.5 });
    }

    #[test]
    fn oklch_extremes_resolve_to_white_and_black() {
        let (r, g, b) = Color::Oklch { l: 1.0, c: 0.0, h: 0.0, a: 1.0 }.to_rgb8();
        assert!(r >= 254 && g >= 254 && b >= 254, "got ({}, {}, {})", r, g, b);

        let (r, g, b) = Color::Oklch { l: 0.0, c: 0.0, h: 0.0, a: 1.0 }.to_rgb8();
        assert_eq!((r, g, b), (0, 0, 0));
    }

    #[test]
    fn json_round_trip_preserves_rgb() {
        let color = Color::rgb(139, 0, 0);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#8b0000\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }
}
