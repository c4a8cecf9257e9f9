use crate::foundation::error::{ReelError, ReelResult};

/// Straight (non-premultiplied) RGB color used for palette math.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Move each channel toward white by fraction `t` in [0,1].
    pub fn lighten(self, t: f64) -> Self {
        Self {
            r: lerp_channel(self.r, 255, t),
            g: lerp_channel(self.g, 255, t),
            b: lerp_channel(self.b, 255, t),
        }
    }

    /// Move each channel toward black by fraction `t` in [0,1].
    pub fn darken(self, t: f64) -> Self {
        Self {
            r: lerp_channel(self.r, 0, t),
            g: lerp_channel(self.g, 0, t),
            b: lerp_channel(self.b, 0, t),
        }
    }
}

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    let af = f64::from(a);
    let bf = f64::from(b);
    (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
}

/// Parse a `#RGB` or `#RRGGBB` hex color (leading `#` optional, case-insensitive).
pub fn parse_hex(s: &str) -> ReelResult<Rgb8> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> ReelResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| ReelError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    fn hex_nibble(c: &str) -> ReelResult<u8> {
        // "A" -> 0xAA
        let n = hex_byte(c)?;
        Ok(n * 16 + n)
    }

    match s.len() {
        3 => Ok(Rgb8::new(
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
        )),
        6 => Ok(Rgb8::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        _ => Err(ReelError::validation(
            "hex color must be #RGB or #RRGGBB (case-insensitive)",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/palette/color.rs"]
mod tests;
