use crate::foundation::error::ReelResult;
use crate::palette::color::{Rgb8, parse_hex};

/// Palette substituted when fewer than [`MIN_PALETTE_LEN`] input colors validate.
pub const FALLBACK_PALETTE: [&str; 4] = ["#38BDF8", "#FACC15", "#F472B6", "#A855F7"];

/// Minimum number of valid colors required to keep user input.
pub const MIN_PALETTE_LEN: usize = 3;

/// Normalize raw color input into a usable hex palette.
///
/// Each entry must be an optional `#` followed by 3 or 6 hex digits; invalid entries are
/// dropped. Valid entries are uppercased and `#`-prefixed. When fewer than
/// [`MIN_PALETTE_LEN`] entries survive, the surviving subset is discarded wholesale and
/// the fixed fallback palette is returned instead of blending the two.
///
/// Never fails and never returns an empty list; idempotent over its own output.
pub fn normalize(colors: &[String]) -> Vec<String> {
    let valid: Vec<String> = colors
        .iter()
        .filter_map(|c| normalize_entry(c))
        .collect();

    if valid.len() < MIN_PALETTE_LEN {
        return FALLBACK_PALETTE.iter().map(|s| s.to_string()).collect();
    }
    valid
}

fn normalize_entry(raw: &str) -> Option<String> {
    let s = raw.trim();
    let digits = s.strip_prefix('#').unwrap_or(s);
    if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", digits.to_ascii_uppercase()))
}

/// An ordered, validated palette of at least [`MIN_PALETTE_LEN`] hex colors.
///
/// Indexing is cyclic (`colors[n % len]`) so palette length never has to match scene
/// count. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Build a palette from raw user input via [`normalize`].
    pub fn from_input(colors: &[String]) -> Self {
        Self {
            colors: normalize(colors),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        // Normalization guarantees non-emptiness; kept for API completeness.
        self.colors.is_empty()
    }

    /// Normalized hex string at cyclic index `n`.
    pub fn hex(&self, n: usize) -> &str {
        &self.colors[n % self.colors.len()]
    }

    /// Parsed color at cyclic index `n`.
    ///
    /// Entries are pre-validated by [`normalize`], so parsing cannot fail for a palette
    /// built through [`Palette::from_input`].
    pub fn rgb(&self, n: usize) -> ReelResult<Rgb8> {
        parse_hex(self.hex(n))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.colors
    }
}

#[cfg(test)]
#[path = "../../tests/unit/palette/normalize.rs"]
mod tests;
