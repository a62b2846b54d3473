use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `rgb(r, g, b)` / `rgba(r, g, b, a)` with integer channels; alpha is accepted and dropped.
static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[0-9]*\.?[0-9]+%?\s*)?\)$",
    )
    .unwrap()
});

/// Opaque sRGB color, always rendered as upper-case `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    pub const WHITE: HexColor = HexColor::rgb(255, 255, 255);
    pub const BLACK: HexColor = HexColor::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB`, `#RRGGBB`, `#RRGGBBAA` (alpha dropped) or `rgb()/rgba()`.
    ///
    /// The `#` may be omitted only for the 6- and 8-digit forms, so words like `bad` or `add`
    /// stay unparsed.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(caps) = RGB_RE.captures(s) {
            let ch = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
            return Some(Self::rgb(ch(1)?, ch(2)?, ch(3)?));
        }

        let (digits, hashed) = match s.strip_prefix('#') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            3 if hashed => {
                let nib = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            6 | 8 => {
                let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }

    /// Like [`HexColor::parse`], substituting white for anything unparseable.
    pub fn parse_or_white(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::WHITE)
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(deserializer)?;
        Ok(v.as_str().map(Self::parse_or_white).unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/hex.rs"]
mod tests;
