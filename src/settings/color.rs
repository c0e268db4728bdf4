//! RGBA colour values used by the decoration buttons and shadow

use anyhow::{bail, Context};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::rgb(0, 0, 0)
    }
}

/// Persisted as `r,g,b`, or `r,g,b,a` when not fully opaque
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "{},{},{}", self.r, self.g, self.b)
        } else {
            write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parse a colour string
/// Supports:
/// - Component lists: "255,92,87" or "255,92,87,128"
/// - Hex colors: "#ff5c57" or "#ff5c5780"
impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
                bail!("Invalid hex color: {}", s);
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .with_context(|| format!("Invalid hex color: {}", s))
            };
            let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
            return Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha));
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            bail!("Invalid color: {}", s);
        }
        let mut channels = [255u8; 4];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u8>()
                .with_context(|| format!("Invalid color component '{}' in {}", part, s))?;
        }
        Ok(Color::rgba(channels[0], channels[1], channels[2], channels[3]))
    }
}
