// SPDX-License-Identifier: PMPL-1.0-or-later
//! RGBA color value type and CSS color parsing.
//!
//! Colors are immutable values: simulation and compositing always produce
//! new instances. Raw inputs are validated, never clamped - clamping is
//! reserved for simulation outputs.

use crate::error::{DaltonError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// An RGBA color with integer 0-255 channels and a 0.0-1.0 alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    /// Create an opaque color.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color with an explicit alpha.
    ///
    /// Fails unless alpha is finite and within 0.0-1.0.
    pub fn with_alpha(r: u8, g: u8, b: u8, a: f64) -> Result<Self> {
        if !a.is_finite() || !(0.0..=1.0).contains(&a) {
            return Err(DaltonError::InvalidColor(format!(
                "alpha {} out of range 0.0-1.0",
                a
            )));
        }
        Ok(Self { r, g, b, a })
    }

    /// Create a color from floating-point channel values.
    ///
    /// Channels must be finite integral values within 0-255; anything else
    /// is a contract violation and fails rather than being clamped.
    pub fn from_f64(r: f64, g: f64, b: f64, a: f64) -> Result<Self> {
        let channel = |v: f64, name: &str| -> Result<u8> {
            if !v.is_finite() || v.fract() != 0.0 || !(0.0..=255.0).contains(&v) {
                return Err(DaltonError::InvalidColor(format!(
                    "{} channel {} is not an integer in 0-255",
                    name, v
                )));
            }
            Ok(v as u8)
        };
        Self::with_alpha(channel(r, "red")?, channel(g, "green")?, channel(b, "blue")?, a)
    }

    /// Fully transparent black, the normalized form of CSS `transparent`.
    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0.0 }
    }

    /// Whether the color is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Source-over composite this color against an opaque backdrop.
    ///
    /// Callers flatten translucent colors with this before computing
    /// contrast ratios; the calculator itself treats inputs as opaque.
    pub fn composite_over(&self, backdrop: Color) -> Color {
        if self.is_opaque() {
            return *self;
        }
        let blend = |fg: u8, bd: u8| -> u8 {
            (fg as f64 * self.a + bd as f64 * (1.0 - self.a)).round() as u8
        };
        Color {
            r: blend(self.r, backdrop.r),
            g: blend(self.g, backdrop.g),
            b: blend(self.b, backdrop.b),
            a: 1.0,
        }
    }

    /// Canonical CSS string form, used as a combination-key component.
    pub fn css_string(&self) -> String {
        if self.is_opaque() {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.css_string())
    }
}

/// Normalization hook applied before ordinary parsing.
///
/// The traversal collaborator injects this to special-case values such as
/// `transparent` instead of patching a shared parser.
pub type NormalizeFn = fn(&str) -> Option<Color>;

/// CSS color parser for hex, rgb()/rgba(), and named colors.
pub struct ColorParser {
    rgb_re: Regex,
    normalize: Option<NormalizeFn>,
}

impl Default for ColorParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorParser {
    pub fn new() -> Self {
        let rgb_re = Regex::new(
            r"rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)(?:\s*,\s*([0-9]*\.?[0-9]+))?\s*\)",
        )
        .expect("valid regex");
        Self { rgb_re, normalize: None }
    }

    /// Install a normalization hook that runs before ordinary parsing.
    pub fn with_normalizer(mut self, normalize: NormalizeFn) -> Self {
        self.normalize = Some(normalize);
        self
    }

    /// Parse any supported CSS color value.
    pub fn parse(&self, value: &str) -> Result<Color> {
        let trimmed = value.trim().to_lowercase();
        if let Some(normalize) = self.normalize {
            if let Some(color) = normalize(&trimmed) {
                return Ok(color);
            }
        }
        if trimmed.starts_with('#') {
            parse_hex_color(&trimmed)
        } else if trimmed.starts_with("rgb") {
            self.parse_rgb_color(&trimmed)
        } else {
            parse_named_color(&trimmed)
                .ok_or_else(|| DaltonError::ColorParse(value.to_string()))
        }
    }

    fn parse_rgb_color(&self, value: &str) -> Result<Color> {
        let caps = self
            .rgb_re
            .captures(value)
            .ok_or_else(|| DaltonError::ColorParse(value.to_string()))?;
        let channel = |idx: usize| -> Result<u8> {
            let raw: u32 = caps[idx]
                .parse()
                .map_err(|_| DaltonError::ColorParse(value.to_string()))?;
            if raw > 255 {
                return Err(DaltonError::InvalidColor(format!(
                    "channel {} out of range in {:?}",
                    raw, value
                )));
            }
            Ok(raw as u8)
        };
        let (r, g, b) = (channel(1)?, channel(2)?, channel(3)?);
        match caps.get(4) {
            Some(a) => {
                let a: f64 = a
                    .as_str()
                    .parse()
                    .map_err(|_| DaltonError::ColorParse(value.to_string()))?;
                Color::with_alpha(r, g, b, a)
            }
            None => Ok(Color::new(r, g, b)),
        }
    }
}

/// Parse a CSS hex color (#rgb, #rrggbb).
pub fn parse_hex_color(hex: &str) -> Result<Color> {
    let digits = hex.trim_start_matches('#');
    let parse =
        |s: String| u8::from_str_radix(&s, 16).map_err(|_| DaltonError::ColorParse(hex.to_string()));
    match digits.len() {
        3 => {
            let r = parse(digits[0..1].repeat(2))?;
            let g = parse(digits[1..2].repeat(2))?;
            let b = parse(digits[2..3].repeat(2))?;
            Ok(Color::new(r, g, b))
        }
        6 => {
            let r = parse(digits[0..2].to_string())?;
            let g = parse(digits[2..4].to_string())?;
            let b = parse(digits[4..6].to_string())?;
            Ok(Color::new(r, g, b))
        }
        _ => Err(DaltonError::ColorParse(hex.to_string())),
    }
}

/// Parse a named CSS color.
pub fn parse_named_color(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "lime" => (0, 255, 0),
        "aqua" | "cyan" => (0, 255, 255),
        "teal" => (0, 128, 128),
        "navy" => (0, 0, 128),
        "fuchsia" | "magenta" => (255, 0, 255),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        _ => return None,
    };
    Some(Color::new(r, g, b))
}
