// SPDX-License-Identifier: PMPL-1.0-or-later
//! Dichromatic color-vision simulation.
//!
//! Each deficiency type applies a fixed 3x3 linear transform to the RGB
//! triple, approximating how a dichromatic viewer perceives the color.
//! Coefficient rows sum to 1.0, so achromatic colors (black, white, every
//! gray) are fixed points of every transform.

use crate::color::Color;
use crate::error::DaltonError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Protanopia (red-blind) transform
/// Source: Vienot, Brettel & Mollon (1999) dichromacy approximation
const PROTANOPIA: [[f64; 3]; 3] = [
    [0.567, 0.433, 0.0],
    [0.558, 0.442, 0.0],
    [0.0, 0.242, 0.758],
];

/// Deuteranopia (green-blind) transform
const DEUTERANOPIA: [[f64; 3]; 3] = [
    [0.625, 0.375, 0.0],
    [0.70, 0.30, 0.0],
    [0.0, 0.30, 0.70],
];

/// Tritanopia (blue-blind) transform
const TRITANOPIA: [[f64; 3]; 3] = [
    [0.95, 0.05, 0.0],
    [0.0, 0.433, 0.567],
    [0.0, 0.475, 0.525],
];

/// The decimal coefficients do not sum to exactly 1.0 in f64
/// (0.567 + 0.433 < 1.0), so a sub-integer nudge is added before
/// truncation to keep achromatic inputs fixed.
const TRUNCATION_NUDGE: f64 = 1e-6;

/// A form of dichromatic color blindness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeficiencyType {
    /// Red-blind
    Protanopia,
    /// Green-blind
    Deuteranopia,
    /// Blue-blind
    Tritanopia,
}

impl DeficiencyType {
    /// All supported deficiency types, in audit order.
    pub const ALL: [DeficiencyType; 3] = [
        DeficiencyType::Protanopia,
        DeficiencyType::Deuteranopia,
        DeficiencyType::Tritanopia,
    ];

    /// Internal simulation-algorithm identifier.
    pub fn algorithm_id(&self) -> &'static str {
        match self {
            DeficiencyType::Protanopia => "protan",
            DeficiencyType::Deuteranopia => "deutan",
            DeficiencyType::Tritanopia => "tritan",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            DeficiencyType::Protanopia => "Protanopia",
            DeficiencyType::Deuteranopia => "Deuteranopia",
            DeficiencyType::Tritanopia => "Tritanopia",
        }
    }

    fn matrix(&self) -> &'static [[f64; 3]; 3] {
        match self {
            DeficiencyType::Protanopia => &PROTANOPIA,
            DeficiencyType::Deuteranopia => &DEUTERANOPIA,
            DeficiencyType::Tritanopia => &TRITANOPIA,
        }
    }
}

impl std::fmt::Display for DeficiencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for DeficiencyType {
    type Err = DaltonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protanopia" | "protan" => Ok(DeficiencyType::Protanopia),
            "deuteranopia" | "deutan" => Ok(DeficiencyType::Deuteranopia),
            "tritanopia" | "tritan" => Ok(DeficiencyType::Tritanopia),
            other => Err(DaltonError::UnsupportedDeficiency(other.to_string())),
        }
    }
}

/// A vision profile under audit: normal vision or one deficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vision {
    /// No simulation applied
    Normal,
    /// Simulated dichromacy
    Deficient(DeficiencyType),
}

impl Vision {
    /// All audited profiles: normal vision plus the three deficiencies.
    pub const ALL: [Vision; 4] = [
        Vision::Normal,
        Vision::Deficient(DeficiencyType::Protanopia),
        Vision::Deficient(DeficiencyType::Deuteranopia),
        Vision::Deficient(DeficiencyType::Tritanopia),
    ];

    /// Combination-key component for this profile.
    pub fn key_component(&self) -> &'static str {
        match self {
            Vision::Normal => "normal",
            Vision::Deficient(d) => d.algorithm_id(),
        }
    }
}

impl std::fmt::Display for Vision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vision::Normal => write!(f, "Normal vision"),
            Vision::Deficient(d) => write!(f, "{}", d),
        }
    }
}

/// Simulate how a color appears under a deficiency.
///
/// Pure: a new color is returned, alpha unchanged. Transform outputs are
/// clamped to 0-255 and floor-truncated to whole channel values.
pub fn simulate(color: Color, deficiency: DeficiencyType) -> Color {
    let m = deficiency.matrix();
    let input = [color.r as f64, color.g as f64, color.b as f64];
    let mut out = [0u8; 3];
    for (i, row) in m.iter().enumerate() {
        let v = row[0] * input[0] + row[1] * input[1] + row[2] * input[2];
        out[i] = (v.clamp(0.0, 255.0) + TRUNCATION_NUDGE).floor() as u8;
    }
    Color { r: out[0], g: out[1], b: out[2], a: color.a }
}

/// Simulate under a vision profile; normal vision is the identity.
pub fn perceive(color: Color, vision: Vision) -> Color {
    match vision {
        Vision::Normal => color,
        Vision::Deficient(d) => simulate(color, d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_achromatic_fixed_points() {
        for d in DeficiencyType::ALL {
            for value in [0u8, 119, 128, 255] {
                let input = Color::with_alpha(value, value, value, 0.5).unwrap();
                let output = simulate(input, d);
                assert_eq!(output, input, "{} on gray {}", d, value);
            }
        }
    }

    #[test]
    fn test_alpha_preserved() {
        let input = Color::with_alpha(255, 0, 0, 0.25).unwrap();
        for d in DeficiencyType::ALL {
            assert_eq!(simulate(input, d).a, 0.25);
        }
    }

    #[test]
    fn test_deterministic() {
        let input = Color::new(37, 201, 99);
        for d in DeficiencyType::ALL {
            assert_eq!(simulate(input, d), simulate(input, d));
        }
    }

    #[test]
    fn test_pure_red_simulations() {
        let red = Color::new(255, 0, 0);
        assert_eq!(simulate(red, DeficiencyType::Protanopia), Color::new(144, 142, 0));
        assert_eq!(simulate(red, DeficiencyType::Deuteranopia), Color::new(159, 178, 0));
        assert_eq!(simulate(red, DeficiencyType::Tritanopia), Color::new(242, 0, 0));
    }

    #[test]
    fn test_perceive_normal_is_identity() {
        let color = Color::new(12, 34, 56);
        assert_eq!(perceive(color, Vision::Normal), color);
        assert_ne!(
            perceive(Color::new(255, 0, 0), Vision::Deficient(DeficiencyType::Protanopia)),
            Color::new(255, 0, 0)
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("protanopia".parse::<DeficiencyType>().unwrap(), DeficiencyType::Protanopia);
        assert_eq!("Deutan".parse::<DeficiencyType>().unwrap(), DeficiencyType::Deuteranopia);
        assert!(matches!(
            "achromatopsia".parse::<DeficiencyType>(),
            Err(DaltonError::UnsupportedDeficiency(_))
        ));
    }

    #[test]
    fn test_algorithm_ids() {
        assert_eq!(DeficiencyType::Protanopia.algorithm_id(), "protan");
        assert_eq!(DeficiencyType::Tritanopia.display_name(), "Tritanopia");
    }
}
