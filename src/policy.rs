// SPDX-License-Identifier: PMPL-1.0-or-later
//! Required-ratio policy for text styles.
//!
//! WCAG 1.4.3 (Level AA): large text needs a 3.0:1 ratio, everything else
//! 4.5:1. Large text is bold text at or above 14pt, or regular text at or
//! above 18pt (18.66px / 24px in CSS pixels).

use serde::{Deserialize, Serialize};

/// CSS font weight at which text counts as bold.
pub const BOLD_WEIGHT: u16 = 700;

/// The minimal style facts the policy needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Computed font size in CSS pixels, if known.
    pub font_size_px: Option<f64>,
    /// Numeric font weight (400 regular, 700 bold), if known.
    pub font_weight: Option<u16>,
}

impl TextStyle {
    /// Style with a known size and regular weight.
    pub fn regular(font_size_px: f64) -> Self {
        Self { font_size_px: Some(font_size_px), font_weight: Some(400) }
    }

    /// Style with a known size and bold weight.
    pub fn bold(font_size_px: f64) -> Self {
        Self { font_size_px: Some(font_size_px), font_weight: Some(BOLD_WEIGHT) }
    }

    fn is_bold(&self) -> bool {
        self.font_weight.is_some_and(|w| w >= BOLD_WEIGHT)
    }
}

/// The two required contrast ratios.
///
/// The label is what samples serialize and keys embed; comparisons always
/// use the numeric value, never the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredRatio {
    /// 3.0:1, large text only
    LargeText,
    /// 4.5:1, everything else
    BodyText,
}

impl RequiredRatio {
    /// Numeric threshold value.
    pub fn value(&self) -> f64 {
        match self {
            RequiredRatio::LargeText => 3.0,
            RequiredRatio::BodyText => 4.5,
        }
    }

    /// Fixed string label ("3.0" or "4.5").
    pub fn label(&self) -> &'static str {
        match self {
            RequiredRatio::LargeText => "3.0",
            RequiredRatio::BodyText => "4.5",
        }
    }
}

impl std::fmt::Display for RequiredRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Size thresholds classifying "large text".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    /// Minimum size in CSS pixels for bold text to count as large.
    pub bold_px: f64,
    /// Minimum size in CSS pixels for regular text to count as large.
    pub regular_px: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        // 14pt bold / 18pt regular at 96dpi
        Self { bold_px: 18.66, regular_px: 24.0 }
    }
}

impl ThresholdPolicy {
    /// Required ratio for a text style.
    ///
    /// Never fails: missing or ambiguous style data falls back to the
    /// stricter body-text requirement.
    pub fn required_ratio(&self, style: &TextStyle) -> RequiredRatio {
        let Some(size) = style.font_size_px else {
            return RequiredRatio::BodyText;
        };
        let threshold = if style.is_bold() { self.bold_px } else { self.regular_px };
        if size >= threshold {
            RequiredRatio::LargeText
        } else {
            RequiredRatio::BodyText
        }
    }
}

/// Whether a two-decimal ratio satisfies a requirement (inclusive).
pub fn is_sufficient(ratio: f64, required: RequiredRatio) -> bool {
    ratio >= required.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_inclusive() {
        assert!(is_sufficient(4.50, RequiredRatio::BodyText));
        assert!(!is_sufficient(4.49, RequiredRatio::BodyText));
        assert!(is_sufficient(3.00, RequiredRatio::LargeText));
        assert!(!is_sufficient(2.99, RequiredRatio::LargeText));
    }

    #[test]
    fn test_large_text_classification() {
        let policy = ThresholdPolicy::default();
        assert_eq!(policy.required_ratio(&TextStyle::bold(19.0)), RequiredRatio::LargeText);
        assert_eq!(policy.required_ratio(&TextStyle::bold(18.0)), RequiredRatio::BodyText);
        assert_eq!(policy.required_ratio(&TextStyle::regular(24.0)), RequiredRatio::LargeText);
        assert_eq!(policy.required_ratio(&TextStyle::regular(23.0)), RequiredRatio::BodyText);
    }

    #[test]
    fn test_missing_style_defaults_to_body_text() {
        let policy = ThresholdPolicy::default();
        assert_eq!(policy.required_ratio(&TextStyle::default()), RequiredRatio::BodyText);
        let size_only = TextStyle { font_size_px: Some(30.0), font_weight: None };
        // unknown weight is treated as regular, and 30px regular is large
        assert_eq!(policy.required_ratio(&size_only), RequiredRatio::LargeText);
    }

    #[test]
    fn test_labels_and_values() {
        assert_eq!(RequiredRatio::LargeText.label(), "3.0");
        assert_eq!(RequiredRatio::BodyText.label(), "4.5");
        assert_eq!(RequiredRatio::BodyText.value(), 4.5);
    }
}
