// SPDX-License-Identifier: PMPL-1.0-or-later
//! WCAG contrast ratio calculation.
//!
//! Relative luminance per WCAG 2.x
//! <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>.
//! Inputs are treated as already-opaque: translucent colors must be
//! composited against their effective backdrop upstream.

use crate::color::Color;

/// Relative luminance of a color, 0.0 (black) to 1.0 (white).
///
/// Alpha does not enter the formula.
pub fn relative_luminance(color: Color) -> f64 {
    let srgb = [color.r, color.g, color.b].map(|c| {
        let v = c as f64 / 255.0;
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    });
    0.2126 * srgb[0] + 0.7152 * srgb[1] + 0.0722 * srgb[2]
}

/// Contrast ratio between two colors, always >= 1.0 and symmetric.
pub fn contrast_ratio(fg: Color, bg: Color) -> f64 {
    let l1 = relative_luminance(fg);
    let l2 = relative_luminance(bg);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Round a raw ratio to exactly two decimal places.
///
/// Every ratio that reaches a sample, threshold decision, or combination
/// key goes through this first: two colors differing only in the third
/// decimal must collapse into the same finding.
pub fn round_ratio(raw: f64) -> f64 {
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_extremes() {
        assert!((relative_luminance(Color::new(255, 255, 255)) - 1.0).abs() < 0.01);
        assert!(relative_luminance(Color::new(0, 0, 0)).abs() < 0.01);
    }

    #[test]
    fn test_black_on_white_is_21() {
        let ratio = round_ratio(contrast_ratio(
            Color::new(0, 0, 0),
            Color::new(255, 255, 255),
        ));
        assert_eq!(ratio, 21.0);
    }

    #[test]
    fn test_same_color_is_1() {
        let gray = Color::new(128, 128, 128);
        assert_eq!(round_ratio(contrast_ratio(gray, gray)), 1.0);
    }

    #[test]
    fn test_symmetry() {
        let a = Color::new(119, 119, 119);
        let b = Color::new(240, 240, 10);
        assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
    }

    #[test]
    fn test_ratio_never_below_one() {
        let colors = [
            Color::new(0, 0, 0),
            Color::new(255, 255, 255),
            Color::new(12, 200, 99),
            Color::new(255, 0, 0),
        ];
        for fg in colors {
            for bg in colors {
                assert!(contrast_ratio(fg, bg) >= 1.0);
            }
        }
    }

    #[test]
    fn test_round_ratio_collapses_third_decimal() {
        assert_eq!(round_ratio(4.484), 4.48);
        assert_eq!(round_ratio(4.485), 4.49);
        assert_eq!(round_ratio(21.0000001), 21.0);
    }

    #[test]
    fn test_gray_on_white_value() {
        // #777 on #fff lands just under the body-text requirement
        let ratio = round_ratio(contrast_ratio(
            Color::new(119, 119, 119),
            Color::new(255, 255, 255),
        ));
        assert_eq!(ratio, 4.48);
    }
}
