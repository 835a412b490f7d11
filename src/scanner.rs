// SPDX-License-Identifier: PMPL-1.0-or-later
//! File scanner feeding the contrast audit.
//!
//! Walks directory trees, extracts foreground/background color pairs and
//! text styles from CSS rules and inline HTML styles, and runs each pair
//! through the audit under every vision profile. This is the traversal
//! collaborator: it resolves colors and styles, composites translucent
//! colors against their backdrop, and leaves the decisions to the engine.

use crate::color::{Color, ColorParser};
use crate::engine::Audit;
use crate::error::Result;
use crate::policy::{TextStyle, ThresholdPolicy};
use crate::report::{ContrastReport, SourceLocation};
use regex::Regex;
use scraper::{Html, Selector};
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// File extensions to scan
const SCANNABLE_EXTENSIONS: &[&str] = &["css", "html", "htm"];

/// Directories to skip
const SKIP_DIRS: &[&str] = &[
    "node_modules", ".git", "target", "dist", "build",
    "_build", "vendor", ".next", ".nuxt", "coverage",
];

/// A color pair resolved from a stylesheet or element, ready to audit.
#[derive(Debug, Clone)]
pub struct StyledPair {
    pub foreground: Color,
    pub background: Color,
    pub style: TextStyle,
    pub location: SourceLocation,
}

/// Declaration extraction regexes shared by the CSS and HTML paths.
struct DeclarationExtractor {
    color_re: Regex,
    bg_re: Regex,
    size_re: Regex,
    weight_re: Regex,
    parser: ColorParser,
}

impl DeclarationExtractor {
    fn new() -> Self {
        Self {
            color_re: Regex::new(r"(?i)(?:^|;|\{)\s*color\s*:\s*([^;}\n]+)").expect("valid regex"),
            bg_re: Regex::new(r"(?i)background(?:-color)?\s*:\s*([^;}\n]+)").expect("valid regex"),
            size_re: Regex::new(r"(?i)font-size\s*:\s*([0-9.]+)\s*(px|pt|em|rem)?")
                .expect("valid regex"),
            weight_re: Regex::new(r"(?i)font-weight\s*:\s*(\w+)").expect("valid regex"),
            parser: ColorParser::new()
                .with_normalizer(|v| (v == "transparent").then(Color::transparent)),
        }
    }

    /// Pull a color pair and text style out of a declaration block.
    ///
    /// Returns `None` unless both a foreground and a background color are
    /// present and parseable; a pair with only one side resolved cannot be
    /// judged.
    fn extract(&self, declarations: &str) -> Option<(Color, Color, TextStyle)> {
        let fg = self
            .color_re
            .captures(declarations)
            .and_then(|c| self.parser.parse(c[1].trim()).ok())?;
        let bg = self
            .bg_re
            .captures(declarations)
            .and_then(|c| self.parser.parse(c[1].trim()).ok())?;

        let font_size_px = self.size_re.captures(declarations).and_then(|c| {
            let value: f64 = c[1].parse().ok()?;
            let px = match c.get(2).map(|u| u.as_str().to_lowercase()).as_deref() {
                Some("pt") => value * 96.0 / 72.0,
                Some("em") | Some("rem") => value * 16.0,
                _ => value,
            };
            Some(px)
        });
        let font_weight = self.weight_re.captures(declarations).and_then(|c| {
            match c[1].to_lowercase().as_str() {
                "bold" | "bolder" => Some(700),
                "normal" => Some(400),
                numeric => numeric.parse().ok(),
            }
        });

        Some((fg, bg, TextStyle { font_size_px, font_weight }))
    }
}

/// Extract auditable pairs from CSS rule blocks.
fn extract_css_pairs(path: &Path, content: &str) -> Vec<StyledPair> {
    let extractor = DeclarationExtractor::new();
    let block_re = Regex::new(r"([^{]+)\{([^}]+)\}").expect("valid regex");

    let mut pairs = Vec::new();
    for caps in block_re.captures_iter(content) {
        let selector = caps[1].trim().to_string();
        if let Some((fg, bg, style)) = extractor.extract(&caps[2]) {
            pairs.push(StyledPair {
                foreground: fg,
                background: bg,
                style,
                location: SourceLocation {
                    file: Some(path.to_path_buf()),
                    line: find_selector_line(content, &selector),
                    element: Some(selector),
                },
            });
        }
    }
    pairs
}

/// Extract auditable pairs from inline styles in an HTML document.
fn extract_html_pairs(path: &Path, content: &str) -> Vec<StyledPair> {
    let extractor = DeclarationExtractor::new();
    let document = Html::parse_document(content);
    let styled = Selector::parse("[style]").expect("valid selector");

    let mut pairs = Vec::new();
    for element in document.select(&styled) {
        let Some(style_attr) = element.value().attr("style") else {
            continue;
        };
        if let Some((fg, bg, style)) = extractor.extract(style_attr) {
            pairs.push(StyledPair {
                foreground: fg,
                background: bg,
                style,
                location: SourceLocation {
                    file: Some(path.to_path_buf()),
                    line: None,
                    element: Some(element.value().name().to_string()),
                },
            });
        }
    }
    pairs
}

/// Find the line number of a CSS selector
fn find_selector_line(content: &str, selector: &str) -> Option<usize> {
    let trimmed = selector.trim();
    content
        .lines()
        .position(|line| line.contains(trimmed))
        .map(|idx| idx + 1)
}

/// Audit every pair found in one file's content.
fn audit_content(
    audit: &mut Audit<ContrastReport>,
    path: &Path,
    content: &str,
) -> Result<usize> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let pairs = match ext {
        "css" => extract_css_pairs(path, content),
        "html" | "htm" => extract_html_pairs(path, content),
        _ => Vec::new(),
    };
    let count = pairs.len();

    for pair in pairs {
        // Flatten translucency before the calculator sees the colors: the
        // background composites over the document default (white), the
        // foreground over the flattened background.
        let background = pair.background.composite_over(Color::new(255, 255, 255));
        let foreground = pair.foreground.composite_over(background);

        debug!(
            "auditing {} on {} at {}",
            foreground.css_string(),
            background.css_string(),
            pair.location.display_string()
        );
        audit.sink_mut().set_location(Some(pair.location));
        audit.check_all_profiles(foreground, background, &pair.style)?;
    }
    audit.sink_mut().set_location(None);
    Ok(count)
}

/// Scan a directory tree for contrast issues.
pub fn scan_directory(dir: &Path, policy: ThresholdPolicy) -> Result<ContrastReport> {
    let mut audit = Audit::new(policy, ContrastReport::new());
    let mut files_scanned = 0;
    let mut pairs_found = 0;

    info!("Scanning directory: {}", dir.display());

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_str().unwrap_or("");
            if e.file_type().is_dir() {
                return !SKIP_DIRS.contains(&name) && !name.starts_with('.');
            }
            true
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !SCANNABLE_EXTENSIONS.contains(&ext) {
            continue;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                info!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        pairs_found += audit_content(&mut audit, path, &content)?;
        files_scanned += 1;
    }

    let report = audit.into_sink();
    info!(
        "Scanned {} files, {} color pairs, {} insufficient combination(s)",
        files_scanned,
        pairs_found,
        report.failure_count()
    );
    Ok(report)
}

/// Scan a single file for contrast issues.
pub fn scan_file(path: &Path, policy: ThresholdPolicy) -> Result<ContrastReport> {
    let content = std::fs::read_to_string(path)?;
    let mut audit = Audit::new(policy, ContrastReport::new());
    audit_content(&mut audit, path, &content)?;
    Ok(audit.into_sink())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_css_pairs() {
        let css = r#"
            .muted { color: #777; background-color: #fff; font-size: 14px; }
            .hero { color: white; background: navy; font-size: 24pt; font-weight: bold; }
            .no-bg { color: #333; }
        "#;
        let pairs = extract_css_pairs(Path::new("styles.css"), css);
        assert_eq!(pairs.len(), 2);

        assert_eq!(pairs[0].foreground, Color::new(119, 119, 119));
        assert_eq!(pairs[0].style.font_size_px, Some(14.0));
        assert_eq!(pairs[0].location.element.as_deref(), Some(".muted"));
        assert_eq!(pairs[0].location.line, Some(2));

        assert_eq!(pairs[1].background, Color::new(0, 0, 128));
        assert_eq!(pairs[1].style.font_size_px, Some(32.0));
        assert_eq!(pairs[1].style.font_weight, Some(700));
    }

    #[test]
    fn test_extract_inline_html_pairs() {
        let html = r#"<p style="color: #fff; background-color: rgb(250, 250, 250);">faint</p>"#;
        let pairs = extract_html_pairs(Path::new("page.html"), html);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].foreground, Color::new(255, 255, 255));
        assert_eq!(pairs[0].location.element.as_deref(), Some("p"));
    }

    #[test]
    fn test_transparent_background_normalized() {
        let css = ".ghost { color: #444; background: transparent; }";
        let pairs = extract_css_pairs(Path::new("styles.css"), css);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].background, Color::transparent());
    }

    #[test]
    fn test_audit_content_composites_transparent_over_white() {
        let css = ".ghost { color: #444; background: transparent; }";
        let mut audit = Audit::new(ThresholdPolicy::default(), ContrastReport::new());
        let count = audit_content(&mut audit, Path::new("styles.css"), css).unwrap();
        assert_eq!(count, 1);
        // #444 on (transparent -> white) is 9.74:1 under normal vision
        let report = audit.into_sink();
        assert!(report
            .passes
            .iter()
            .any(|p| p.sample.ratio == 9.74 && p.sample.background == Color::new(255, 255, 255)));
    }

    #[test]
    fn test_font_weight_numeric() {
        let extractor = DeclarationExtractor::new();
        let (_, _, style) = extractor
            .extract("color: #000; background: #fff; font-weight: 600")
            .unwrap();
        assert_eq!(style.font_weight, Some(600));
    }

    #[test]
    fn test_scan_nonexistent_dir() {
        let result = scan_directory(Path::new("/nonexistent/path"), ThresholdPolicy::default());
        // walkdir yields a single error entry, which the scan skips
        assert!(result.is_ok());
        assert!(!result.unwrap().has_failures());
    }
}
