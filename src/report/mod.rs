// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report collection and rendering for contrast findings.
//!
//! `ContrastReport` is the shipped reporting collaborator: a collecting
//! sink whose handles are entry UUIDs. Rendering supports:
//! - Text: human-readable findings per vision profile
//! - JSON: structured findings for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use crate::engine::{ContrastSample, ReportSink};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Where a color pair was found, as reported by the traversal layer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceLocation {
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
    /// CSS selector or element description
    pub element: Option<String>,
}

impl SourceLocation {
    pub fn display_string(&self) -> String {
        match (&self.file, self.line) {
            (Some(f), Some(l)) => format!("{}:{}", f.display(), l),
            (Some(f), None) => f.display().to_string(),
            _ => "<unknown>".to_string(),
        }
    }
}

/// A reported failing combination.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    /// Unique identifier, returned to the engine as the report handle
    pub id: Uuid,
    pub sample: ContrastSample,
    /// How many times this combination was observed during the run
    pub occurrences: usize,
    pub location: Option<SourceLocation>,
    pub created_at: DateTime<Utc>,
}

/// A first-seen passing combination, labeled once per run.
#[derive(Debug, Clone, Serialize)]
pub struct PassAnnotation {
    pub sample: ContrastSample,
    pub location: Option<SourceLocation>,
}

/// Collecting report sink for one audit run.
#[derive(Debug, Default, Serialize)]
pub struct ContrastReport {
    pub failures: Vec<ReportEntry>,
    pub passes: Vec<PassAnnotation>,
    #[serde(skip)]
    current_location: Option<SourceLocation>,
}

impl ContrastReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source location attached to subsequently recorded findings.
    pub fn set_location(&mut self, location: Option<SourceLocation>) {
        self.current_location = location;
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Distinct failing combinations.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Total failing occurrences including repeats.
    pub fn occurrence_count(&self) -> usize {
        self.failures.iter().map(|e| e.occurrences).sum()
    }
}

impl ReportSink for ContrastReport {
    type Handle = Uuid;

    fn report_failure(&mut self, sample: &ContrastSample) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.failures.push(ReportEntry {
            id,
            sample: sample.clone(),
            occurrences: 1,
            location: self.current_location.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn annotate_pass(&mut self, sample: &ContrastSample) {
        self.passes.push(PassAnnotation {
            sample: sample.clone(),
            location: self.current_location.clone(),
        });
    }

    fn reemphasize_failure(&mut self, handle: &Uuid, _sample: &ContrastSample) {
        if let Some(entry) = self.failures.iter_mut().find(|e| e.id == *handle) {
            entry.occurrences += 1;
        }
    }
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Generate a report in the requested format
pub fn generate_report(report: &ContrastReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(report),
        OutputFormat::Json => generate_json_report(report),
        OutputFormat::Sarif => generate_sarif_report(report),
    }
}

fn generate_text_report(report: &ContrastReport) -> String {
    let mut output = String::new();

    output.push_str("=== Daltonbot Contrast Audit Report ===\n\n");

    if !report.has_failures() {
        output.push_str(&format!(
            "No insufficient contrast found. {} combination(s) passed.\n",
            report.passes.len()
        ));
        return output;
    }

    output.push_str(&format!(
        "Found {} insufficient combination(s) ({} total occurrence(s)); {} passed.\n\n",
        report.failure_count(),
        report.occurrence_count(),
        report.passes.len()
    ));

    for entry in &report.failures {
        let sample = &entry.sample;
        output.push_str(&format!(
            "[{}] {} on {} is {}:1, requires {}:1\n",
            sample.vision,
            sample.foreground.css_string(),
            sample.background.css_string(),
            sample.ratio_label(),
            sample.required.label()
        ));
        if let Some(ref location) = entry.location {
            output.push_str(&format!("  Location: {}\n", location.display_string()));
            if let Some(ref element) = location.element {
                output.push_str(&format!("  Element: {}\n", element));
            }
        }
        if entry.occurrences > 1 {
            output.push_str(&format!("  Seen {} times\n", entry.occurrences));
        }
        output.push('\n');
    }

    output.push_str("RESULT: FAIL (insufficient contrast found)\n");
    output
}

fn generate_json_report(report: &ContrastReport) -> String {
    serde_json::to_string_pretty(report)
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize report: {}\"}}", e))
}

/// SARIF report structure (simplified)
#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    #[serde(rename = "informationUri")]
    information_uri: String,
}

#[derive(Debug, Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
    region: Option<SarifRegion>,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Debug, Serialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
}

fn generate_sarif_report(report: &ContrastReport) -> String {
    let results: Vec<SarifResult> = report
        .failures
        .iter()
        .map(|entry| {
            let sample = &entry.sample;
            let mut locations = Vec::new();
            if let Some(ref location) = entry.location {
                if let Some(ref file) = location.file {
                    locations.push(SarifLocation {
                        physical_location: SarifPhysicalLocation {
                            artifact_location: SarifArtifactLocation {
                                uri: file.display().to_string(),
                            },
                            region: location.line.map(|l| SarifRegion { start_line: l }),
                        },
                    });
                }
            }

            SarifResult {
                rule_id: format!("WCAG-1.4.3-contrast-{}", sample.vision.key_component()),
                level: "error".to_string(),
                message: SarifMessage {
                    text: format!(
                        "{}: contrast ratio {}:1 between {} and {} is below the required {}:1",
                        sample.vision,
                        sample.ratio_label(),
                        sample.foreground.css_string(),
                        sample.background.css_string(),
                        sample.required.label()
                    ),
                },
                locations,
            }
        })
        .collect();

    let sarif = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "daltonbot".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: "https://github.com/hyperpolymath/daltonbot".to_string(),
                },
            },
            results,
        }],
    };

    serde_json::to_string_pretty(&sarif)
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize SARIF report: {}\"}}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::engine::evaluate;
    use crate::policy::{TextStyle, ThresholdPolicy};
    use crate::vision::Vision;

    fn failing_sample() -> ContrastSample {
        evaluate(
            &ThresholdPolicy::default(),
            Color::new(128, 128, 128),
            Color::new(255, 255, 255),
            &TextStyle::regular(16.0),
            Vision::Normal,
        )
    }

    #[test]
    fn test_reemphasize_bumps_occurrences() {
        let mut report = ContrastReport::new();
        let sample = failing_sample();
        let handle = report.report_failure(&sample).unwrap();
        report.reemphasize_failure(&handle, &sample);
        report.reemphasize_failure(&handle, &sample);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.occurrence_count(), 3);
    }

    #[test]
    fn test_text_report_empty() {
        let report = ContrastReport::new();
        let text = generate_report(&report, OutputFormat::Text);
        assert!(text.contains("No insufficient contrast found"));
    }

    #[test]
    fn test_text_report_with_failure() {
        let mut report = ContrastReport::new();
        report.set_location(Some(SourceLocation {
            file: Some(PathBuf::from("styles.css")),
            line: Some(4),
            element: Some(".muted".to_string()),
        }));
        report.report_failure(&failing_sample()).unwrap();
        let text = generate_report(&report, OutputFormat::Text);
        assert!(text.contains("requires 4.5:1"));
        assert!(text.contains("styles.css:4"));
        assert!(text.contains("RESULT: FAIL"));
    }

    #[test]
    fn test_json_report() {
        let mut report = ContrastReport::new();
        report.report_failure(&failing_sample()).unwrap();
        let json = generate_report(&report, OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert!(parsed["failures"].is_array());
        assert_eq!(parsed["failures"][0]["sample"]["ratio"], "3.95");
    }

    #[test]
    fn test_sarif_report() {
        let mut report = ContrastReport::new();
        report.set_location(Some(SourceLocation {
            file: Some(PathBuf::from("index.html")),
            line: Some(9),
            element: None,
        }));
        report.report_failure(&failing_sample()).unwrap();
        let sarif = generate_report(&report, OutputFormat::Sarif);
        let parsed: serde_json::Value = serde_json::from_str(&sarif).expect("valid JSON");
        assert_eq!(parsed["version"], "2.1.0");
        assert_eq!(parsed["runs"][0]["tool"]["driver"]["name"], "daltonbot");
        assert_eq!(
            parsed["runs"][0]["results"][0]["ruleId"],
            "WCAG-1.4.3-contrast-normal"
        );
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("sarif".parse::<OutputFormat>().unwrap(), OutputFormat::Sarif);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
