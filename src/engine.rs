// SPDX-License-Identifier: PMPL-1.0-or-later
//! Contrast evaluation engine and per-run finding deduplication.
//!
//! `evaluate` is the pure pipeline (simulate -> ratio -> threshold);
//! `FindingRegistry` maps each unique color-pair combination to at most
//! one finding per audit run, so a large page does not produce redundant
//! reports.

use crate::color::Color;
use crate::contrast::{contrast_ratio, round_ratio};
use crate::error::Result;
use crate::policy::{is_sufficient, RequiredRatio, TextStyle, ThresholdPolicy};
use crate::vision::{perceive, Vision};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// One evaluated color-pair observation under a vision profile.
///
/// `ratio` is already rounded to two decimals; it serializes as the fixed
/// two-decimal string so equality and deduplication are free of
/// floating-point jitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastSample {
    pub foreground: Color,
    pub background: Color,
    pub vision: Vision,
    #[serde(
        serialize_with = "serialize_two_decimals",
        deserialize_with = "deserialize_two_decimals"
    )]
    pub ratio: f64,
    pub required: RequiredRatio,
}

fn serialize_two_decimals<S: Serializer>(ratio: &f64, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{:.2}", ratio))
}

fn deserialize_two_decimals<'de, D: serde::Deserializer<'de>>(
    d: D,
) -> std::result::Result<f64, D::Error> {
    let s = String::deserialize(d)?;
    s.parse().map_err(serde::de::Error::custom)
}

impl ContrastSample {
    /// The two-decimal string form of the ratio.
    pub fn ratio_label(&self) -> String {
        format!("{:.2}", self.ratio)
    }

    /// Whether the sample meets its required ratio (inclusive).
    pub fn passes(&self) -> bool {
        is_sufficient(self.ratio, self.required)
    }
}

/// Canonical identifier for a unique (color pair, vision, required-ratio)
/// combination. Equal underlying values always produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombinationKey(String);

impl CombinationKey {
    pub fn for_sample(sample: &ContrastSample) -> Self {
        Self(format!(
            "{}|{}|{}|{}",
            sample.foreground.css_string(),
            sample.background.css_string(),
            sample.vision.key_component(),
            sample.required.label(),
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Evaluate one color pair under one vision profile.
///
/// Pure and deterministic: both colors are simulated for the profile, the
/// contrast ratio is computed and rounded to two decimals, and the required
/// ratio is taken from the text style. Callers composite translucent colors
/// before calling.
pub fn evaluate(
    policy: &ThresholdPolicy,
    foreground: Color,
    background: Color,
    style: &TextStyle,
    vision: Vision,
) -> ContrastSample {
    let fg = perceive(foreground, vision);
    let bg = perceive(background, vision);
    let ratio = round_ratio(contrast_ratio(fg, bg));
    ContrastSample {
        foreground: fg,
        background: bg,
        vision,
        ratio,
        required: policy.required_ratio(style),
    }
}

/// A registered finding: one unique combination, passed or failed.
///
/// `report` holds whatever the reporting collaborator returned for a
/// failure, and is `None` for passing combinations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding<H> {
    pub key: CombinationKey,
    pub sample: ContrastSample,
    pub passed: bool,
    pub report: Option<H>,
}

enum SeenEntry<H> {
    Passed,
    Reported(H),
}

/// Per-run deduplication of color-pair findings.
///
/// Scoped to one audit run: created at run start, discarded at run end,
/// never shared across concurrent audits. At most one entry exists per
/// distinct combination key.
#[derive(Default)]
pub struct FindingRegistry<H> {
    seen: HashMap<CombinationKey, SeenEntry<H>>,
}

impl<H: Clone> FindingRegistry<H> {
    pub fn new() -> Self {
        Self { seen: HashMap::new() }
    }

    /// Whether this combination has been recorded during this run.
    pub fn contains(&self, key: &CombinationKey) -> bool {
        self.seen.contains_key(key)
    }

    /// Number of distinct combinations recorded.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Record a sample, or reuse the finding from an earlier occurrence.
    ///
    /// For an unseen failing combination, `report_fn` is invoked exactly
    /// once and the key is marked seen only after it succeeds: a failed
    /// report must not be silently treated as reported. Later occurrences
    /// of the same failing combination reuse the stored handle; passing
    /// combinations are tracked without a handle.
    pub fn record_or_reuse<F>(
        &mut self,
        sample: &ContrastSample,
        passed: bool,
        report_fn: F,
    ) -> Result<Finding<H>>
    where
        F: FnOnce(&ContrastSample) -> Result<H>,
    {
        let key = CombinationKey::for_sample(sample);
        let report = match self.seen.get(&key) {
            Some(SeenEntry::Reported(handle)) => Some(handle.clone()),
            Some(SeenEntry::Passed) => None,
            None => {
                if passed {
                    self.seen.insert(key.clone(), SeenEntry::Passed);
                    None
                } else {
                    let handle = report_fn(sample)?;
                    self.seen.insert(key.clone(), SeenEntry::Reported(handle.clone()));
                    Some(handle)
                }
            }
        };
        Ok(Finding { key, sample: sample.clone(), passed, report })
    }
}

/// The reporting collaborator surface.
///
/// The engine never renders anything itself; it hands pass/fail findings
/// to a sink and keeps whatever opaque handle the sink returns.
pub trait ReportSink {
    type Handle: Clone;

    /// Create a visible report entry for a failing sample.
    fn report_failure(&mut self, sample: &ContrastSample) -> Result<Self::Handle>;

    /// Label a first-seen passing combination. Never called twice for the
    /// same key within a run.
    fn annotate_pass(&mut self, sample: &ContrastSample);

    /// Re-emphasize a repeat occurrence of a failing combination, linked to
    /// the original report entry.
    fn reemphasize_failure(&mut self, _handle: &Self::Handle, _sample: &ContrastSample) {}
}

/// One audit run: a threshold policy, a private registry, and a sink.
pub struct Audit<S: ReportSink> {
    policy: ThresholdPolicy,
    registry: FindingRegistry<S::Handle>,
    sink: S,
}

impl<S: ReportSink> Audit<S> {
    pub fn new(policy: ThresholdPolicy, sink: S) -> Self {
        Self { policy, registry: FindingRegistry::new(), sink }
    }

    /// Evaluate one pair under one profile and route it through the
    /// registry and sink.
    pub fn check(
        &mut self,
        foreground: Color,
        background: Color,
        style: &TextStyle,
        vision: Vision,
    ) -> Result<Finding<S::Handle>> {
        let sample = evaluate(&self.policy, foreground, background, style, vision);
        let passed = sample.passes();
        let first_seen = !self.registry.contains(&CombinationKey::for_sample(&sample));

        let sink = &mut self.sink;
        let finding = self
            .registry
            .record_or_reuse(&sample, passed, |s| sink.report_failure(s))?;

        if first_seen {
            if passed {
                self.sink.annotate_pass(&finding.sample);
            }
        } else if !passed {
            if let Some(handle) = &finding.report {
                self.sink.reemphasize_failure(handle, &finding.sample);
            }
        }
        Ok(finding)
    }

    /// Evaluate one pair under every audited vision profile.
    pub fn check_all_profiles(
        &mut self,
        foreground: Color,
        background: Color,
        style: &TextStyle,
    ) -> Result<Vec<Finding<S::Handle>>> {
        Vision::ALL
            .iter()
            .map(|vision| self.check(foreground, background, style, *vision))
            .collect()
    }

    /// Finish the run, discarding the registry and returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
