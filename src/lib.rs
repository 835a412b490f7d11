// SPDX-License-Identifier: PMPL-1.0-or-later
//! Daltonbot - Color-Vision-Deficiency Contrast Auditor
//!
//! Part of the gitbot-fleet ecosystem. Daltonbot evaluates whether
//! foreground/background color pairs provide sufficient contrast,
//! separately for normal vision and for three forms of dichromatic
//! color blindness.
//!
//! ## Pipeline
//!
//! Each color pair runs through a deterministic four-stage pipeline:
//!
//! 1. **Simulation** ([`vision`]): a fixed linear transform approximates
//!    how the pair appears under protanopia, deuteranopia, or tritanopia.
//! 2. **Contrast** ([`contrast`]): the WCAG relative-luminance ratio,
//!    rounded to two decimals.
//! 3. **Policy** ([`policy`]): large text requires 3.0:1, everything else
//!    4.5:1 (WCAG 1.4.3 AA).
//! 4. **Deduplication** ([`engine`]): a per-run registry maps each unique
//!    (pair, profile, requirement) combination to at most one finding.
//!
//! The [`scanner`] extracts pairs from CSS and inline HTML styles; the
//! [`report`] module collects findings and renders text, JSON, or SARIF.

pub mod color;
pub mod contrast;
pub mod engine;
pub mod error;
pub mod policy;
pub mod report;
pub mod scanner;
pub mod vision;

pub use color::Color;
pub use engine::{evaluate, Audit, ContrastSample, Finding, FindingRegistry, ReportSink};
pub use error::{DaltonError, Result};
pub use policy::{is_sufficient, RequiredRatio, TextStyle, ThresholdPolicy};
pub use vision::{simulate, DeficiencyType, Vision};
