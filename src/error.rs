// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for daltonbot

use thiserror::Error;

/// Main error type for daltonbot
#[derive(Error, Debug)]
pub enum DaltonError {
    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("cannot parse color value: {0:?}")]
    ColorParse(String),

    #[error("unsupported deficiency type: {0:?}")]
    UnsupportedDeficiency(String),

    #[error("report sink error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DaltonError>;
