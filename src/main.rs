// SPDX-License-Identifier: PMPL-1.0-or-later
//! Daltonbot CLI - Color-Vision-Deficiency Contrast Auditor
//!
//! Part of the gitbot-fleet ecosystem.

use clap::{Parser, Subcommand, ValueEnum};
use daltonbot::color::ColorParser;
use daltonbot::engine::Audit;
use daltonbot::policy::{TextStyle, ThresholdPolicy};
use daltonbot::report::{generate_report, ContrastReport, OutputFormat};
use daltonbot::scanner;
use daltonbot::Color;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Color-vision-deficiency contrast auditor for gitbot-fleet
#[derive(Parser)]
#[command(name = "daltonbot")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit all CSS/HTML files in a directory
    Check {
        /// Directory to scan
        dir: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Audit a single file
    Analyze {
        /// File to analyze
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Evaluate one foreground/background pair across all vision profiles
    Pair {
        /// Foreground color (hex, rgb()/rgba(), or named)
        foreground: String,

        /// Background color (hex, rgb()/rgba(), or named)
        background: String,

        /// Font size in CSS pixels
        #[arg(long)]
        font_size: Option<f64>,

        /// Treat the text as bold
        #[arg(long)]
        bold: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("daltonbot=debug")
    } else {
        EnvFilter::new("daltonbot=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { dir, format, output, verbose } => {
            init_logging(verbose);
            let report = scanner::scan_directory(&dir, ThresholdPolicy::default())?;
            let rendered = generate_report(&report, format.into());
            write_output(&rendered, output.as_deref())?;

            if report.has_failures() {
                std::process::exit(1);
            }
        }

        Commands::Analyze { file, format, verbose } => {
            init_logging(verbose);
            let report = scanner::scan_file(&file, ThresholdPolicy::default())?;
            let rendered = generate_report(&report, format.into());
            println!("{}", rendered);

            if report.has_failures() {
                std::process::exit(1);
            }
        }

        Commands::Pair { foreground, background, font_size, bold, format, verbose } => {
            init_logging(verbose);
            let parser = ColorParser::new()
                .with_normalizer(|v| (v == "transparent").then(Color::transparent));
            let fg = parser.parse(&foreground)?;
            let bg = parser.parse(&background)?;

            let white = Color::new(255, 255, 255);
            let bg = bg.composite_over(white);
            let fg = fg.composite_over(bg);

            let style = TextStyle {
                font_size_px: font_size,
                font_weight: if bold { Some(700) } else { None },
            };

            let mut audit = Audit::new(ThresholdPolicy::default(), ContrastReport::new());
            let findings = audit.check_all_profiles(fg, bg, &style)?;
            for finding in &findings {
                let sample = &finding.sample;
                println!(
                    "{:14} {} on {}  ratio {:>6}:1  requires {}:1  {}",
                    sample.vision.to_string(),
                    sample.foreground.css_string(),
                    sample.background.css_string(),
                    sample.ratio_label(),
                    sample.required.label(),
                    if finding.passed { "PASS" } else { "FAIL" }
                );
            }

            let report = audit.into_sink();
            if !matches!(format, FormatArg::Text) {
                println!("{}", generate_report(&report, format.into()));
            }
            if report.has_failures() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&std::path::Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
