//! Command-line interface definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;

/// Churn prediction insight CLI over a precomputed prediction table
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the churn prediction CSV
    #[arg(
        short,
        long,
        default_value = "data/processed/customer_churn_predictions.csv"
    )]
    pub data: PathBuf,

    /// Path to the serialized classifier artifact (JSON)
    #[arg(short, long, default_value = "models/churn_model.json")]
    pub model: PathBuf,

    /// Churn probability threshold for the at-risk list, in [0.0, 1.0]
    #[arg(short, long, default_value_t = 0.5, value_parser = parse_threshold)]
    pub threshold: f64,

    /// Output path for the feature importance chart; the segment chart is
    /// written next to it with a "_segments" suffix
    #[arg(short, long, default_value = "churn_report.png")]
    pub output: PathBuf,

    /// Number of features shown in the importance chart, at least 1
    #[arg(long, default_value_t = 10, value_parser = parse_top)]
    pub top: usize,

    /// Maximum number of rows shown in the at-risk table
    #[arg(long, default_value_t = 500)]
    pub limit: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Sibling path for the churn-by-segment chart.
    pub fn segment_chart_path(&self) -> PathBuf {
        let stem = self
            .output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("churn_report");
        self.output.with_file_name(format!("{stem}_segments.png"))
    }
}

fn parse_top(raw: &str) -> Result<usize, String> {
    let value: usize = raw
        .parse()
        .map_err(|_| format!("invalid feature count: {raw}"))?;
    if value == 0 {
        Err("feature count must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("invalid threshold value: {raw}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold must be within [0.0, 1.0], got {value}"))
    }
}
