//! ChurnLens: churn prediction insight CLI
//!
//! This is the main entrypoint that loads the two upstream artifacts once,
//! derives the insight tables, and renders the console report and charts.

use anyhow::Result;
use churnlens::{
    at_risk, churn_by_segment, feature_importances, load_classifier, load_dataset,
    summary_metrics, viz, Args,
};
use clap::Parser;
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if args.verbose { "debug" } else { "info" },
    ))
    .init();

    println!("ChurnLens - Retail Customer Churn Insights");
    println!("==========================================");

    run_report(&args)
}

/// Run the full report over the two loaded artifacts.
///
/// Both artifacts are loaded exactly once here and passed by reference into
/// every derivation, so a failed load halts all dependent sections with a
/// single actionable message.
fn run_report(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: load artifacts
    if args.verbose {
        println!("\nLoading prediction table from: {}", args.data.display());
    }
    let dataset = load_dataset(&args.data)?;
    println!(
        "\n✓ Prediction table loaded: {} records, {} feature columns",
        dataset.records.len(),
        dataset.feature_names.len()
    );

    if args.verbose {
        println!("Loading classifier artifact from: {}", args.model.display());
    }
    let model = load_classifier(&args.model)?;
    println!("✓ Classifier loaded: {}", model.model_type);

    // Step 2: headline metrics
    let metrics = summary_metrics(&dataset);
    viz::print_summary(&metrics);

    // Step 3: churn drivers
    let importances = feature_importances(&model, &dataset.feature_names)?;
    if importances.is_empty() {
        log::warn!(
            "model type '{}' exposes neither importances nor coefficients",
            model.model_type
        );
        println!(
            "\nWarning: feature importance data not available for the loaded model."
        );
    } else {
        println!("\n=== Key Churn Drivers ===");
        for entry in importances.iter().take(args.top) {
            println!("  {:<20} {:.4}", entry.feature, entry.importance);
        }
        viz::create_importance_chart(&importances, args.top, &args.output)?;
    }

    // Step 4: segmentation
    let segments = churn_by_segment(&dataset);
    viz::print_segment_table(&segments);
    viz::create_segment_chart(&segments, &args.segment_chart_path())?;

    // Step 5: at-risk customers
    let at_risk_customers = at_risk(&dataset, args.threshold);
    log::debug!(
        "threshold {:.2} selected {} of {} records",
        args.threshold,
        at_risk_customers.len(),
        dataset.records.len()
    );
    viz::print_at_risk_table(&at_risk_customers, args.threshold, args.limit);

    let elapsed = start_time.elapsed();
    println!("\n=== Report Complete ===");
    println!("Total processing time: {:.2}s", elapsed.as_secs_f64());

    Ok(())
}
