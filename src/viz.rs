//! Chart rendering with Plotters and console report tables

use std::path::Path;

use plotters::prelude::*;

use crate::data::PredictionRecord;
use crate::insights::{SegmentChurn, SummaryMetrics};
use crate::model::FeatureImportance;

/// Color palette cycled across bars
const BAR_COLORS: [RGBColor; 5] = [BLUE, RED, GREEN, MAGENTA, CYAN];

/// Render the top-N feature importance bar chart.
///
/// `importances` must already be ranked descending; only the first `top`
/// entries are drawn.
pub fn create_importance_chart(
    importances: &[FeatureImportance],
    top: usize,
    output_path: &Path,
) -> crate::Result<()> {
    let bars: Vec<&FeatureImportance> = importances.iter().take(top).collect();
    if bars.is_empty() {
        anyhow::bail!("no feature importances to plot");
    }

    let max_score = bars
        .iter()
        .map(|b| b.importance)
        .fold(0.0f64, f64::max)
        .max(f64::MIN_POSITIVE);
    let names: Vec<&str> = bars.iter().map(|b| b.feature.as_str()).collect();

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Top Features Influencing Churn", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..bars.len() as f64, 0f64..max_score * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Feature")
        .y_desc("Importance")
        .x_labels(bars.len())
        .x_label_formatter(&|x| {
            names
                .get(*x as usize)
                .map(|s| s.to_string())
                .unwrap_or_default()
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, bar) in bars.iter().enumerate() {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(i as f64 + 0.1, 0.0), (i as f64 + 0.9, bar.importance)],
            BLUE.filled(),
        )))?;
    }

    root.present()?;
    println!(
        "Feature importance chart saved to: {}",
        output_path.display()
    );

    Ok(())
}

/// Render the churn-rate-by-segment bar chart.
pub fn create_segment_chart(segments: &[SegmentChurn], output_path: &Path) -> crate::Result<()> {
    if segments.is_empty() {
        anyhow::bail!("no segments to plot");
    }

    let max_rate = segments
        .iter()
        .map(|s| s.churn_rate_pct)
        .fold(0.0f64, f64::max)
        .max(1.0);
    let names: Vec<&str> = segments.iter().map(|s| s.segment.as_str()).collect();

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Churn Rate by Country Group", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..segments.len() as f64, 0f64..max_rate * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Country Group")
        .y_desc("Churn Rate (%)")
        .x_labels(segments.len())
        .x_label_formatter(&|x| {
            names
                .get(*x as usize)
                .map(|s| s.to_string())
                .unwrap_or_default()
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, segment) in segments.iter().enumerate() {
        let color = &BAR_COLORS[i % BAR_COLORS.len()];
        chart.draw_series(std::iter::once(Rectangle::new(
            [(i as f64 + 0.1, 0.0), (i as f64 + 0.9, segment.churn_rate_pct)],
            color.filled(),
        )))?;
    }

    root.present()?;
    println!("Segment churn chart saved to: {}", output_path.display());

    Ok(())
}

/// Print the four headline metrics.
pub fn print_summary(metrics: &SummaryMetrics) {
    println!("\n=== Overall Churn Insights ===");
    println!("Total customers:      {}", metrics.total_customers);
    println!("Actual churn rate:    {:.2}%", metrics.actual_churn_rate_pct);
    println!(
        "Predicted churn rate: {:.2}%",
        metrics.predicted_churn_rate_pct
    );
    println!("Predicted churners:   {}", metrics.predicted_churners);
}

/// Print the per-segment churn rate table.
pub fn print_segment_table(segments: &[SegmentChurn]) {
    println!("\n=== Churn Rate by Country Group ===");
    println!("  Country Group        | Customers | Churn Rate");
    println!("  ---------------------|-----------|-----------");
    for segment in segments {
        println!(
            "  {:<20} | {:>9} | {:>9.2}%",
            segment.segment, segment.customers, segment.churn_rate_pct
        );
    }
}

/// Print the at-risk customer table, capped at `limit` rows.
pub fn print_at_risk_table(at_risk: &[&PredictionRecord], threshold: f64, limit: usize) {
    println!("\n=== At-Risk Customers ===");
    println!(
        "Showing {} customers with churn probability >= {:.2}",
        at_risk.len(),
        threshold
    );

    if at_risk.is_empty() {
        println!("No customers identified as at-risk with the current threshold.");
        return;
    }

    println!(
        "  Customer ID  | Probability       | Churn | Recency | Frequency | Monetary    | Tenure | Country Group"
    );
    println!(
        "  -------------|-------------------|-------|---------|-----------|-------------|--------|--------------"
    );
    for record in at_risk.iter().take(limit) {
        println!(
            "  {:<12} | {:.2} {} | {}  | {:>7.0} | {:>9.0} | £{:>10.2} | {:>6.0} | {}",
            record.customer_id,
            record.churn_probability,
            probability_bar(record.churn_probability),
            if record.predicted_churn { "[x]" } else { "[ ]" },
            record.recency,
            record.frequency,
            record.monetary,
            record.tenure,
            record.country_group
        );
    }

    if at_risk.len() > limit {
        println!("  ... {} more rows not shown", at_risk.len() - limit);
    }
}

/// Ten-segment ASCII progress bar for a probability in [0, 1].
fn probability_bar(probability: f64) -> String {
    let filled = (probability.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), " ".repeat(10 - filled))
}
