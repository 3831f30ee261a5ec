//! Pure insight derivations over the loaded prediction table
//!
//! Every function here is stateless: it borrows the dataset read-only and
//! returns a derived view, so each call is reproducible from its inputs.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::data::{Dataset, PredictionRecord};

/// Headline numbers shown at the top of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub total_customers: usize,
    /// Mean of the observed churn labels, as a percentage, 2 dp.
    pub actual_churn_rate_pct: f64,
    /// Mean of the predicted churn labels, as a percentage, 2 dp.
    pub predicted_churn_rate_pct: f64,
    pub predicted_churners: usize,
}

/// Churn rate for one country group.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentChurn {
    pub segment: String,
    pub churn_rate_pct: f64,
    pub customers: usize,
}

/// Select customers whose churn probability meets the threshold.
///
/// Sorted descending by probability; ties keep original table order. An
/// empty selection is a valid zero-count result, and any threshold above
/// 1.0 selects nothing.
pub fn at_risk(dataset: &Dataset, threshold: f64) -> Vec<&PredictionRecord> {
    let mut selected: Vec<&PredictionRecord> = dataset
        .records
        .iter()
        .filter(|r| r.churn_probability >= threshold)
        .collect();

    selected.sort_by(|a, b| {
        b.churn_probability
            .partial_cmp(&a.churn_probability)
            .unwrap_or(Ordering::Equal)
    });

    selected
}

/// Compute the headline metrics for the whole table.
pub fn summary_metrics(dataset: &Dataset) -> SummaryMetrics {
    let n = dataset.records.len();
    if n == 0 {
        return SummaryMetrics {
            total_customers: 0,
            actual_churn_rate_pct: 0.0,
            predicted_churn_rate_pct: 0.0,
            predicted_churners: 0,
        };
    }

    let churned = dataset.records.iter().filter(|r| r.is_churned).count();
    let predicted_churners = dataset
        .records
        .iter()
        .filter(|r| r.predicted_churn)
        .count();

    SummaryMetrics {
        total_customers: dataset.distinct_customers(),
        actual_churn_rate_pct: round2(churned as f64 / n as f64 * 100.0),
        predicted_churn_rate_pct: round2(predicted_churners as f64 / n as f64 * 100.0),
        predicted_churners,
    }
}

/// Per-country-group churn rates, sorted descending by rate.
///
/// Ties keep first-appearance order in the table.
pub fn churn_by_segment(dataset: &Dataset) -> Vec<SegmentChurn> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for record in &dataset.records {
        let entry = counts.entry(record.country_group.as_str()).or_insert_with(|| {
            order.push(record.country_group.as_str());
            (0, 0)
        });
        entry.1 += 1;
        if record.is_churned {
            entry.0 += 1;
        }
    }

    let mut segments: Vec<SegmentChurn> = order
        .into_iter()
        .map(|segment| {
            let (churned, total) = counts[segment];
            SegmentChurn {
                segment: segment.to_string(),
                churn_rate_pct: churned as f64 / total as f64 * 100.0,
                customers: total,
            }
        })
        .collect();

    segments.sort_by(|a, b| {
        b.churn_rate_pct
            .partial_cmp(&a.churn_rate_pct)
            .unwrap_or(Ordering::Equal)
    });

    segments
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, probability: f64, churned: bool, segment: &str) -> PredictionRecord {
        PredictionRecord {
            customer_id: id.to_string(),
            churn_probability: probability,
            predicted_churn: probability >= 0.5,
            is_churned: churned,
            recency: 30.0,
            frequency: 5.0,
            monetary: 250.0,
            tenure: 200.0,
            country_group: segment.to_string(),
        }
    }

    fn dataset(records: Vec<PredictionRecord>) -> Dataset {
        Dataset {
            records,
            feature_names: vec![
                "Recency".to_string(),
                "Frequency".to_string(),
                "Monetary".to_string(),
                "Tenure".to_string(),
            ],
        }
    }

    #[test]
    fn test_summary_metrics() {
        // 10 records, 3 churned
        let records: Vec<PredictionRecord> = (0..10)
            .map(|i| record(&format!("c{i}"), 0.2, i < 3, "United Kingdom"))
            .collect();
        let metrics = summary_metrics(&dataset(records));

        assert_eq!(metrics.total_customers, 10);
        assert_eq!(metrics.actual_churn_rate_pct, 30.00);
        assert_eq!(metrics.predicted_churn_rate_pct, 0.0);
        assert_eq!(metrics.predicted_churners, 0);
    }

    #[test]
    fn test_summary_metrics_rounds_to_two_decimals() {
        // 1 churned of 3 records: 33.333...% -> 33.33%
        let records = vec![
            record("a", 0.1, true, "UK"),
            record("b", 0.1, false, "UK"),
            record("c", 0.1, false, "UK"),
        ];
        let metrics = summary_metrics(&dataset(records));
        assert_eq!(metrics.actual_churn_rate_pct, 33.33);
    }

    #[test]
    fn test_at_risk_ordering() {
        let records = vec![
            record("a", 0.2, false, "UK"),
            record("b", 0.6, false, "UK"),
            record("c", 0.9, true, "UK"),
            record("d", 0.5, false, "UK"),
        ];
        let data = dataset(records);

        let selected = at_risk(&data, 0.5);
        let ids: Vec<&str> = selected.iter().map(|r| r.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "d"]);
    }

    #[test]
    fn test_at_risk_ties_keep_table_order() {
        let records = vec![
            record("a", 0.7, false, "UK"),
            record("b", 0.9, false, "UK"),
            record("c", 0.7, false, "UK"),
        ];
        let data = dataset(records);

        let ids: Vec<&str> = at_risk(&data, 0.0)
            .iter()
            .map(|r| r.customer_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_at_risk_threshold_bounds() {
        let records = vec![
            record("a", 0.0, false, "UK"),
            record("b", 0.5, false, "UK"),
            record("c", 1.0, true, "UK"),
        ];
        let data = dataset(records);

        assert_eq!(at_risk(&data, 0.0).len(), 3);
        assert!(at_risk(&data, 1.01).is_empty());
    }

    #[test]
    fn test_at_risk_is_monotonic_in_threshold() {
        let records = vec![
            record("a", 0.15, false, "UK"),
            record("b", 0.35, false, "UK"),
            record("c", 0.55, false, "UK"),
            record("d", 0.75, true, "UK"),
            record("e", 0.95, true, "UK"),
        ];
        let data = dataset(records);

        let loose: Vec<&str> = at_risk(&data, 0.3)
            .iter()
            .map(|r| r.customer_id.as_str())
            .collect();
        let strict: Vec<&str> = at_risk(&data, 0.7)
            .iter()
            .map(|r| r.customer_id.as_str())
            .collect();

        assert!(strict.iter().all(|id| loose.contains(id)));
        assert!(strict.len() <= loose.len());
    }

    #[test]
    fn test_churn_by_segment_sorted_descending() {
        let records = vec![
            record("a", 0.2, false, "United Kingdom"),
            record("b", 0.2, false, "United Kingdom"),
            record("c", 0.2, true, "United Kingdom"),
            record("d", 0.8, true, "Other Europe"),
            record("e", 0.8, true, "Other Europe"),
            record("f", 0.1, false, "Rest of World"),
        ];
        let segments = churn_by_segment(&dataset(records));

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].segment, "Other Europe");
        assert_eq!(segments[0].churn_rate_pct, 100.0);
        assert_eq!(segments[0].customers, 2);
        assert_eq!(segments[1].segment, "United Kingdom");
        assert_eq!(segments[2].segment, "Rest of World");
        assert_eq!(segments[2].churn_rate_pct, 0.0);
    }

    #[test]
    fn test_churn_by_segment_rate_ties_keep_first_appearance_order() {
        // Two groups churn at exactly 50%; the group appearing earlier in
        // the table must sort first
        let records = vec![
            record("a", 0.2, true, "United Kingdom"),
            record("b", 0.2, false, "United Kingdom"),
            record("c", 0.8, true, "Other Europe"),
            record("d", 0.8, false, "Other Europe"),
            record("e", 0.9, true, "Rest of World"),
        ];
        let segments = churn_by_segment(&dataset(records));

        let order: Vec<&str> = segments.iter().map(|s| s.segment.as_str()).collect();
        assert_eq!(order, vec!["Rest of World", "United Kingdom", "Other Europe"]);
        assert_eq!(segments[1].churn_rate_pct, segments[2].churn_rate_pct);
    }

    #[test]
    fn test_segment_rates_reconstruct_overall_rate() {
        let records = vec![
            record("a", 0.2, true, "United Kingdom"),
            record("b", 0.2, false, "United Kingdom"),
            record("c", 0.2, false, "United Kingdom"),
            record("d", 0.8, true, "Other Europe"),
            record("e", 0.8, false, "Other Europe"),
            record("f", 0.1, true, "Rest of World"),
        ];
        let data = dataset(records);
        let total = data.records.len() as f64;

        let weighted: f64 = churn_by_segment(&data)
            .iter()
            .map(|s| s.churn_rate_pct * s.customers as f64 / total)
            .sum();
        let overall = summary_metrics(&data).actual_churn_rate_pct;

        assert!((weighted - overall).abs() < 0.01);
    }

    #[test]
    fn test_empty_dataset_yields_zero_metrics() {
        let metrics = summary_metrics(&dataset(Vec::new()));
        assert_eq!(metrics.total_customers, 0);
        assert_eq!(metrics.actual_churn_rate_pct, 0.0);
        assert_eq!(metrics.predicted_churners, 0);
    }
}
