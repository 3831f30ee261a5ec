//! Prediction table loading using Polars

use std::collections::HashSet;
use std::path::Path;

use polars::prelude::*;

use crate::error::ArtifactError;

/// Column holding the unique customer identifier.
pub const CUSTOMER_ID: &str = "Customer ID";
/// Column holding the model's churn probability, in [0, 1].
pub const CHURN_PROBABILITY: &str = "churn_probability";
/// Column holding the boolean churn prediction made upstream.
pub const PREDICTED_CHURN: &str = "predicted_churn";
/// Column holding the observed churn outcome.
pub const IS_CHURNED: &str = "is_churned";
/// Column holding the customer's country group (segment label).
pub const COUNTRY_GROUP: &str = "PrimaryCountry_Grouped_Original";

/// Behavioral feature columns every prediction table must carry.
const REQUIRED_FEATURES: [&str; 4] = ["Recency", "Frequency", "Monetary", "Tenure"];

/// Columns excluded from the model's feature set.
const NON_FEATURE_COLUMNS: [&str; 5] = [
    CUSTOMER_ID,
    CHURN_PROBABILITY,
    PREDICTED_CHURN,
    IS_CHURNED,
    COUNTRY_GROUP,
];

/// One scored customer from the prediction table.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub customer_id: String,
    pub churn_probability: f64,
    pub predicted_churn: bool,
    pub is_churned: bool,
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
    pub tenure: f64,
    pub country_group: String,
}

/// The loaded prediction table, held immutably for the process lifetime.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Records in original file order.
    pub records: Vec<PredictionRecord>,
    /// Feature columns in file order, which is the order the classifier was
    /// trained on. Importance vectors align with this positionally.
    pub feature_names: Vec<String>,
}

impl Dataset {
    /// Number of distinct customer identifiers in the table.
    pub fn distinct_customers(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.customer_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Load the churn prediction CSV produced by the upstream notebooks.
///
/// Rows with a null customer id or null probability are dropped before
/// materialization. A missing file, missing column, unparseable cell, or a
/// probability outside [0, 1] is reported as an [`ArtifactError`] so the
/// caller can surface an actionable message instead of crashing.
pub fn load_dataset(path: &Path) -> Result<Dataset, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound {
            path: path.to_path_buf(),
            hint: "Run the feature engineering and dashboard insights notebooks \
                   to produce the prediction table.",
        });
    }

    let df = CsvReader::from_path(path)
        .map_err(|e| ArtifactError::malformed(path, e.to_string()))?
        .has_header(true)
        .finish()
        .map_err(|e| ArtifactError::malformed(path, e.to_string()))?;

    let present: HashSet<&str> = df.get_column_names().into_iter().collect();
    for name in NON_FEATURE_COLUMNS.iter().chain(REQUIRED_FEATURES.iter()) {
        if !present.contains(name) {
            return Err(ArtifactError::malformed(
                path,
                format!("missing required column '{name}'"),
            ));
        }
    }

    // Filter out rows that cannot be scored or identified
    let df = df
        .lazy()
        .filter(
            col(CUSTOMER_ID)
                .is_not_null()
                .and(col(CHURN_PROBABILITY).is_not_null()),
        )
        .collect()
        .map_err(|e| ArtifactError::malformed(path, e.to_string()))?;

    if df.height() == 0 {
        return Err(ArtifactError::malformed(
            path,
            "no usable rows after dropping rows with missing id or probability",
        ));
    }

    let feature_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .filter(|name| !NON_FEATURE_COLUMNS.contains(name))
        .map(str::to_string)
        .collect();

    let customer_ids = string_column(&df, path, CUSTOMER_ID)?;
    let probabilities = f64_column(&df, path, CHURN_PROBABILITY)?;
    let predicted = bool_column(&df, path, PREDICTED_CHURN)?;
    let churned = bool_column(&df, path, IS_CHURNED)?;
    let recency = f64_column(&df, path, "Recency")?;
    let frequency = f64_column(&df, path, "Frequency")?;
    let monetary = f64_column(&df, path, "Monetary")?;
    let tenure = f64_column(&df, path, "Tenure")?;
    let segments = string_column(&df, path, COUNTRY_GROUP)?;

    if let Some(p) = probabilities
        .iter()
        .find(|p| !p.is_finite() || !(0.0..=1.0).contains(*p))
    {
        return Err(ArtifactError::malformed(
            path,
            format!("churn probability {p} is outside [0, 1]"),
        ));
    }

    let records = (0..df.height())
        .map(|i| PredictionRecord {
            customer_id: customer_ids[i].clone(),
            churn_probability: probabilities[i],
            predicted_churn: predicted[i],
            is_churned: churned[i],
            recency: recency[i],
            frequency: frequency[i],
            monetary: monetary[i],
            tenure: tenure[i],
            country_group: segments[i].clone(),
        })
        .collect();

    Ok(Dataset {
        records,
        feature_names,
    })
}

/// Extract a column as `f64`, casting numeric types as needed.
fn f64_column(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<f64>, ArtifactError> {
    let series = df
        .column(name)
        .map_err(|e| ArtifactError::malformed(path, e.to_string()))?
        .cast(&DataType::Float64)
        .map_err(|_| ArtifactError::malformed(path, format!("column '{name}' is not numeric")))?;

    if series.null_count() > 0 {
        return Err(ArtifactError::malformed(
            path,
            format!("column '{name}' has empty cells"),
        ));
    }

    Ok(series
        .f64()
        .map_err(|e| ArtifactError::malformed(path, e.to_string()))?
        .into_no_null_iter()
        .collect())
}

/// Extract a column as owned strings; numeric ids are stringified.
fn string_column(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<String>, ArtifactError> {
    let series = df
        .column(name)
        .map_err(|e| ArtifactError::malformed(path, e.to_string()))?
        .cast(&DataType::Utf8)
        .map_err(|_| ArtifactError::malformed(path, format!("column '{name}' is not textual")))?;

    if series.null_count() > 0 {
        return Err(ArtifactError::malformed(
            path,
            format!("column '{name}' has empty cells"),
        ));
    }

    Ok(series
        .utf8()
        .map_err(|e| ArtifactError::malformed(path, e.to_string()))?
        .into_no_null_iter()
        .map(str::to_string)
        .collect())
}

/// Extract a boolean column.
///
/// The upstream notebook writes pandas booleans, so the column may arrive as
/// native booleans, 0/1 integers, or "True"/"False" text.
fn bool_column(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<bool>, ArtifactError> {
    let series = df
        .column(name)
        .map_err(|e| ArtifactError::malformed(path, e.to_string()))?;

    if series.null_count() > 0 {
        return Err(ArtifactError::malformed(
            path,
            format!("column '{name}' has empty cells"),
        ));
    }

    match series.dtype() {
        DataType::Boolean => Ok(series
            .bool()
            .map_err(|e| ArtifactError::malformed(path, e.to_string()))?
            .into_no_null_iter()
            .collect()),
        DataType::Utf8 => series
            .utf8()
            .map_err(|e| ArtifactError::malformed(path, e.to_string()))?
            .into_no_null_iter()
            .map(|value| match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(ArtifactError::malformed(
                    path,
                    format!("column '{name}' has non-boolean value '{other}'"),
                )),
            })
            .collect(),
        _ => {
            let values = f64_column(df, path, name)?;
            Ok(values.into_iter().map(|v| v != 0.0).collect())
        }
    }
}
