//! Classifier artifact loading and feature importance extraction

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ArtifactError;

/// Where a model's per-feature influence scores come from.
///
/// Resolved once at load time so downstream code matches on a variant
/// instead of re-probing the artifact on every call.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportanceSource {
    /// Tree-style models export non-negative importance weights directly.
    Importances(Vec<f64>),
    /// Linear models export signed coefficients; magnitude is used as the
    /// importance score, sign discarded.
    Coefficients(Vec<f64>),
    /// The model exports neither. Not an error: importances are simply
    /// unavailable and the caller shows a warning.
    Unsupported,
}

/// The loaded classifier, immutable for the process lifetime.
///
/// The model's scoring capability was already applied upstream; all this
/// side needs is the influence vector and enough provenance to report
/// problems against the right file.
#[derive(Debug, Clone)]
pub struct ClassifierArtifact {
    pub model_type: String,
    pub source: ImportanceSource,
    path: PathBuf,
}

/// Name-to-score pairing for one input feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// On-disk shape of the exported model document.
#[derive(Debug, Deserialize)]
struct ClassifierDocument {
    model_type: String,
    feature_importances: Option<Vec<f64>>,
    coefficients: Option<Vec<f64>>,
}

/// Load the serialized classifier exported by the model training notebook.
pub fn load_classifier(path: &Path) -> Result<ClassifierArtifact, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound {
            path: path.to_path_buf(),
            hint: "Run the model training and evaluation notebook to export the \
                   champion model.",
        });
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| ArtifactError::malformed(path, e.to_string()))?;
    let doc: ClassifierDocument = serde_json::from_str(&raw)
        .map_err(|e| ArtifactError::malformed(path, e.to_string()))?;

    let source = if let Some(weights) = doc.feature_importances {
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ArtifactError::malformed(
                path,
                format!("importance weight {w} is negative or non-finite"),
            ));
        }
        ImportanceSource::Importances(weights)
    } else if let Some(coefs) = doc.coefficients {
        if let Some(c) = coefs.iter().find(|c| !c.is_finite()) {
            return Err(ArtifactError::malformed(
                path,
                format!("coefficient {c} is non-finite"),
            ));
        }
        ImportanceSource::Coefficients(coefs)
    } else {
        ImportanceSource::Unsupported
    };

    Ok(ClassifierArtifact {
        model_type: doc.model_type,
        source,
        path: path.to_path_buf(),
    })
}

/// Derive the ranked feature importance table for a loaded classifier.
///
/// `feature_names` must be in training column order; the Nth score maps to
/// the Nth name. A length mismatch between the two is reported as a
/// malformed artifact rather than silently mis-mapping names to scores.
/// An [`ImportanceSource::Unsupported`] model yields an empty table.
///
/// The result is sorted descending by score; ties keep column order.
pub fn feature_importances(
    model: &ClassifierArtifact,
    feature_names: &[String],
) -> Result<Vec<FeatureImportance>, ArtifactError> {
    let scores: Vec<f64> = match &model.source {
        ImportanceSource::Importances(weights) => weights.clone(),
        ImportanceSource::Coefficients(coefs) => coefs.iter().map(|c| c.abs()).collect(),
        ImportanceSource::Unsupported => return Ok(Vec::new()),
    };

    if scores.len() != feature_names.len() {
        return Err(ArtifactError::malformed(
            &model.path,
            format!(
                "model exports {} influence scores but the dataset has {} feature columns",
                scores.len(),
                feature_names.len()
            ),
        ));
    }

    let mut ranked: Vec<FeatureImportance> = feature_names
        .iter()
        .zip(scores)
        .map(|(feature, importance)| FeatureImportance {
            feature: feature.clone(),
            importance,
        })
        .collect();

    // Stable sort keeps original column order for equal scores
    ranked.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(Ordering::Equal)
    });

    Ok(ranked)
}
