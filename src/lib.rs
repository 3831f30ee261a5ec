//! ChurnLens: a Rust CLI for exploring customer churn predictions
//!
//! This library reads a precomputed churn prediction table and a serialized
//! classifier artifact, then derives summary metrics, ranked feature
//! importances, per-segment churn rates, and an at-risk customer list.

pub mod cli;
pub mod data;
pub mod error;
pub mod insights;
pub mod model;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{load_dataset, Dataset, PredictionRecord};
pub use error::ArtifactError;
pub use insights::{at_risk, churn_by_segment, summary_metrics, SegmentChurn, SummaryMetrics};
pub use model::{feature_importances, load_classifier, ClassifierArtifact, FeatureImportance};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
