/// Panel analysis model
///
/// A panel analysis records the compliance verdict returned by the analysis
/// service for one uploaded panel photo. Rows are only written after a
/// successful analysis and are never modified.
///
/// The `compliant` column duplicates `analysis.compliant` so listings can be
/// filtered without decoding JSON. Stores derive it from the result when the
/// row is created, so the two can never disagree.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE panel_analyses (
///     id BIGSERIAL PRIMARY KEY,
///     project_id BIGINT NOT NULL REFERENCES projects(id),
///     image_url TEXT NOT NULL,
///     analysis JSONB NOT NULL,
///     compliant BOOLEAN NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured compliance verdict for an electrical panel
///
/// This is the exact shape the analysis service is instructed to return.
/// Every field is required; deserialization fails on a missing or mistyped
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Whether the panel appears to comply with NEC 2023
    pub compliant: bool,

    /// Code violations and safety issues found
    pub issues: Vec<String>,

    /// Recommended corrective actions
    pub recommendations: Vec<String>,

    /// Short narrative summary
    pub summary: String,
}

/// A stored panel analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelAnalysis {
    pub id: i64,

    /// Parent project
    pub project_id: i64,

    /// The submitted image payload (base64)
    pub image_url: String,

    /// Verdict returned by the analysis service
    pub analysis: AnalysisResult,

    /// Copy of `analysis.compliant`
    pub compliant: bool,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a panel analysis
///
/// There is deliberately no `compliant` field: stores copy it from
/// `analysis`.
#[derive(Debug, Clone)]
pub struct CreatePanelAnalysis {
    pub project_id: i64,
    pub image_url: String,
    pub analysis: AnalysisResult,
}
