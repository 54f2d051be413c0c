/// Panel compliance analysis
///
/// The HTTP layer only sees the [`PanelAnalyzer`] trait. The production
/// implementation, [`openai::OpenAiAnalyzer`], forwards the image to an
/// OpenAI-compatible vision model. [`mock::MockAnalyzer`] returns canned
/// results for tests.
///
/// There is no retry, fallback or caching. A failed analysis is reported to
/// the caller and nothing is stored.

use crate::models::AnalysisResult;
use async_trait::async_trait;

pub mod mock;
pub mod openai;

pub use mock::MockAnalyzer;
pub use openai::{OpenAiAnalyzer, OpenAiConfig};

/// Error type for panel analysis
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// Transport failure, timeout or non-2xx reply from the service
    #[error("Failed to analyze panel image: {0}")]
    Service(String),

    /// The reply did not have the expected shape
    #[error("Invalid analysis response: {0}")]
    Parse(String),
}

/// Produces a compliance verdict for a base64-encoded panel photo
#[async_trait]
pub trait PanelAnalyzer: Send + Sync {
    async fn analyze(&self, image_base64: &str) -> Result<AnalysisResult, AnalysisError>;
}

/// Parses the model's message content into an [`AnalysisResult`]
///
/// Every field must be present with the right type. Extra fields are
/// ignored.
///
/// # Example
///
/// ```
/// use panelcheck_shared::analysis::parse_analysis_content;
///
/// let result = parse_analysis_content(
///     r#"{"compliant": true, "issues": [], "recommendations": [], "summary": "OK"}"#,
/// )
/// .unwrap();
/// assert!(result.compliant);
///
/// assert!(parse_analysis_content("not json").is_err());
/// ```
pub fn parse_analysis_content(content: &str) -> Result<AnalysisResult, AnalysisError> {
    serde_json::from_str(content).map_err(|e| AnalysisError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysis_content_accepts_full_shape() {
        let result = parse_analysis_content(
            r#"{
                "compliant": false,
                "issues": ["Missing GFCI protection"],
                "recommendations": ["Install GFCI breaker"],
                "summary": "One violation",
                "confidence": 0.9
            }"#,
        )
        .unwrap();

        assert!(!result.compliant);
        assert_eq!(result.issues, vec!["Missing GFCI protection"]);
        assert_eq!(result.recommendations, vec!["Install GFCI breaker"]);
        assert_eq!(result.summary, "One violation");
    }

    #[test]
    fn test_parse_analysis_content_rejects_bad_shapes() {
        let cases = [
            "",
            "[]",
            r#"{"compliant": true}"#,
            r#"{"compliant": 1, "issues": [], "recommendations": [], "summary": ""}"#,
            r#"{"compliant": true, "issues": "none", "recommendations": [], "summary": ""}"#,
            r#"{"compliant": true, "issues": [], "recommendations": [], "summary": null}"#,
        ];

        for case in cases {
            assert!(
                matches!(parse_analysis_content(case), Err(AnalysisError::Parse(_))),
                "expected parse failure for {case:?}"
            );
        }
    }

    #[test]
    fn test_service_error_message() {
        let err = AnalysisError::Service("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to analyze panel image: connection refused"
        );
    }
}
