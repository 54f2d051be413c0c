/// Canned [`PanelAnalyzer`] for tests and local development
use super::{AnalysisError, PanelAnalyzer};
use crate::models::AnalysisResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Analyzer that always returns the same outcome
#[derive(Debug)]
pub struct MockAnalyzer {
    outcome: Result<AnalysisResult, AnalysisError>,
    calls: AtomicUsize,
}

impl MockAnalyzer {
    /// Always succeeds with `result`
    pub fn returning(result: AnalysisResult) -> Self {
        Self {
            outcome: Ok(result),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails with a service error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(AnalysisError::Service(message.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails with a parse error carrying `message`
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(AnalysisError::Parse(message.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `analyze` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PanelAnalyzer for MockAnalyzer {
    async fn analyze(&self, _image_base64: &str) -> Result<AnalysisResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
