/// OpenAI-compatible vision analyzer
///
/// Sends one chat-completions request per photo: a fixed inspector system
/// prompt, a user message carrying the image as a JPEG data URL, and
/// `response_format: json_object`. The first choice's message content is
/// parsed into an [`AnalysisResult`].
///
/// # Failure Modes
///
/// - Transport errors, timeouts and non-2xx replies: [`AnalysisError::Service`]
/// - Missing choices, non-JSON or mistyped content: [`AnalysisError::Parse`]

use super::{parse_analysis_content, AnalysisError, PanelAnalyzer};
use crate::models::AnalysisResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

const SYSTEM_PROMPT: &str = "You are an expert electrical inspector with deep knowledge of the \
National Electrical Code (NEC 2023). Analyze the electrical panel image and provide detailed \
compliance information. Focus on safety issues, code violations, and recommendations. Provide \
output in JSON format with fields: compliant (boolean), issues (array), recommendations (array), \
and summary (string).";

const USER_PROMPT: &str = "Please analyze this electrical panel for NEC 2023 compliance.";

/// Connection settings for the analysis service
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL without the `/chat/completions` suffix
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'static str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

fn build_request<'a>(model: &'a str, image_base64: &str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(SYSTEM_PROMPT),
            },
            ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text { text: USER_PROMPT },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{}", image_base64),
                        },
                    },
                ]),
            },
        ],
        response_format: ResponseFormat {
            kind: "json_object",
        },
    }
}

/// Extracts and validates the verdict from a raw chat-completions body
fn parse_response_body(body: &str) -> Result<AnalysisResult, AnalysisError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::Parse(format!("malformed completion body: {}", e)))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AnalysisError::Parse("completion has no message content".to_string()))?;

    parse_analysis_content(&content)
}

/// [`PanelAnalyzer`] backed by an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiAnalyzer {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiAnalyzer {
    /// Builds the HTTP client with the configured timeout
    pub fn new(config: OpenAiConfig) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalysisError::Service(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl PanelAnalyzer for OpenAiAnalyzer {
    #[instrument(skip(self, image_base64), fields(model = %self.config.model))]
    async fn analyze(&self, image_base64: &str) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();
        let request = build_request(&self.config.model, image_base64);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, timeout = e.is_timeout(), "Analysis request failed");
                AnalysisError::Service(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Service(e.to_string()))?;

        if !status.is_success() {
            warn!(status = %status, "Analysis service returned an error");
            return Err(AnalysisError::Service(format!(
                "analysis service returned {}: {}",
                status, body
            )));
        }

        let result = parse_response_body(&body)?;

        info!(
            compliant = result.compliant,
            issues = result.issues.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Panel analysis completed"
        );

        Ok(result)
    }
}
