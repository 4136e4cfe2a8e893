//! Extraction client — one structured call, wrapped in the retry policy.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

use nudge_core::config::ExtractorConfig;
use nudge_core::retry::{RetryConfig, TransportError, with_retry};
use nudge_core::types::ExtractedTask;
use nudge_core::{NudgeError, Result as CoreResult};

use crate::error::ExtractError;
use crate::prompt::build_system_prompt;
use crate::schema::{
    EXTRACT_TASK_FUNCTION, ExtractTaskArgs, extract_task_tool, extract_task_tool_choice,
};

/// Client for the task-extraction call against an OpenAI-compatible
/// chat-completions endpoint.
pub struct ExtractionClient {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    retry: RetryConfig,
    client: reqwest::Client,
}

impl ExtractionClient {
    pub fn new(config: &ExtractorConfig) -> CoreResult<Self> {
        let api_key = config.resolve_api_key()?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| NudgeError::Config(format!("Failed to build HTTP client: {e}")))?;

        tracing::info!("🧠 Extraction client ready ({} @ {})", config.model, config.base_url);

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            retry: RetryConfig::default(),
            client,
        })
    }

    /// Override the default retry policy.
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Extract a task from `prompt`, resolving relative dates against
    /// `timezone`. Transport failures are retried per the configured policy;
    /// once the budget is exhausted the last one surfaces as
    /// [`ExtractError::Generation`].
    pub async fn extract(&self, prompt: &str, timezone: &str) -> Result<ExtractedTask, ExtractError> {
        with_retry(|| self.attempt(prompt, timezone), &self.retry)
            .await
            .map_err(|e| match e {
                ExtractError::Transport(source) => ExtractError::Generation { source },
                other => other,
            })
    }

    async fn attempt(&self, prompt: &str, timezone: &str) -> Result<ExtractedTask, ExtractError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": build_system_prompt(&now, timezone) },
                { "role": "user", "content": prompt },
            ],
            "tools": [extract_task_tool()],
            "tool_choice": extract_task_tool_choice(),
        });

        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let mut err = TransportError::new(format!("extraction API error {status}: {text}"))
                .with_status(status.as_u16());
            if let Some(t) = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["error"]["type"].as_str().map(String::from))
            {
                err = err.with_error_type(t);
            }
            return Err(err.into());
        }

        let response: Value = resp
            .json()
            .await
            .map_err(transport_error)?;
        parse_response(&response)
    }
}

/// Map a reqwest failure onto the classification hints the retry policy
/// understands.
fn transport_error(e: reqwest::Error) -> ExtractError {
    let mut t = TransportError::new(e.to_string());
    if e.is_timeout() {
        t = t.with_code("timeout");
    } else if e.is_connect() {
        t = t.with_code("connection_refused");
    } else if let Some(status) = e.status() {
        t = t.with_status(status.as_u16());
    }
    ExtractError::Transport(t)
}

/// Enforce the structured-output contract on one chat-completions response.
///
/// Checked in order: structured call present, arguments parseable, model did
/// not report a vague input, both required fields populated.
pub fn parse_response(response: &Value) -> Result<ExtractedTask, ExtractError> {
    let tool_call = response["choices"]
        .get(0)
        .and_then(|c| c["message"]["tool_calls"].as_array())
        .and_then(|calls| {
            calls
                .iter()
                .find(|t| t["function"]["name"] == EXTRACT_TASK_FUNCTION)
        })
        .ok_or(ExtractError::NoFunctionCall)?;

    let raw_args = tool_call["function"]["arguments"]
        .as_str()
        .ok_or_else(|| ExtractError::InvalidResponse("function call has no arguments".into()))?;

    let args: ExtractTaskArgs = serde_json::from_str(raw_args)
        .map_err(|e| ExtractError::InvalidResponse(format!("unparseable arguments: {e}")))?;

    if let Some(reason) = args.error.filter(|e| !e.is_empty()) {
        return Err(ExtractError::VagueInput(reason));
    }

    let title = args
        .title
        .filter(|t| !t.is_empty())
        .ok_or(ExtractError::MissingRequiredFields)?;
    let raw_date = args
        .date_time
        .filter(|d| !d.is_empty())
        .ok_or(ExtractError::MissingRequiredFields)?;

    let date_time = DateTime::parse_from_rfc3339(&raw_date)
        .map_err(|e| ExtractError::InvalidResponse(format!("unparseable dateTime '{raw_date}': {e}")))?
        .with_timezone(&Utc);

    Ok(ExtractedTask { title, date_time })
}
