use crate::config::PoemConfig;
use crate::domain::model::{Forecast, Poem};
use crate::utils::error::{Result, SkaldError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Turns a forecast into a skaldic poem via a hosted chat-completions API.
#[derive(Debug, Clone)]
pub struct PoemComposer {
    client: Client,
    config: PoemConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// 組合給語言模型的提示詞
pub fn build_prompt(style: &str, forecast_summary: &str) -> String {
    format!(
        "Write a paragraph describing the following weather in the style of {}: {}",
        style, forecast_summary
    )
}

impl PoemComposer {
    pub fn new(config: &PoemConfig) -> Result<Self> {
        let timeout = config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub async fn compose(&self, forecast: &Forecast) -> Result<Poem> {
        let prompt = build_prompt(&self.config.style, &forecast.summary());
        tracing::debug!("Prompt length: {} characters", prompt.len());

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let url = format!("{}/chat/completions", self.config.endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Completion API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SkaldError::CompletionError {
                message: format!("API returned status {}: {}", status.as_u16(), body),
            });
        }

        let payload: ChatResponse = response.json().await?;
        let text = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| SkaldError::CompletionError {
                message: "Response contained no choices".to_string(),
            })?;

        if text.trim().is_empty() {
            return Err(SkaldError::CompletionError {
                message: "Model returned empty text".to_string(),
            });
        }

        Ok(Poem {
            text,
            model: self.config.model.clone(),
        })
    }
}
