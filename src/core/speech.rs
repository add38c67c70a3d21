use crate::config::{PoemConfig, SpeechConfig};
use crate::utils::error::{Result, SkaldError};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// Hosted text-to-speech client. Uses the language-model vendor's
/// `audio/speech` endpoint with the same credentials as the poem composer.
#[derive(Debug, Clone)]
pub struct SpeechSynthesizer {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    voice: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest {
    model: String,
    voice: String,
    input: String,
}

impl SpeechSynthesizer {
    pub fn new(poem_config: &PoemConfig, speech_config: &SpeechConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            client,
            endpoint: poem_config.endpoint.clone(),
            api_key: poem_config.api_key.clone(),
            model: speech_config.model.clone(),
            voice: speech_config.voice.clone(),
        })
    }

    /// 把文字轉成 mp3 位元組
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let request = SpeechRequest {
            model: self.model.clone(),
            voice: self.voice.clone(),
            input: text.to_string(),
        };

        let url = format!("{}/audio/speech", self.endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Speech API response status: {}", status);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SkaldError::SpeechApiError {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response.bytes().await?;
        tracing::debug!("Received {} bytes of audio", audio.len());
        Ok(audio.to_vec())
    }
}
