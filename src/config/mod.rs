pub mod cli;
pub mod toml_config;

use serde::{Deserialize, Serialize};

/// 天氣站 (WeatherFlow) 設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_endpoint")]
    pub endpoint: String,
    pub token: String,
    pub station_id: i64,
    #[serde(default = "default_units_temp")]
    pub units_temp: String,
    #[serde(default = "default_units_wind")]
    pub units_wind: String,
    #[serde(default = "default_units_pressure")]
    pub units_pressure: String,
    #[serde(default = "default_units_precip")]
    pub units_precip: String,
    #[serde(default = "default_units_distance")]
    pub units_distance: String,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,
    pub timeout_seconds: Option<u64>,
}

/// 語言模型 (詩文生成) 設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoemConfig {
    #[serde(default = "default_poem_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_poem_model")]
    pub model: String,
    #[serde(default = "default_poem_style")]
    pub style: String,
    pub timeout_seconds: Option<u64>,
}

/// 語音合成設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub backend: SpeechBackend,
    #[serde(default = "default_speech_model")]
    pub model: String,
    #[serde(default = "default_speech_voice")]
    pub voice: String,
    pub speaker_wav: Option<String>,
    #[serde(default = "default_speech_language")]
    pub language: String,
    #[serde(default = "default_output_name")]
    pub output_name: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            backend: SpeechBackend::default(),
            model: default_speech_model(),
            voice: default_speech_voice(),
            speaker_wav: None,
            language: default_speech_language(),
            output_name: default_output_name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechBackend {
    /// Hosted audio/speech endpoint, writes mp3
    #[default]
    Openai,
    /// Local TTS CLI conditioned on a speaker wav, writes wav
    Local,
    /// Skip synthesis, write the poem text only
    Off,
}

impl std::fmt::Display for SpeechBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Openai => write!(f, "openai"),
            Self::Local => write!(f, "local"),
            Self::Off => write!(f, "off"),
        }
    }
}

impl std::str::FromStr for SpeechBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::Openai),
            "local" => Ok(Self::Local),
            "off" => Ok(Self::Off),
            other => Err(format!(
                "Unknown speech backend '{}'. Valid backends: openai, local, off",
                other
            )),
        }
    }
}

fn default_weather_endpoint() -> String {
    "https://swd.weatherflow.com/swd/rest/better_forecast".to_string()
}

fn default_units_temp() -> String {
    "f".to_string()
}

fn default_units_wind() -> String {
    "mph".to_string()
}

fn default_units_pressure() -> String {
    "mmhg".to_string()
}

fn default_units_precip() -> String {
    "in".to_string()
}

fn default_units_distance() -> String {
    "mi".to_string()
}

fn default_forecast_days() -> usize {
    9
}

fn default_poem_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_poem_model() -> String {
    "gpt-4".to_string()
}

fn default_poem_style() -> String {
    "a Viking skald".to_string()
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_speech_voice() -> String {
    "onyx".to_string()
}

fn default_speech_language() -> String {
    "en".to_string()
}

fn default_output_name() -> String {
    "skaldic_weather".to_string()
}
