use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkaldError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Weather station API returned status {status}: {message}")]
    WeatherApiError { status: u16, message: String },

    #[error("Completion error: {message}")]
    CompletionError { message: String },

    #[error("Speech API returned status {status}: {message}")]
    SpeechApiError { status: u16, message: String },

    #[error("TTS engine '{engine}' failed: {message}")]
    TtsEngineError { engine: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Processing,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SkaldError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::WeatherApiError { .. } | Self::SpeechApiError { .. } => {
                ErrorCategory::Network
            }
            Self::CompletionError { .. } | Self::SerializationError(_) => ErrorCategory::Processing,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Config,
            Self::IoError(_) | Self::TtsEngineError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常是暫時性的，重跑即可
            Self::ApiError(_) | Self::WeatherApiError { .. } | Self::SpeechApiError { .. } => {
                ErrorSeverity::Medium
            }
            Self::CompletionError { .. }
            | Self::SerializationError(_)
            | Self::TtsEngineError { .. } => ErrorSeverity::High,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(_) => "Check your network connection and try again".to_string(),
            Self::WeatherApiError { status, .. } => match status {
                401 | 403 => "Check the weather.token value in your config file".to_string(),
                404 => "Check the weather.station_id value in your config file".to_string(),
                _ => "The weather station API may be down; try again later".to_string(),
            },
            Self::CompletionError { .. } => {
                "The language model returned no usable text; try again or change poem.model"
                    .to_string()
            }
            Self::SpeechApiError { status, .. } => match status {
                401 | 403 => "Check the poem.api_key value in your config file".to_string(),
                _ => "The speech API may be down; try again or set speech.backend = \"off\""
                    .to_string(),
            },
            Self::TtsEngineError { engine, .. } => format!(
                "Make sure '{}' is installed and on PATH, or set the TTS_BIN environment variable",
                engine
            ),
            Self::IoError(_) => "Check that the output path exists and is writable".to_string(),
            Self::SerializationError(_) => {
                "The API returned an unexpected response format".to_string()
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Processing => format!("Processing problem: {}", self),
            ErrorCategory::Config => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SkaldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_critical() {
        let err = SkaldError::MissingConfigError {
            field: "weather.token".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_weather_api_error_is_network_medium() {
        let err = SkaldError::WeatherApiError {
            status: 500,
            message: "server error".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_auth_failure_suggestion_points_at_token() {
        let err = SkaldError::WeatherApiError {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert!(err.recovery_suggestion().contains("weather.token"));
    }

    #[test]
    fn test_tts_engine_suggestion_names_engine() {
        let err = SkaldError::TtsEngineError {
            engine: "tts".to_string(),
            message: "not found".to_string(),
        };
        assert!(err.recovery_suggestion().contains("'tts'"));
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_user_friendly_message_prefixes_category() {
        let err = SkaldError::ConfigError {
            message: "bad".to_string(),
        };
        assert!(err.user_friendly_message().starts_with("Configuration problem:"));
    }
}
