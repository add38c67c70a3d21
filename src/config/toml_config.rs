use crate::config::{PoemConfig, SpeechBackend, SpeechConfig, WeatherConfig};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SkaldError};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range,
    validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub skald: SkaldMeta,
    pub weather: WeatherConfig,
    pub poem: PoemConfig,
    #[serde(default)]
    pub speech: Option<SpeechConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkaldMeta {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SkaldError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SkaldError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").expect("hardcoded regex is valid");

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        // 天氣站設定
        validate_url("weather.endpoint", &self.weather.endpoint)?;
        validate_non_empty_string("weather.token", &self.weather.token)?;
        if self.weather.station_id <= 0 {
            return Err(SkaldError::InvalidConfigValueError {
                field: "weather.station_id".to_string(),
                value: self.weather.station_id.to_string(),
                reason: "Station id must be a positive integer".to_string(),
            });
        }
        validate_range("weather.forecast_days", self.weather.forecast_days, 1, 10)?;

        // 語言模型設定
        validate_url("poem.endpoint", &self.poem.endpoint)?;
        validate_non_empty_string("poem.api_key", &self.poem.api_key)?;
        validate_non_empty_string("poem.model", &self.poem.model)?;

        // 語音設定：local 後端必須提供 wav 參考語音
        let speech = self.speech_config();
        validate_non_empty_string("speech.output_name", &speech.output_name)?;
        match speech.backend {
            SpeechBackend::Local => {
                let speaker_wav =
                    validate_required_field("speech.speaker_wav", &speech.speaker_wav)?;
                validate_file_extension("speech.speaker_wav", speaker_wav, &["wav"])?;
            }
            SpeechBackend::Openai => {
                validate_non_empty_string("speech.voice", &speech.voice)?;
                validate_non_empty_string("speech.model", &speech.model)?;
            }
            SpeechBackend::Off => {}
        }

        // 輸出路徑
        validate_path("load.output_path", &self.load.output_path)?;

        Ok(())
    }

    /// 取得語音設定 ([speech] 區段整段可省略，等同全部預設)
    pub fn speech_config(&self) -> SpeechConfig {
        self.speech.clone().unwrap_or_default()
    }

    /// 取得輸出路徑
    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// A validated, fully-resolved view of the TOML config, implementing the
/// `ConfigProvider` port the pipeline consumes.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    weather: WeatherConfig,
    poem: PoemConfig,
    speech: SpeechConfig,
    output_path: String,
}

impl ResolvedConfig {
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            weather: config.weather.clone(),
            poem: config.poem.clone(),
            speech: config.speech_config(),
            output_path: config.load.output_path.clone(),
        })
    }

    /// 覆寫語音後端 (命令列 --speech)
    pub fn with_speech_backend(mut self, backend: SpeechBackend) -> Self {
        self.speech.backend = backend;
        self
    }
}

impl ConfigProvider for ResolvedConfig {
    fn weather(&self) -> &WeatherConfig {
        &self.weather
    }

    fn poem(&self) -> &PoemConfig {
        &self.poem
    }

    fn speech(&self) -> &SpeechConfig {
        &self.speech
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}
