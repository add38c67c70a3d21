use std::io::Write;
use tempfile::NamedTempFile;
use weather_skald::config::toml_config::{ResolvedConfig, TomlConfig};
use weather_skald::config::SpeechBackend;
use weather_skald::domain::ports::ConfigProvider;
use weather_skald::utils::validation::Validate;

fn write_config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_with_env_substituted_keys() {
    std::env::set_var("SKALD_IT_WF_TOKEN", "env-wf-token");
    std::env::set_var("SKALD_IT_OPENAI_KEY", "env-openai-key");

    let file = write_config_file(
        r#"
[skald]
name = "weather-skald"
description = "Env substitution test"
version = "1.0"

[weather]
token = "${SKALD_IT_WF_TOKEN}"
station_id = 67295

[poem]
api_key = "${SKALD_IT_OPENAI_KEY}"

[load]
output_path = "./output"
"#,
    );

    let config = TomlConfig::from_file(file.path()).unwrap();
    assert_eq!(config.weather.token, "env-wf-token");
    assert_eq!(config.poem.api_key, "env-openai-key");
    assert!(config.validate().is_ok());

    std::env::remove_var("SKALD_IT_WF_TOKEN");
    std::env::remove_var("SKALD_IT_OPENAI_KEY");
}

#[test]
fn test_full_speech_section_round_trip() {
    let file = write_config_file(
        r#"
[skald]
name = "weather-skald"
description = "Speech section test"
version = "1.0"

[weather]
token = "wf-token"
station_id = 67295
units_temp = "c"
units_wind = "kph"
forecast_days = 5

[poem]
api_key = "sk-test"
model = "gpt-4o"
style = "an Anglo-Saxon scop"

[speech]
backend = "local"
speaker_wav = "voices/jarl.wav"
language = "en"
output_name = "weather_reading"

[load]
output_path = "./out"

[monitoring]
enabled = true
"#,
    );

    let config = TomlConfig::from_file(file.path()).unwrap();
    assert_eq!(config.weather.units_temp, "c");
    assert_eq!(config.weather.forecast_days, 5);
    assert_eq!(config.poem.style, "an Anglo-Saxon scop");
    assert!(config.monitoring_enabled());

    let speech = config.speech_config();
    assert_eq!(speech.backend, SpeechBackend::Local);
    assert_eq!(speech.speaker_wav.as_deref(), Some("voices/jarl.wav"));
    assert_eq!(speech.output_name, "weather_reading");

    assert!(config.validate().is_ok());
}

#[test]
fn test_backend_override_relaxes_local_requirements() {
    // local 後端缺 speaker_wav 驗證會失敗，但覆寫成 off 之後應該通過
    let file = write_config_file(
        r#"
[skald]
name = "weather-skald"
description = "Override test"
version = "1.0"

[weather]
token = "wf-token"
station_id = 67295

[poem]
api_key = "sk-test"

[speech]
backend = "local"

[load]
output_path = "./out"
"#,
    );

    let mut config = TomlConfig::from_file(file.path()).unwrap();
    assert!(ResolvedConfig::from_toml(&config).is_err());

    let mut speech = config.speech_config();
    speech.backend = SpeechBackend::Off;
    config.speech = Some(speech);

    let resolved = ResolvedConfig::from_toml(&config).unwrap();
    assert_eq!(resolved.speech().backend, SpeechBackend::Off);
}

#[test]
fn test_missing_required_section_is_config_error() {
    let file = write_config_file(
        r#"
[skald]
name = "weather-skald"
description = "Missing sections"
version = "1.0"

[load]
output_path = "./out"
"#,
    );

    assert!(TomlConfig::from_file(file.path()).is_err());
}
