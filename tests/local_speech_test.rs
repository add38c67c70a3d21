//! Local speech backend tests. The real Coqui CLI is not available in CI, so
//! these tests point TTS_BIN at stand-in executables.

#![cfg(unix)]

use httpmock::prelude::*;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;
use weather_skald::config::toml_config::{ResolvedConfig, TomlConfig};
use weather_skald::utils::error::SkaldError;
use weather_skald::{LocalStorage, SkaldEngine, SkaldPipeline};

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "current_conditions": {
            "air_temperature": 71.0,
            "feels_like": 73.5,
            "relative_humidity": 48
        },
        "forecast": {
            "daily": [
                {
                    "month_num": 8,
                    "day_num": 30,
                    "conditions": "Clear",
                    "air_temp_high": 82.0,
                    "air_temp_low": 61.0
                }
            ]
        }
    })
}

fn mock_weather_and_chat(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/better_forecast");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(forecast_body());
    });

    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "Frost rides the wind."}}
                ]
            }));
    });
}

fn local_toml(base_url: &str, output_path: &str, speaker_wav: &str) -> String {
    format!(
        r#"
[skald]
name = "weather-skald"
description = "Local speech test"
version = "1.0"

[weather]
endpoint = "{base_url}/better_forecast"
token = "wf-test-token"
station_id = 67295

[poem]
endpoint = "{base_url}"
api_key = "sk-test"

[speech]
backend = "local"
speaker_wav = "{speaker_wav}"

[load]
output_path = "{output_path}"
"#
    )
}

/// 假的 tts CLI：把固定位元組寫到 --out_path (第 10 個參數)
fn write_fake_tts_script(dir: &TempDir) -> String {
    let script_path = dir.path().join("fake_tts");
    let mut file = std::fs::File::create(&script_path).unwrap();
    file.write_all(b"#!/bin/sh\nprintf 'RIFFfakewav' > \"${10}\"\n")
        .unwrap();
    drop(file);

    let mut perms = std::fs::metadata(&script_path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script_path, perms).unwrap();

    script_path.to_str().unwrap().to_string()
}

fn write_speaker_wav(dir: &TempDir) -> String {
    let wav_path = dir.path().join("speaker.wav");
    std::fs::write(&wav_path, b"RIFF0000WAVEfmt ").unwrap();
    wav_path.to_str().unwrap().to_string()
}

fn write_broken_tts_script(dir: &TempDir) -> String {
    let script_path = dir.path().join("broken_tts");
    std::fs::write(
        &script_path,
        b"#!/bin/sh\necho 'model load failed' >&2\nexit 1\n",
    )
    .unwrap();
    let mut perms = std::fs::metadata(&script_path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script_path, perms).unwrap();
    script_path.to_str().unwrap().to_string()
}

async fn run_with_tts_bin(tts_bin: &str) -> (TempDir, weather_skald::Result<String>) {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    mock_weather_and_chat(&server);

    let speaker_wav = write_speaker_wav(&temp_dir);
    std::env::set_var("TTS_BIN", tts_bin);

    let config =
        TomlConfig::from_toml_str(&local_toml(&server.base_url(), &output_path, &speaker_wav))
            .unwrap();
    let resolved = ResolvedConfig::from_toml(&config).unwrap();

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = SkaldPipeline::new(storage, resolved).unwrap();
    let engine = SkaldEngine::new(pipeline);

    let result = engine.run().await;
    std::env::remove_var("TTS_BIN");

    (temp_dir, result)
}

// 兩個情境共用 TTS_BIN 環境變數，必須在同一個測試裡依序執行
#[tokio::test]
async fn test_local_backend_with_fake_engines() {
    // 成功情境：假引擎把固定位元組寫到 --out_path
    let script_dir = TempDir::new().unwrap();
    let fake_tts = write_fake_tts_script(&script_dir);
    let (temp_dir, result) = run_with_tts_bin(&fake_tts).await;

    let output_file = result.unwrap();
    assert!(output_file.ends_with("skaldic_weather.wav"));
    let written = std::fs::read(temp_dir.path().join("skaldic_weather.wav")).unwrap();
    assert_eq!(written, b"RIFFfakewav");

    // 失敗情境：引擎以非零狀態結束，stderr 要進到錯誤訊息
    let broken_tts = write_broken_tts_script(&script_dir);
    let (temp_dir, result) = run_with_tts_bin(&broken_tts).await;

    match result.unwrap_err() {
        SkaldError::TtsEngineError { message, .. } => {
            assert!(message.contains("model load failed"));
        }
        other => panic!("Expected TtsEngineError, got {:?}", other),
    }
    assert!(!temp_dir.path().join("skaldic_weather.wav").exists());
}
