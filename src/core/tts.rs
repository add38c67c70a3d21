//! Local text-to-speech engine.
//!
//! Runs a locally installed Coqui-style `tts` CLI with an XTTS voice-cloning
//! model, conditioned on a user-supplied speaker wav. The binary is located
//! via the `TTS_BIN` environment variable or a PATH walk.
//!
//! Env overrides:
//! - TTS_BIN: path to the tts binary
//! - TTS_MODEL: model name (default XTTS v2)
//! - TTS_TIMEOUT_MS: synthesis timeout in milliseconds

use crate::utils::error::{Result, SkaldError};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tokio::task;
use tokio::time::{timeout, Duration};

const DEFAULT_MODEL: &str = "tts_models/multilingual/multi-dataset/xtts_v2";
const DEFAULT_BIN: &str = "tts";
const DEFAULT_TIMEOUT_MS: u64 = 300_000;

pub struct LocalTtsEngine {
    bin: PathBuf,
    model: String,
    timeout_ms: u64,
}

fn binary_from_env_or_path(env_key: &str, default_bin: &str) -> Option<PathBuf> {
    if let Ok(p) = std::env::var(env_key) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
    }
    binary_from_path(default_bin)
}

fn binary_from_path(bin: &str) -> Option<PathBuf> {
    // If a path-like string is provided, respect it directly
    if bin.contains(std::path::MAIN_SEPARATOR) {
        let p = PathBuf::from(bin);
        return if p.exists() { Some(p) } else { None };
    }

    // Search PATH portably
    if let Some(paths_os) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths_os) {
            let candidate = dir.join(bin);
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }
    None
}

fn build_args(model: &str, text: &str, speaker_wav: &str, language: &str, out_path: &Path) -> Vec<String> {
    vec![
        "--model_name".to_string(),
        model.to_string(),
        "--text".to_string(),
        text.to_string(),
        "--speaker_wav".to_string(),
        speaker_wav.to_string(),
        "--language_idx".to_string(),
        language.to_string(),
        "--out_path".to_string(),
        out_path.to_string_lossy().to_string(),
    ]
}

impl LocalTtsEngine {
    /// 偵測本機安裝的 tts CLI
    pub fn detect() -> Result<Self> {
        let bin = binary_from_env_or_path("TTS_BIN", DEFAULT_BIN).ok_or_else(|| {
            SkaldError::TtsEngineError {
                engine: DEFAULT_BIN.to_string(),
                message: "Binary not found via TTS_BIN or PATH".to_string(),
            }
        })?;

        let model = std::env::var("TTS_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_ms = std::env::var("TTS_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        tracing::info!("Detected TTS binary at {:?}", bin);
        Ok(Self {
            bin,
            model,
            timeout_ms,
        })
    }

    /// Synthesizes `text` into `out_path` as wav, cloning the voice found in
    /// `speaker_wav`. Runs the CLI in a blocking task under a timeout since
    /// XTTS synthesis can take minutes on CPU.
    pub async fn synthesize_to_file(
        &self,
        text: &str,
        speaker_wav: &str,
        language: &str,
        out_path: &Path,
    ) -> Result<()> {
        if !Path::new(speaker_wav).exists() {
            return Err(SkaldError::InvalidConfigValueError {
                field: "speech.speaker_wav".to_string(),
                value: speaker_wav.to_string(),
                reason: "Speaker voice file does not exist".to_string(),
            });
        }

        let bin = self.bin.clone();
        let args = build_args(&self.model, text, speaker_wav, language, out_path);
        tracing::debug!("Running {:?} with {} args", bin, args.len());

        let join = task::spawn_blocking(move || {
            Command::new(&bin)
                .args(&args)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
        });

        let output = match timeout(Duration::from_millis(self.timeout_ms), join).await {
            Ok(join_result) => join_result
                .map_err(|e| SkaldError::TtsEngineError {
                    engine: DEFAULT_BIN.to_string(),
                    message: format!("Synthesis task failed: {}", e),
                })?
                .map_err(SkaldError::IoError)?,
            Err(_) => {
                return Err(SkaldError::TtsEngineError {
                    engine: DEFAULT_BIN.to_string(),
                    message: format!("Synthesis timed out after {}ms", self.timeout_ms),
                });
            }
        };

        if !output.status.success() {
            return Err(SkaldError::TtsEngineError {
                engine: DEFAULT_BIN.to_string(),
                message: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(())
    }
}
