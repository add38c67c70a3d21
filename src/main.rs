use clap::Parser;
use weather_skald::config::{SpeechBackend, SpeechConfig};
use weather_skald::config::toml_config::{ResolvedConfig, TomlConfig};
use weather_skald::core::tts::LocalTtsEngine;
use weather_skald::utils::logger;
use weather_skald::{LocalStorage, SkaldEngine, SkaldPipeline};

#[derive(Parser)]
#[command(name = "weather-skald")]
#[command(about = "Reads the weather forecast as a poem in the voice of a Viking skald")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "weatherskald.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override speech backend from config (openai, local, off)
    #[arg(long)]
    speech: Option<SpeechBackend>,

    /// Dry run - show what would happen without calling any API
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🎶 Starting WeatherSkald");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(backend) = args.speech {
        let mut speech = config.speech_config();
        speech.backend = backend;
        config.speech = Some(speech);
        tracing::info!("🔧 Speech backend overridden to: {}", backend);
    }

    // 驗證配置
    let resolved = match ResolvedConfig::from_toml(&config) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No API will be called");
        perform_dry_run(&config);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 創建存儲和管道
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = match SkaldPipeline::new(storage, resolved) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 創建引擎並運行
    let engine = SkaldEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ WeatherSkald completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ WeatherSkald completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ WeatherSkald failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                weather_skald::utils::error::ErrorSeverity::Low => 0,
                weather_skald::utils::error::ErrorSeverity::Medium => 2, // 網路錯誤
                weather_skald::utils::error::ErrorSeverity::High => 1,   // 處理錯誤
                weather_skald::utils::error::ErrorSeverity::Critical => 3, // 系統錯誤
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Skald: {} v{}",
        config.skald.name, config.skald.version
    );
    println!(
        "  Station: {} ({})",
        config.weather.station_id, config.weather.endpoint
    );
    println!(
        "  Forecast: {} days, temps in {}",
        config.weather.forecast_days,
        config.weather.units_temp.to_uppercase()
    );
    println!("  Poem: {} as {}", config.poem.model, config.poem.style);

    let speech = config.speech_config();
    println!("  Speech: {}", speech.backend);
    println!("  Output: {}", config.output_path());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    // 天氣站分析
    println!("🌤️ Weather Station:");
    println!("  Endpoint: {}", config.weather.endpoint);
    println!("  Station id: {}", config.weather.station_id);
    println!(
        "  Units: temp={}, wind={}, pressure={}, precip={}, distance={}",
        config.weather.units_temp,
        config.weather.units_wind,
        config.weather.units_pressure,
        config.weather.units_precip,
        config.weather.units_distance
    );

    // 提示詞分析
    println!();
    println!("📜 Poem Generation:");
    println!("  Model: {}", config.poem.model);
    println!("  Style: {}", config.poem.style);
    println!(
        "  Prompt template: {}",
        weather_skald::core::poem::build_prompt(&config.poem.style, "<forecast summary>")
    );

    // 語音後端分析
    println!();
    println!("🗣️ Speech Output:");
    let speech = config.speech_config();
    describe_speech_backend(&speech);

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}

fn describe_speech_backend(speech: &SpeechConfig) {
    match speech.backend {
        SpeechBackend::Openai => {
            println!("  Backend: openai ({} / voice {})", speech.model, speech.voice);
            println!("  Will write: {}.mp3", speech.output_name);
        }
        SpeechBackend::Local => {
            println!("  Backend: local TTS CLI");
            match LocalTtsEngine::detect() {
                Ok(_) => println!("  ✅ Local tts binary found"),
                Err(e) => println!("  ⚠️ {}", e),
            }
            if let Some(speaker_wav) = &speech.speaker_wav {
                let exists = std::path::Path::new(speaker_wav).exists();
                println!(
                    "  Speaker wav: {} ({})",
                    speaker_wav,
                    if exists { "found" } else { "missing" }
                );
            }
            println!("  Will write: {}.wav", speech.output_name);
        }
        SpeechBackend::Off => {
            println!("  Backend: off (poem text only)");
            println!("  Will write: {}.txt", speech.output_name);
        }
    }
}
