use crate::config::SpeechBackend;
use crate::core::poem::PoemComposer;
use crate::core::speech::SpeechSynthesizer;
use crate::core::tts::LocalTtsEngine;
use crate::core::weather::WeatherClient;
use crate::core::{ConfigProvider, Forecast, Pipeline, Poem, Storage};
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;

/// The WeatherSkald pipeline: fetch a forecast, compose a poem, render it as
/// speech (or plain text) through the storage port.
pub struct SkaldPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    weather: WeatherClient,
    composer: PoemComposer,
}

impl<S: Storage, C: ConfigProvider> SkaldPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let weather = WeatherClient::new(config.weather())?;
        let composer = PoemComposer::new(config.poem())?;

        Ok(Self {
            storage,
            config,
            weather,
            composer,
        })
    }

    fn output_file(&self, extension: &str) -> String {
        format!("{}.{}", self.config.speech().output_name, extension)
    }

    fn full_output_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.config.output_path(), file_name)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SkaldPipeline<S, C> {
    async fn fetch(&self) -> Result<Forecast> {
        let forecast = self.weather.fetch_forecast().await?;
        tracing::debug!("Forecast summary: {}", forecast.summary());
        Ok(forecast)
    }

    async fn compose(&self, forecast: Forecast) -> Result<Poem> {
        self.composer.compose(&forecast).await
    }

    async fn speak(&self, poem: Poem) -> Result<String> {
        let speech = self.config.speech();

        match speech.backend {
            SpeechBackend::Off => {
                // 不合成語音，只保存詩文
                let file_name = self.output_file("txt");
                self.storage
                    .write_file(&file_name, poem.text.as_bytes())
                    .await?;
                Ok(self.full_output_path(&file_name))
            }
            SpeechBackend::Openai => {
                let synthesizer = SpeechSynthesizer::new(self.config.poem(), speech)?;
                let audio = synthesizer.synthesize(&poem.text).await?;

                let file_name = self.output_file("mp3");
                self.storage.write_file(&file_name, &audio).await?;
                Ok(self.full_output_path(&file_name))
            }
            SpeechBackend::Local => {
                let speaker_wav =
                    validate_required_field("speech.speaker_wav", &speech.speaker_wav)?;
                let engine = LocalTtsEngine::detect()?;

                // CLI 只能寫到磁碟路徑，先經過暫存檔再回到 storage
                let scratch = std::env::temp_dir()
                    .join(format!("weather_skald_{}.wav", std::process::id()));
                engine
                    .synthesize_to_file(&poem.text, speaker_wav, &speech.language, &scratch)
                    .await?;

                let audio = std::fs::read(&scratch)?;
                let _ = std::fs::remove_file(&scratch);

                let file_name = self.output_file("wav");
                self.storage.write_file(&file_name, &audio).await?;
                Ok(self.full_output_path(&file_name))
            }
        }
    }
}
