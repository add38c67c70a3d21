use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives the three pipeline stages sequentially: fetch the forecast, compose
/// the poem, render the speech artifact.
pub struct SkaldEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> SkaldEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🌤️ Fetching forecast...");
        let forecast = self.pipeline.fetch().await?;
        tracing::info!("🌤️ Forecast covers {} days", forecast.daily.len());
        self.monitor.log_stage("Fetch");

        tracing::info!("📜 Composing poem...");
        let poem = self.pipeline.compose(forecast).await?;
        tracing::info!(
            "📜 Received {} characters from {}",
            poem.text.len(),
            poem.model
        );
        self.monitor.log_stage("Compose");

        tracing::info!("🗣️ Rendering output...");
        let output_path = self.pipeline.speak(poem).await?;
        self.monitor.log_stage("Speak");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
