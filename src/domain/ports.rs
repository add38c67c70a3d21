use crate::config::{PoemConfig, SpeechConfig, WeatherConfig};
use crate::domain::model::{Forecast, Poem};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn weather(&self) -> &WeatherConfig;
    fn poem(&self) -> &PoemConfig;
    fn speech(&self) -> &SpeechConfig;
    fn output_path(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn fetch(&self) -> Result<Forecast>;
    async fn compose(&self, forecast: Forecast) -> Result<Poem>;
    async fn speak(&self, poem: Poem) -> Result<String>;
}
