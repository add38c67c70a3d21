use crate::config::WeatherConfig;
use crate::domain::model::{CurrentConditions, DailyOutlook, Forecast};
use crate::utils::error::{Result, SkaldError};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Client for the WeatherFlow `better_forecast` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    config: WeatherConfig,
}

#[derive(Debug, Deserialize)]
struct BetterForecastResponse {
    current_conditions: CurrentConditionsPayload,
    forecast: ForecastPayload,
}

#[derive(Debug, Deserialize)]
struct CurrentConditionsPayload {
    air_temperature: f64,
    feels_like: f64,
    relative_humidity: i64,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    daily: Vec<DailyPayload>,
}

#[derive(Debug, Deserialize)]
struct DailyPayload {
    month_num: u32,
    day_num: u32,
    conditions: String,
    air_temp_high: f64,
    air_temp_low: f64,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let timeout = config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// 取得目前觀測與未來數日的預報
    pub async fn fetch_forecast(&self) -> Result<Forecast> {
        tracing::debug!(
            "Requesting forecast for station {} from {}",
            self.config.station_id,
            self.config.endpoint
        );

        let response = self
            .client
            .get(&self.config.endpoint)
            .header("accept", "application/json")
            .query(&[
                ("station_id", self.config.station_id.to_string()),
                ("units_temp", self.config.units_temp.clone()),
                ("units_wind", self.config.units_wind.clone()),
                ("units_pressure", self.config.units_pressure.clone()),
                ("units_precip", self.config.units_precip.clone()),
                ("units_distance", self.config.units_distance.clone()),
                ("token", self.config.token.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Weather API response status: {}", status);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SkaldError::WeatherApiError {
                status: status.as_u16(),
                message,
            });
        }

        let payload: BetterForecastResponse = response.json().await?;

        // 只保留設定的天數
        let daily = payload
            .forecast
            .daily
            .into_iter()
            .take(self.config.forecast_days)
            .map(|day| DailyOutlook {
                month_num: day.month_num,
                day_num: day.day_num,
                conditions: day.conditions,
                air_temp_high: day.air_temp_high,
                air_temp_low: day.air_temp_low,
            })
            .collect();

        Ok(Forecast {
            current: CurrentConditions {
                air_temperature: payload.current_conditions.air_temperature,
                feels_like: payload.current_conditions.feels_like,
                relative_humidity: payload.current_conditions.relative_humidity,
            },
            daily,
            units_temp: self.config.units_temp.clone(),
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn test_config(endpoint: String) -> WeatherConfig {
        WeatherConfig {
            endpoint,
            token: "wf-test-token".to_string(),
            station_id: 67295,
            units_temp: "f".to_string(),
            units_wind: "mph".to_string(),
            units_pressure: "mmhg".to_string(),
            units_precip: "in".to_string(),
            units_distance: "mi".to_string(),
            forecast_days: 2,
            timeout_seconds: Some(5),
        }
    }

    fn mock_forecast_body(days: usize) -> serde_json::Value {
        let daily: Vec<serde_json::Value> = (0..days)
            .map(|i| {
                serde_json::json!({
                    "month_num": 8,
                    "day_num": 30 + i,
                    "conditions": "Clear",
                    "air_temp_high": 80.0 + i as f64,
                    "air_temp_low": 60.0,
                    "precip_probability": 10
                })
            })
            .collect();

        serde_json::json!({
            "current_conditions": {
                "air_temperature": 71.0,
                "feels_like": 73.5,
                "relative_humidity": 48,
                "wind_avg": 4.0
            },
            "forecast": { "daily": daily }
        })
    }

    #[tokio::test]
    async fn test_fetch_forecast_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/better_forecast")
                .query_param("station_id", "67295")
                .query_param("units_temp", "f")
                .query_param("token", "wf-test-token");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(mock_forecast_body(2));
        });

        let client = WeatherClient::new(&test_config(server.url("/better_forecast"))).unwrap();
        let forecast = client.fetch_forecast().await.unwrap();

        api_mock.assert();
        assert_eq!(forecast.current.air_temperature, 71.0);
        assert_eq!(forecast.current.relative_humidity, 48);
        assert_eq!(forecast.daily.len(), 2);
        assert_eq!(forecast.daily[0].conditions, "Clear");
        assert_eq!(forecast.units_temp, "f");
    }

    #[tokio::test]
    async fn test_fetch_forecast_truncates_to_configured_days() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/better_forecast");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(mock_forecast_body(10));
        });

        let client = WeatherClient::new(&test_config(server.url("/better_forecast"))).unwrap();
        let forecast = client.fetch_forecast().await.unwrap();

        assert_eq!(forecast.daily.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_forecast_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/better_forecast");
            then.status(401).body("invalid token");
        });

        let client = WeatherClient::new(&test_config(server.url("/better_forecast"))).unwrap();
        let err = client.fetch_forecast().await.unwrap_err();

        match err {
            SkaldError::WeatherApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid token");
            }
            other => panic!("Expected WeatherApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_forecast_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/better_forecast");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"unexpected": true}));
        });

        let client = WeatherClient::new(&test_config(server.url("/better_forecast"))).unwrap();
        assert!(client.fetch_forecast().await.is_err());
    }
}
