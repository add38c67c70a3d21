use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 天氣站回報的即時觀測
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub air_temperature: f64,
    pub feels_like: f64,
    pub relative_humidity: i64,
}

/// 單日預報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyOutlook {
    pub month_num: u32,
    pub day_num: u32,
    pub conditions: String,
    pub air_temp_high: f64,
    pub air_temp_low: f64,
}

/// Forecast as fetched from the station, plus the unit label used when
/// rendering it into prompt text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub current: CurrentConditions,
    pub daily: Vec<DailyOutlook>,
    pub units_temp: String,
    pub fetched_at: DateTime<Utc>,
}

impl Forecast {
    /// 溫度單位字母 (f -> F, c -> C)
    pub fn temp_label(&self) -> String {
        self.units_temp.to_uppercase()
    }

    /// Renders the forecast as the compact prose line fed to the language
    /// model: current conditions first, then one entry per forecast day.
    pub fn summary(&self) -> String {
        let label = self.temp_label();
        let mut parts = vec![format!(
            "Air-Temp {}{} (feels like {}{}). {}% humidity",
            self.current.air_temperature,
            label,
            self.current.feels_like,
            label,
            self.current.relative_humidity
        )];

        for day in &self.daily {
            parts.push(format!(
                "{}/{}: {}, {}/{}{}",
                day.month_num,
                day.day_num,
                day.conditions,
                day.air_temp_high,
                day.air_temp_low,
                label
            ));
        }

        parts.join(" ")
    }
}

/// The generated skaldic poem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poem {
    pub text: String,
    pub model: String,
}
