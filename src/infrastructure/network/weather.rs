use crate::application::weather::{ForecastEntry, WeatherSnapshot};
use crate::domain::error::KrishiError;
use crate::infrastructure::config::WeatherConfig;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// OpenWeatherMap response structures

#[derive(Deserialize, Debug)]
struct MainBlock {
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    temp_min: f64,
    #[serde(default)]
    temp_max: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Deserialize, Debug)]
struct ConditionBlock {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize, Debug, Default)]
struct WindBlock {
    #[serde(default)]
    speed: f64,
}

#[derive(Deserialize, Debug, Default)]
struct RainBlock {
    #[serde(rename = "3h", default)]
    three_hours: f64,
}

#[derive(Deserialize, Debug)]
struct CurrentResponse {
    main: MainBlock,
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    wind: WindBlock,
}

#[derive(Deserialize, Debug)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastItem>,
}

#[derive(Deserialize, Debug)]
struct ForecastItem {
    dt_txt: String,
    main: MainBlock,
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    rain: RainBlock,
}

/// OpenWeatherMap client
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(client: Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        }
    }

    /// True when a non-blank API key was configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        lat: f64,
        lon: f64,
    ) -> Result<T, KrishiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| KrishiError::Config("Weather API key not configured".to_string()))?;

        let lat = lat.to_string();
        let lon = lon.to_string();
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(KrishiError::Api(format!(
                "Weather API returned HTTP {}",
                status.as_u16()
            )));
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn current(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, KrishiError> {
        let data: CurrentResponse = self.fetch("weather", lat, lon).await?;
        let condition = data
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| KrishiError::Api("Weather response has no conditions".to_string()))?;

        Ok(WeatherSnapshot {
            temperature: data.main.temp,
            humidity: data.main.humidity,
            condition: condition.main,
            description: condition.description,
            wind_speed: data.wind.speed,
        })
    }

    pub async fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastEntry>, KrishiError> {
        let data: ForecastResponse = self.fetch("forecast", lat, lon).await?;

        Ok(data
            .list
            .into_iter()
            .map(|item| ForecastEntry {
                dt_txt: item.dt_txt,
                temp_min: item.main.temp_min,
                temp_max: item.main.temp_max,
                humidity: item.main.humidity,
                condition: item
                    .weather
                    .into_iter()
                    .next()
                    .map(|c| c.main)
                    .unwrap_or_default(),
                rain_3h: item.rain.three_hours,
            })
            .collect())
    }
}
