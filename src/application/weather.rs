use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FAVORABLE: &str =
    "Weather conditions are generally favorable for most crops. No special actions needed at this time.";

/// Current conditions, metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub humidity: f64,
    /// Short condition group, e.g. "Rain", "Clear"
    pub condition: String,
    pub description: String,
    /// m/s
    pub wind_speed: f64,
}

/// One 3-hourly forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// "YYYY-MM-DD HH:MM:SS"
    pub dt_txt: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    pub condition: String,
    pub rain_3h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    pub rain: f64,
    /// condition -> number of slots reporting it
    pub conditions: BTreeMap<String, u32>,
}

/// Farming advice for the current conditions.
pub fn recommendations(weather: &WeatherSnapshot) -> Vec<String> {
    let temp = weather.temperature;
    let condition = weather.condition.to_lowercase();
    let mut advice = Vec::new();

    if temp > 35.0 {
        advice.push(
            "High temperature warning: Consider irrigating in the evening to reduce water loss."
                .to_string(),
        );
    } else if temp < 10.0 {
        advice.push("Low temperature alert: Protect sensitive crops from frost.".to_string());
    }

    if condition.contains("rain") {
        advice.push("Rain expected: Delay fertilizer application to prevent runoff.".to_string());
    } else if condition.contains("clear") && temp > 30.0 {
        advice.push(
            "Hot and clear: Ensure adequate irrigation and consider shade for sensitive crops."
                .to_string(),
        );
    }

    if weather.wind_speed > 15.0 {
        advice.push(format!(
            "High winds ({} m/s): Protect young plants and secure greenhouses.",
            weather.wind_speed
        ));
    }

    if weather.humidity > 80.0 {
        advice.push(
            "High humidity: Watch for fungal diseases. Consider applying fungicide if needed."
                .to_string(),
        );
    } else if weather.humidity < 30.0 {
        advice.push(
            "Low humidity: Increase irrigation frequency to prevent water stress.".to_string(),
        );
    }

    advice
}

/// Recommendations joined one per line, or the favorable-conditions note.
pub fn recommendation_text(weather: &WeatherSnapshot) -> String {
    let advice = recommendations(weather);
    if advice.is_empty() {
        FAVORABLE.to_string()
    } else {
        advice.join("\n")
    }
}

/// Fold 3-hourly slots into one summary per calendar day, sorted by date.
///
/// Humidity and rain come from the first slot of each day.
pub fn aggregate_forecast(entries: &[ForecastEntry]) -> Vec<DailyForecast> {
    let mut days: BTreeMap<String, DailyForecast> = BTreeMap::new();

    for entry in entries {
        let date = entry
            .dt_txt
            .split_whitespace()
            .next()
            .unwrap_or(&entry.dt_txt)
            .to_string();

        let day = days.entry(date.clone()).or_insert_with(|| DailyForecast {
            date,
            temp_min: entry.temp_min,
            temp_max: entry.temp_max,
            humidity: entry.humidity,
            rain: entry.rain_3h,
            conditions: BTreeMap::new(),
        });

        day.temp_min = day.temp_min.min(entry.temp_min);
        day.temp_max = day.temp_max.max(entry.temp_max);
        *day.conditions.entry(entry.condition.clone()).or_insert(0) += 1;
    }

    days.into_values().collect()
}
