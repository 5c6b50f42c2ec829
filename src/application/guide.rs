//! Plain-text rendering of the stored crop, pest and weather guides.

use crate::domain::error::KrishiError;
use crate::domain::model::{CropFilter, CropGuide, PestFilter, PestInfo, WeatherTip};
use crate::domain::traits::FarmGuideStore;

/// A structured guide request, as typed by a farmer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideLookup {
    Crop(String),
    Pest(String),
    Weather(Option<String>),
}

impl GuideLookup {
    /// Parses "crop rice", "pest aphids", "weather" or "weather drought".
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (command, rest) = match text.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (text, ""),
        };

        match command.to_lowercase().as_str() {
            "crop" if !rest.is_empty() => Some(Self::Crop(rest.to_string())),
            "pest" if !rest.is_empty() => Some(Self::Pest(rest.to_string())),
            "weather" if rest.is_empty() => Some(Self::Weather(None)),
            "weather" => Some(Self::Weather(Some(rest.to_string()))),
            _ => None,
        }
    }
}

fn push_line(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
        out.push_str(&format!("\n{}: {}", label, value));
    }
}

pub fn format_crop(guide: &CropGuide) -> String {
    let mut out = format!("🌾 {}", guide.crop_name);
    let place: Vec<&str> = [guide.season.as_deref(), guide.location.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !place.is_empty() {
        out.push_str(&format!(" ({})", place.join(", ")));
    }
    push_line(&mut out, "Soil", &guide.soil_type);
    push_line(&mut out, "Planting", &guide.planting_time);
    push_line(&mut out, "Harvest", &guide.harvesting_time);
    push_line(&mut out, "Water", &guide.water_requirements);
    push_line(&mut out, "Fertilizer", &guide.fertilizer_needs);
    push_line(&mut out, "Varieties", &guide.common_varieties);
    push_line(&mut out, "Notes", &guide.special_notes);
    out
}

pub fn format_pest(pest: &PestInfo) -> String {
    let mut out = format!("🐛 {}", pest.pest_name);
    if let Some(severity) = pest.severity.as_deref() {
        out.push_str(&format!(" [{}]", severity));
    }
    push_line(&mut out, "Crops", &pest.affected_crops);
    push_line(&mut out, "Symptoms", &pest.symptoms);
    push_line(&mut out, "Organic", &pest.organic_control);
    push_line(&mut out, "Chemical", &pest.chemical_control);
    push_line(&mut out, "Prevention", &pest.prevention);
    out
}

pub fn format_weather_tip(tip: &WeatherTip) -> String {
    let mut out = format!("🌦️ {}", tip.weather_condition);
    push_line(&mut out, "Impact", &tip.crop_impact);
    push_line(&mut out, "Actions", &tip.recommended_actions);
    push_line(&mut out, "Protection", &tip.protection_measures);
    push_line(&mut out, "Timing", &tip.timing_considerations);
    out
}

fn join<T>(items: &[T], render: fn(&T) -> String) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(items.iter().map(render).collect::<Vec<_>>().join("\n\n"))
}

/// Rendered guide text, or `None` when nothing matches.
pub async fn lookup(
    store: &dyn FarmGuideStore,
    request: &GuideLookup,
) -> Result<Option<String>, KrishiError> {
    let text = match request {
        GuideLookup::Crop(name) => {
            let filter = CropFilter {
                crop_name: Some(name.clone()),
                ..CropFilter::default()
            };
            join(&store.crop_guidance(&filter).await?, format_crop)
        }
        GuideLookup::Pest(name) => {
            let filter = PestFilter {
                pest_name: Some(name.clone()),
                ..PestFilter::default()
            };
            join(&store.pest_info(&filter).await?, format_pest)
        }
        GuideLookup::Weather(condition) => join(
            &store.weather_tips(condition.as_deref()).await?,
            format_weather_tip,
        ),
    };

    tracing::debug!("Guide lookup {:?} matched: {}", request, text.is_some());
    Ok(text)
}
