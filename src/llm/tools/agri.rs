//! Agricultural data lookups backing the model's tools.

use chrono::Local;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::ToolError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketPrice {
    pub crop: String,
    pub location: String,
    pub price: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    pub trend: PriceTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropCalendar {
    pub crop: String,
    pub planting_season: String,
    pub harvesting_season: String,
    pub key_activities: Vec<String>,
}

/// Source of the data the tools report. Field shapes are part of the prompt
/// contract and must stay as they are.
pub trait AgriDataSource: Send + Sync {
    fn weather(&self, location: &str) -> Result<WeatherReport, ToolError>;

    fn market_prices(&self, crop: &str, location: &str) -> Result<MarketPrice, ToolError>;

    fn crop_calendar(&self, crop: &str) -> Result<CropCalendar, ToolError>;
}

const CONDITIONS: [&str; 3] = ["Sunny", "Partly Cloudy", "Chance of Rain"];

/// Placeholder data: plausible shapes, random values.
// TODO: replace with a real feed (IMD district forecasts, Agmarknet mandi prices)
#[derive(Debug, Default, Clone, Copy)]
pub struct MockAgriData;

impl AgriDataSource for MockAgriData {
    fn weather(&self, location: &str) -> Result<WeatherReport, ToolError> {
        let mut rng = rand::thread_rng();
        let condition = CONDITIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(CONDITIONS[0]);

        Ok(WeatherReport {
            location: location.to_string(),
            temperature: format!("{:.1}°C", rng.gen_range(25.0..35.0)),
            condition: condition.to_string(),
            humidity: format!("{}%", rng.gen_range(50..90)),
        })
    }

    fn market_prices(&self, crop: &str, location: &str) -> Result<MarketPrice, ToolError> {
        let mut rng = rand::thread_rng();
        let trend = if rng.gen_bool(0.5) {
            PriceTrend::Up
        } else {
            PriceTrend::Down
        };

        Ok(MarketPrice {
            crop: crop.to_string(),
            location: location.to_string(),
            price: format!("₹{:.2} per quintal", rng.gen_range(2000.0..2500.0)),
            last_updated: Local::now().format("%-m/%-d/%Y").to_string(),
            trend,
        })
    }

    fn crop_calendar(&self, crop: &str) -> Result<CropCalendar, ToolError> {
        Ok(CropCalendar {
            crop: crop.to_string(),
            planting_season: "June - July (Kharif)".to_string(),
            harvesting_season: "October - November".to_string(),
            key_activities: vec![
                "Seed treatment before sowing.".to_string(),
                "Weeding required after 20-25 days.".to_string(),
                "Requires moderate irrigation during dry spells.".to_string(),
            ],
        })
    }
}
