use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::UtcDateTime;

/// Fixed-schema row produced by a dataset normalizer.
pub trait Record: Serialize {
    /// Column names in output order. The last column is always `fetched_at`.
    const COLUMNS: &'static [&'static str];

    /// Cell values in [`Record::COLUMNS`] order; absent fields are `Value::Null`.
    fn values(&self) -> Vec<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Self::COLUMNS
                .iter()
                .map(|column| map.get(*column).cloned().unwrap_or(Value::Null))
                .collect(),
            _ => vec![Value::Null; Self::COLUMNS.len()],
        }
    }
}

/// One game from `/games`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: Option<i64>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_points: Option<i64>,
    pub away_points: Option<i64>,
    pub week: Option<i64>,
    pub season: Option<i64>,
    pub fetched_at: UtcDateTime,
}

impl Record for GameRecord {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "home_team",
        "away_team",
        "home_points",
        "away_points",
        "week",
        "season",
        "fetched_at",
    ];
}

/// One team rating from `/ratings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub team: Option<String>,
    pub conference: Option<String>,
    pub rating_type: Option<String>,
    pub rating_value: Option<f64>,
    pub fetched_at: UtcDateTime,
}

impl Record for RatingRecord {
    const COLUMNS: &'static [&'static str] = &[
        "team",
        "conference",
        "rating_type",
        "rating_value",
        "fetched_at",
    ];
}

/// One provider's betting line for one game, flattened out of `/lines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub game_id: Option<i64>,
    pub provider: Option<String>,
    pub spread: Option<f64>,
    pub over_under: Option<f64>,
    pub fetched_at: UtcDateTime,
}

impl Record for LineRecord {
    const COLUMNS: &'static [&'static str] =
        &["game_id", "provider", "spread", "over_under", "fetched_at"];
}

/// Team recruiting class from `/recruiting/teams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruitingRecord {
    pub team: Option<String>,
    pub rank: Option<i64>,
    pub points: Option<f64>,
    pub avg_rating: Option<f64>,
    pub fetched_at: UtcDateTime,
}

impl Record for RecruitingRecord {
    const COLUMNS: &'static [&'static str] =
        &["team", "rank", "points", "avg_rating", "fetched_at"];
}

/// Game-day weather from `/game/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub game_id: Option<i64>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub temperature: Option<f64>,
    pub temperature_high: Option<f64>,
    pub temperature_low: Option<f64>,
    pub wind_speed: Option<f64>,
    pub weather_condition: Option<String>,
    pub fetched_at: UtcDateTime,
}

impl Record for WeatherRecord {
    const COLUMNS: &'static [&'static str] = &[
        "game_id",
        "home_team",
        "away_team",
        "temperature",
        "temperature_high",
        "temperature_low",
        "wind_speed",
        "weather_condition",
        "fetched_at",
    ];
}

/// Broadcast outlets for one game from `/game/media`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub game_id: Option<i64>,
    pub tv: Option<String>,
    pub radio: Option<String>,
    pub satellite: Option<String>,
    pub internet: Option<String>,
    pub fetched_at: UtcDateTime,
}

impl Record for MediaRecord {
    const COLUMNS: &'static [&'static str] =
        &["game_id", "tv", "radio", "satellite", "internet", "fetched_at"];
}

/// Model prediction for one side of a matchup from `/ratings/predicted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedPointsRecord {
    pub team: Option<String>,
    pub opponent: Option<String>,
    pub predicted_margin: Option<f64>,
    pub win_probability: Option<f64>,
    pub is_home: Option<bool>,
    pub fetched_at: UtcDateTime,
}

impl Record for PredictedPointsRecord {
    const COLUMNS: &'static [&'static str] = &[
        "team",
        "opponent",
        "predicted_margin",
        "win_probability",
        "is_home",
        "fetched_at",
    ];
}
