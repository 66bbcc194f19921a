use serde_json::Value;

use super::fields::{objects, Field, Row};
use super::{season_params, Dataset};
use crate::{ApiError, Client, UtcDateTime, WeatherRecord};

const GAME_ID: Field = Field::required("game_id", &["gameId", "id", "game_id"]);
const HOME_TEAM: Field = Field::required("home_team", &["homeTeam", "home_team"]);
const AWAY_TEAM: Field = Field::required("away_team", &["awayTeam", "away_team"]);
const TEMPERATURE: Field = Field::optional("temperature", &["temperature"]);
const TEMPERATURE_HIGH: Field = Field::optional(
    "temperature_high",
    &["temperatureHigh", "temperature_high"],
);
const TEMPERATURE_LOW: Field = Field::optional(
    "temperature_low",
    &["temperatureLow", "temperature_low"],
);
const WIND_SPEED: Field = Field::optional("wind_speed", &["windSpeed", "wind_speed"]);
const CONDITION: Field = Field::optional(
    "weather_condition",
    &["condition", "weatherCondition", "weather_condition"],
);

pub fn fetch_weather(
    client: &Client,
    year: u32,
    week: Option<u32>,
) -> Result<Vec<WeatherRecord>, ApiError> {
    let payload = client.request(Dataset::Weather.endpoint(), &season_params(year, week))?;
    normalize_weather(&payload, client.clock().wall_time())
}

pub fn normalize_weather(
    payload: &Value,
    fetched_at: UtcDateTime,
) -> Result<Vec<WeatherRecord>, ApiError> {
    Ok(objects(Dataset::Weather, payload)?
        .into_iter()
        .map(|object| {
            let row = Row::new(Dataset::Weather, object);
            WeatherRecord {
                game_id: row.int(&GAME_ID),
                home_team: row.team(&HOME_TEAM),
                away_team: row.team(&AWAY_TEAM),
                temperature: row.float(&TEMPERATURE),
                temperature_high: row.float(&TEMPERATURE_HIGH),
                temperature_low: row.float(&TEMPERATURE_LOW),
                wind_speed: row.float(&WIND_SPEED),
                weather_condition: row.string(&CONDITION),
                fetched_at,
            }
        })
        .collect())
}
