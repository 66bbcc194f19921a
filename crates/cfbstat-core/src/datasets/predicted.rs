use serde_json::Value;

use super::fields::{objects, Field, Row};
use super::{season_params, Dataset};
use crate::{ApiError, Client, PredictedPointsRecord, UtcDateTime};

const TEAM: Field = Field::required("team", &["team"]);
const OPPONENT: Field = Field::required("opponent", &["opponent"]);
const PREDICTED_MARGIN: Field = Field::optional(
    "predicted_margin",
    &["predictedMargin", "predicted_margin"],
);
const WIN_PROBABILITY: Field = Field::optional(
    "win_probability",
    &["winProbability", "win_probability"],
);
const IS_HOME: Field = Field::optional("is_home", &["isHome", "is_home"]);

pub fn fetch_predicted_points(
    client: &Client,
    year: u32,
    week: Option<u32>,
) -> Result<Vec<PredictedPointsRecord>, ApiError> {
    let payload = client.request(Dataset::PredictedPoints.endpoint(), &season_params(year, week))?;
    normalize_predicted_points(&payload, client.clock().wall_time())
}

pub fn normalize_predicted_points(
    payload: &Value,
    fetched_at: UtcDateTime,
) -> Result<Vec<PredictedPointsRecord>, ApiError> {
    Ok(objects(Dataset::PredictedPoints, payload)?
        .into_iter()
        .map(|object| {
            let row = Row::new(Dataset::PredictedPoints, object);
            PredictedPointsRecord {
                team: row.team(&TEAM),
                opponent: row.team(&OPPONENT),
                predicted_margin: row.float(&PREDICTED_MARGIN),
                win_probability: row.float(&WIN_PROBABILITY),
                is_home: row.boolean(&IS_HOME),
                fetched_at,
            }
        })
        .collect())
}
