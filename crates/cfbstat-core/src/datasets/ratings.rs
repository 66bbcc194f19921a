use serde_json::Value;

use super::fields::{objects, Field, Row};
use super::{season_params, Dataset};
use crate::{ApiError, Client, RatingRecord, UtcDateTime};

const TEAM: Field = Field::required("team", &["team"]);
const CONFERENCE: Field = Field::optional("conference", &["conference"]);
const RATING_TYPE: Field = Field::optional("rating_type", &["ratingType", "rating_type", "type"]);
const RATING_VALUE: Field = Field::required(
    "rating_value",
    &["rating", "ratingValue", "rating_value"],
);

pub fn fetch_ratings(
    client: &Client,
    year: u32,
    week: Option<u32>,
) -> Result<Vec<RatingRecord>, ApiError> {
    let payload = client.request(Dataset::Ratings.endpoint(), &season_params(year, week))?;
    normalize_ratings(&payload, client.clock().wall_time())
}

pub fn normalize_ratings(
    payload: &Value,
    fetched_at: UtcDateTime,
) -> Result<Vec<RatingRecord>, ApiError> {
    Ok(objects(Dataset::Ratings, payload)?
        .into_iter()
        .map(|object| {
            let row = Row::new(Dataset::Ratings, object);
            RatingRecord {
                team: row.team(&TEAM),
                conference: row.string(&CONFERENCE),
                rating_type: row.string(&RATING_TYPE),
                rating_value: row.float(&RATING_VALUE),
                fetched_at,
            }
        })
        .collect())
}
