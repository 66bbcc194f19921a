use serde_json::Value;

use super::fields::{objects, Field, Row};
use super::Dataset;
use crate::{ApiError, Client, RecruitingRecord, UtcDateTime};

const TEAM: Field = Field::required("team", &["team"]);
const RANK: Field = Field::required("rank", &["rank"]);
const POINTS: Field = Field::optional("points", &["points"]);
const AVG_RATING: Field = Field::optional(
    "avg_rating",
    &["avgRating", "averageRating", "avg_rating"],
);

/// Fetches team recruiting rankings for a class year.
pub fn fetch_recruiting(client: &Client, year: u32) -> Result<Vec<RecruitingRecord>, ApiError> {
    let payload = client.request(Dataset::Recruiting.endpoint(), &[("year", year.to_string())])?;
    normalize_recruiting(&payload, client.clock().wall_time())
}

pub fn normalize_recruiting(
    payload: &Value,
    fetched_at: UtcDateTime,
) -> Result<Vec<RecruitingRecord>, ApiError> {
    Ok(objects(Dataset::Recruiting, payload)?
        .into_iter()
        .map(|object| {
            let row = Row::new(Dataset::Recruiting, object);
            RecruitingRecord {
                team: row.team(&TEAM),
                rank: row.int(&RANK),
                points: row.float(&POINTS),
                avg_rating: row.float(&AVG_RATING),
                fetched_at,
            }
        })
        .collect())
}
