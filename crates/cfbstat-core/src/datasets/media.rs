use serde_json::Value;

use super::fields::{objects, Field, Row};
use super::{season_params, Dataset};
use crate::{ApiError, Client, MediaRecord, UtcDateTime};

const GAME_ID: Field = Field::required("game_id", &["gameId", "id", "game_id"]);
const TV: Field = Field::optional("tv", &["tv"]);
const RADIO: Field = Field::optional("radio", &["radio"]);
const SATELLITE: Field = Field::optional("satellite", &["satellite"]);
const INTERNET: Field = Field::optional("internet", &["internet", "web"]);

pub fn fetch_media(
    client: &Client,
    year: u32,
    week: Option<u32>,
) -> Result<Vec<MediaRecord>, ApiError> {
    let payload = client.request(Dataset::Media.endpoint(), &season_params(year, week))?;
    normalize_media(&payload, client.clock().wall_time())
}

pub fn normalize_media(
    payload: &Value,
    fetched_at: UtcDateTime,
) -> Result<Vec<MediaRecord>, ApiError> {
    Ok(objects(Dataset::Media, payload)?
        .into_iter()
        .map(|object| {
            let row = Row::new(Dataset::Media, object);
            MediaRecord {
                game_id: row.int(&GAME_ID),
                tv: row.outlets(&TV),
                radio: row.outlets(&RADIO),
                satellite: row.outlets(&SATELLITE),
                internet: row.outlets(&INTERNET),
                fetched_at,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn outlets_may_be_strings_or_lists() {
        let stamp = UtcDateTime::parse("2024-09-01T00:00:00Z").expect("valid");
        let payload = json!([{
            "id": 12,
            "tv": ["ESPN", "ESPN2"],
            "radio": "Sirius 84",
            "satellite": null,
            "internet": []
        }]);

        let media = normalize_media(&payload, stamp).expect("normalizes");

        assert_eq!(media[0].game_id, Some(12));
        assert_eq!(media[0].tv.as_deref(), Some("ESPN, ESPN2"));
        assert_eq!(media[0].radio.as_deref(), Some("Sirius 84"));
        assert_eq!(media[0].satellite, None);
        assert_eq!(media[0].internet, None);
    }
}
