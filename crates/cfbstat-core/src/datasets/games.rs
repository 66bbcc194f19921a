use serde_json::Value;

use super::fields::{objects, Field, Row};
use super::{season_params, Dataset};
use crate::{ApiError, Client, GameRecord, UtcDateTime};

const ID: Field = Field::required("id", &["id"]);
const HOME_TEAM: Field = Field::required("home_team", &["homeTeam", "home_team"]);
const AWAY_TEAM: Field = Field::required("away_team", &["awayTeam", "away_team"]);
const HOME_POINTS: Field = Field::optional("home_points", &["homePoints", "home_points"]);
const AWAY_POINTS: Field = Field::optional("away_points", &["awayPoints", "away_points"]);
const WEEK: Field = Field::optional("week", &["week"]);
const SEASON: Field = Field::optional("season", &["season"]);

/// Fetches `/games` for a season, optionally narrowed to one week.
pub fn fetch_games(
    client: &Client,
    year: u32,
    week: Option<u32>,
) -> Result<Vec<GameRecord>, ApiError> {
    let payload = client.request(Dataset::Games.endpoint(), &season_params(year, week))?;
    normalize_games(&payload, client.clock().wall_time())
}

pub fn normalize_games(
    payload: &Value,
    fetched_at: UtcDateTime,
) -> Result<Vec<GameRecord>, ApiError> {
    Ok(objects(Dataset::Games, payload)?
        .into_iter()
        .map(|object| {
            let row = Row::new(Dataset::Games, object);
            GameRecord {
                id: row.int(&ID),
                home_team: row.team(&HOME_TEAM),
                away_team: row.team(&AWAY_TEAM),
                home_points: row.int(&HOME_POINTS),
                away_points: row.int(&AWAY_POINTS),
                week: row.int(&WEEK),
                season: row.int(&SEASON),
                fetched_at,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn stamp() -> UtcDateTime {
        UtcDateTime::parse("2024-09-01T00:00:00Z").expect("valid")
    }

    #[test]
    fn maps_camel_case_game() {
        let payload = json!([{
            "id": 401628374,
            "season": 2024,
            "week": 1,
            "homeTeam": "Ohio State",
            "homePoints": 52,
            "awayTeam": "Akron",
            "awayPoints": 6,
            "venue": "Ohio Stadium"
        }]);

        let games = normalize_games(&payload, stamp()).expect("normalizes");

        assert_eq!(
            games,
            vec![GameRecord {
                id: Some(401628374),
                home_team: Some(String::from("ohio_state")),
                away_team: Some(String::from("akron")),
                home_points: Some(52),
                away_points: Some(6),
                week: Some(1),
                season: Some(2024),
                fetched_at: stamp(),
            }]
        );
    }

    #[test]
    fn accepts_snake_case_and_missing_scores() {
        let payload = json!([{
            "id": 1,
            "home_team": "Boise State",
            "away_team": "Georgia Southern",
            "home_points": null
        }]);

        let games = normalize_games(&payload, stamp()).expect("normalizes");

        assert_eq!(games[0].home_team.as_deref(), Some("boise_state"));
        assert_eq!(games[0].home_points, None);
        assert_eq!(games[0].away_points, None);
        assert_eq!(games[0].season, None);
    }
}
