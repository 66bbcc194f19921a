use serde_json::Value;

use super::fields::{objects, Field, Row};
use super::{season_params, Dataset};
use crate::{ApiError, Client, LineRecord, UtcDateTime};

const GAME_ID: Field = Field::required("game_id", &["id", "gameId"]);
const LINES: Field = Field::optional("lines", &["lines"]);
const PROVIDER: Field = Field::optional("provider", &["provider"]);
const SPREAD: Field = Field::optional("spread", &["spread"]);
const OVER_UNDER: Field = Field::optional("over_under", &["overUnder", "over_under"]);

/// Fetches `/lines` and emits one row per provider per game.
pub fn fetch_lines(
    client: &Client,
    year: u32,
    week: Option<u32>,
) -> Result<Vec<LineRecord>, ApiError> {
    let payload = client.request(Dataset::Lines.endpoint(), &season_params(year, week))?;
    normalize_lines(&payload, client.clock().wall_time())
}

/// Flattens each game's nested `lines` array, carrying the game id onto every
/// provider row. Games without lines contribute no rows.
pub fn normalize_lines(
    payload: &Value,
    fetched_at: UtcDateTime,
) -> Result<Vec<LineRecord>, ApiError> {
    let mut records = Vec::new();

    for game in objects(Dataset::Lines, payload)? {
        let parent = Row::new(Dataset::Lines, game);
        let game_id = parent.int(&GAME_ID);
        let Some(lines) = parent.array(&LINES) else {
            continue;
        };

        for line in lines {
            let Some(line) = line.as_object() else {
                tracing::warn!(
                    dataset = Dataset::Lines.as_str(),
                    game_id,
                    "skipping non-object line entry"
                );
                continue;
            };
            let row = Row::new(Dataset::Lines, line);
            records.push(LineRecord {
                game_id,
                provider: row.string(&PROVIDER),
                spread: row.float(&SPREAD),
                over_under: row.float(&OVER_UNDER),
                fetched_at,
            });
        }
    }

    Ok(records)
}
