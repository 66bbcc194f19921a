//! Dataset fetchers and normalizers.
//!
//! Each dataset pairs a `fetch_*` function, which calls
//! [`Client::request`](crate::Client::request) on a fixed endpoint, with a pure
//! `normalize_*` function that maps the raw JSON array onto the dataset's
//! canonical record.
//!
//! | Dataset | Endpoint | Record |
//! |---------|----------|--------|
//! | [`Dataset::Games`] | `/games` | [`GameRecord`](crate::GameRecord) |
//! | [`Dataset::Lines`] | `/lines` | [`LineRecord`](crate::LineRecord) |
//! | [`Dataset::Ratings`] | `/ratings` | [`RatingRecord`](crate::RatingRecord) |
//! | [`Dataset::Recruiting`] | `/recruiting/teams` | [`RecruitingRecord`](crate::RecruitingRecord) |
//! | [`Dataset::Weather`] | `/game/weather` | [`WeatherRecord`](crate::WeatherRecord) |
//! | [`Dataset::Media`] | `/game/media` | [`MediaRecord`](crate::MediaRecord) |
//! | [`Dataset::PredictedPoints`] | `/ratings/predicted` | [`PredictedPointsRecord`](crate::PredictedPointsRecord) |

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::{
    GameRecord, LineRecord, MediaRecord, PredictedPointsRecord, RatingRecord, Record,
    RecruitingRecord, WeatherRecord,
};

mod fields;
mod games;
mod lines;
mod media;
mod predicted;
mod ratings;
mod recruiting;
mod weather;

pub use games::{fetch_games, normalize_games};
pub use lines::{fetch_lines, normalize_lines};
pub use media::{fetch_media, normalize_media};
pub use predicted::{fetch_predicted_points, normalize_predicted_points};
pub use ratings::{fetch_ratings, normalize_ratings};
pub use recruiting::{fetch_recruiting, normalize_recruiting};
pub use weather::{fetch_weather, normalize_weather};

/// Upstream dataset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Games,
    Lines,
    Ratings,
    Recruiting,
    Weather,
    Media,
    PredictedPoints,
}

impl Dataset {
    pub const ALL: [Self; 7] = [
        Self::Games,
        Self::Lines,
        Self::Ratings,
        Self::Recruiting,
        Self::Weather,
        Self::Media,
        Self::PredictedPoints,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Games => "games",
            Self::Lines => "lines",
            Self::Ratings => "ratings",
            Self::Recruiting => "recruiting",
            Self::Weather => "weather",
            Self::Media => "media",
            Self::PredictedPoints => "predicted_points",
        }
    }

    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Games => "/games",
            Self::Lines => "/lines",
            Self::Ratings => "/ratings",
            Self::Recruiting => "/recruiting/teams",
            Self::Weather => "/game/weather",
            Self::Media => "/game/media",
            Self::PredictedPoints => "/ratings/predicted",
        }
    }

    /// Output columns of the dataset's record, in order.
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Games => GameRecord::COLUMNS,
            Self::Lines => LineRecord::COLUMNS,
            Self::Ratings => RatingRecord::COLUMNS,
            Self::Recruiting => RecruitingRecord::COLUMNS,
            Self::Weather => WeatherRecord::COLUMNS,
            Self::Media => MediaRecord::COLUMNS,
            Self::PredictedPoints => PredictedPointsRecord::COLUMNS,
        }
    }
}

impl Display for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `year` plus an optional `week` filter.
fn season_params(year: u32, week: Option<u32>) -> Vec<(&'static str, String)> {
    let mut params = vec![("year", year.to_string())];
    if let Some(week) = week {
        params.push(("week", week.to_string()));
    }
    params
}
