//! # Domain Models
//!
//! Canonical row shapes produced by the dataset normalizers.
//!
//! | Type | Endpoint |
//! |------|----------|
//! | [`GameRecord`] | `/games` |
//! | [`RatingRecord`] | `/ratings` |
//! | [`LineRecord`] | `/lines` |
//! | [`RecruitingRecord`] | `/recruiting/teams` |
//! | [`WeatherRecord`] | `/game/weather` |
//! | [`MediaRecord`] | `/game/media` |
//! | [`PredictedPointsRecord`] | `/ratings/predicted` |
//!
//! Every record has a fixed, ordered column list ([`Record::COLUMNS`]) ending
//! in `fetched_at`. Absent upstream fields are `None`, never dropped.

mod records;
mod team;
mod timestamp;

pub use records::{
    GameRecord, LineRecord, MediaRecord, PredictedPointsRecord, RatingRecord, Record,
    RecruitingRecord, WeatherRecord,
};
pub use team::team_slug;
pub use timestamp::UtcDateTime;
