pub mod goal_repository;
pub mod match_repository;
pub mod player_repository;
pub mod time_log_repository;

pub use goal_repository::GoalRepository;
pub use match_repository::MatchRepository;
pub use player_repository::PlayerRepository;
pub use time_log_repository::TimeLogRepository;

use sea_orm::prelude::DateTimeWithTimeZone;

/// Parses an RFC 3339 stamp from the domain types, falling back to now.
pub(crate) fn parse_stamp(value: &str) -> DateTimeWithTimeZone {
    chrono::DateTime::parse_from_rfc3339(value).unwrap_or_else(|_| chrono::Utc::now().into())
}
