pub mod commands;
pub mod errors;
pub mod formation;
pub mod goal;
pub mod matches;
pub mod player;
pub mod time_log;

use uuid::Uuid;

pub type PlayerId = Uuid;
pub type MatchId = Uuid;
pub type CoachId = Uuid;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

// Re-export all types
pub use commands::*;
pub use errors::*;
pub use formation::*;
pub use goal::*;
pub use matches::*;
pub use player::*;
pub use time_log::*;
