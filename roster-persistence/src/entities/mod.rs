pub mod prelude;

pub mod goal_events;
pub mod matches;
pub mod players;
pub mod time_logs;
