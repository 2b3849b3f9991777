pub use super::goal_events::Entity as GoalEvents;
pub use super::matches::Entity as Matches;
pub use super::players::Entity as Players;
pub use super::time_logs::Entity as TimeLogs;
