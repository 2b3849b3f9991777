pub mod clock;
pub mod events;
pub mod formations;
pub mod match_clock;
mod reconcile;
pub mod report;
pub mod store;
pub mod time_tracker;
pub mod transition;

// Re-export main components
pub use clock::*;
pub use events::*;
pub use formations::*;
pub use match_clock::*;
pub use report::*;
pub use store::*;
pub use time_tracker::*;
pub use transition::{Transition, roster_is_consistent};
