#![allow(dead_code)]

use roster_core::{TimeTracker, TrackerEvent, TrackerEventHandler};
use roster_types::{Player, PlayerId, TimeLog, TimeLogKind};
use std::sync::{Arc, Mutex};

pub const MINUTE: i64 = 60_000;

/// Creates a tracker with the named players on the bench
pub fn create_tracker_with_players(names: &[&str]) -> (TimeTracker, Vec<PlayerId>) {
    let mut tracker = TimeTracker::new();
    let ids = names
        .iter()
        .enumerate()
        .map(|(i, name)| tracker.add_player(name, Some(i as i32 + 1), 0).unwrap())
        .collect();
    (tracker, ids)
}

/// Creates a tracker whose event bus feeds the returned collector
pub fn create_observed_tracker(names: &[&str]) -> (TimeTracker, Vec<PlayerId>, EventCollector) {
    let (mut tracker, ids) = create_tracker_with_players(names);
    let collector = EventCollector::new();
    tracker.add_event_handler(Box::new(collector.clone()));
    (tracker, ids, collector)
}

pub fn get_player(tracker: &TimeTracker, player_id: PlayerId) -> &Player {
    tracker.player(player_id).expect("player should exist")
}

pub fn logs_of_kind(logs: &[TimeLog], kind: TimeLogKind) -> Vec<&TimeLog> {
    logs.iter().filter(|log| log.kind == kind).collect()
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<TrackerEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<TrackerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&TrackerEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl TrackerEventHandler for EventCollector {
    fn handle_event(&mut self, event: &TrackerEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
