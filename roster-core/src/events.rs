use roster_types::{GoalEvent, MatchId, PlayerId, RepairKind, TimeLog};

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    PlayerAdded {
        player_id: PlayerId,
        name: String,
    },
    MatchStarted {
        match_id: MatchId,
        opponent: Option<String>,
        duration_minutes: i32,
    },
    HalfTimeStarted {
        match_id: MatchId,
    },
    HalfTimeEnded {
        match_id: MatchId,
    },
    MatchEnded {
        match_id: MatchId,
        elapsed_ms: i64,
    },
    MatchScoreSet {
        match_id: MatchId,
        score: Option<String>,
    },
    PlayerSubbedIn {
        player_id: PlayerId,
    },
    PlayerSubbedOut {
        player_id: PlayerId,
    },
    PositionAssigned {
        player_id: PlayerId,
        position: String,
    },
    PositionCleared {
        player_id: PlayerId,
        position: String,
    },
    SessionClosed {
        log: TimeLog,
    },
    GoalRecorded {
        goal: GoalEvent,
    },
    Repaired {
        player_id: PlayerId,
        kind: RepairKind,
    },
}

impl TrackerEvent {
    pub fn player_id(&self) -> Option<PlayerId> {
        match self {
            TrackerEvent::PlayerAdded { player_id, .. }
            | TrackerEvent::PlayerSubbedIn { player_id }
            | TrackerEvent::PlayerSubbedOut { player_id }
            | TrackerEvent::PositionAssigned { player_id, .. }
            | TrackerEvent::PositionCleared { player_id, .. }
            | TrackerEvent::Repaired { player_id, .. } => Some(*player_id),
            TrackerEvent::SessionClosed { log } => Some(log.player_id),
            TrackerEvent::MatchStarted { .. }
            | TrackerEvent::HalfTimeStarted { .. }
            | TrackerEvent::HalfTimeEnded { .. }
            | TrackerEvent::MatchEnded { .. }
            | TrackerEvent::MatchScoreSet { .. }
            | TrackerEvent::GoalRecorded { .. } => None,
        }
    }
}

/// Event handler trait for reacting to committed transitions
pub trait TrackerEventHandler: Send + Sync {
    fn handle_event(&mut self, event: &TrackerEvent);
}

/// Simple event bus for distributing tracker events
pub struct TrackerEventBus {
    handlers: Vec<Box<dyn TrackerEventHandler>>,
}

impl TrackerEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn TrackerEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: &TrackerEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for TrackerEventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes every event to the `tracing` subscriber.
pub struct TracingEventHandler;

impl TrackerEventHandler for TracingEventHandler {
    fn handle_event(&mut self, event: &TrackerEvent) {
        match event {
            TrackerEvent::SessionClosed { log } => tracing::debug!(
                "{} session closed for player {}: {} ms",
                log.kind,
                log.player_id,
                log.duration()
            ),
            TrackerEvent::Repaired { player_id, kind } => {
                tracing::warn!("Repaired player {}: {:?}", player_id, kind)
            }
            other => tracing::info!("{:?}", other),
        }
    }
}
