use roster_types::{MatchId, PlayerId, TimeLog, TimeLogKind};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerPlayingTime {
    pub player_id: PlayerId,
    pub field_ms: i64,
    pub positions: BTreeMap<String, i64>,
    pub sessions: usize,
}

/// Per-player playing time of one match, built from closed time logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayingTimeReport {
    pub match_id: MatchId,
    pub players: Vec<PlayerPlayingTime>,
}

impl PlayingTimeReport {
    pub fn from_logs(match_id: MatchId, logs: &[TimeLog]) -> Self {
        let mut by_player: HashMap<PlayerId, PlayerPlayingTime> = HashMap::new();

        for log in logs.iter().filter(|log| log.match_id == match_id) {
            let entry = by_player
                .entry(log.player_id)
                .or_insert_with(|| PlayerPlayingTime {
                    player_id: log.player_id,
                    field_ms: 0,
                    positions: BTreeMap::new(),
                    sessions: 0,
                });

            match log.kind {
                TimeLogKind::Field => {
                    entry.field_ms += log.duration();
                    entry.sessions += 1;
                }
                TimeLogKind::Position => {
                    let position = log.position.clone().unwrap_or_default();
                    *entry.positions.entry(position).or_insert(0) += log.duration();
                }
            }
        }

        let mut players: Vec<PlayerPlayingTime> = by_player.into_values().collect();
        players.sort_by(|a, b| {
            b.field_ms
                .cmp(&a.field_ms)
                .then_with(|| a.player_id.cmp(&b.player_id))
        });

        Self { match_id, players }
    }

    pub fn for_player(&self, player_id: PlayerId) -> Option<&PlayerPlayingTime> {
        self.players.iter().find(|p| p.player_id == player_id)
    }
}
