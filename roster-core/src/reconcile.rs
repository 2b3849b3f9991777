use roster_types::{Repair, RepairKind, Timestamp};
use std::collections::HashSet;

use crate::clock::rfc3339;
use crate::transition::Draft;

/// Plans repairs for rows that break the roster invariants, typically after
/// loading state written by an older client or an interrupted session.
///
/// Position presence wins over the field flag. Session starts are only kept
/// while a match is active, and are opened at `now` when missing.
pub(crate) fn plan_repairs(draft: &mut Draft<'_>, now: Timestamp) {
    let match_active = draft.active_match().is_some();
    let mut held = HashSet::new();

    for mut player in draft.players() {
        let mut kinds = Vec::new();

        if let Some(position) = &player.position {
            if !held.insert(position.clone()) {
                player.position = None;
                player.position_time_start = None;
                kinds.push(RepairKind::DuplicatePosition);
            }
        }

        if player.position.is_some() && !player.is_on_field {
            player.is_on_field = true;
            kinds.push(RepairKind::PositionedOffField);
        }

        if !player.is_on_field && player.field_time_start.is_some() {
            player.field_time_start = None;
            kinds.push(RepairKind::StaleFieldStart);
        }
        if player.position.is_none() && player.position_time_start.is_some() {
            player.position_time_start = None;
            kinds.push(RepairKind::StalePositionStart);
        }

        if match_active {
            if player.is_on_field && player.field_time_start.is_none() {
                player.field_time_start = Some(now);
                kinds.push(RepairKind::MissingFieldStart);
            }
            if player.position.is_some() && player.position_time_start.is_none() {
                player.position_time_start = Some(now);
                kinds.push(RepairKind::MissingPositionStart);
            }
        } else if player.field_time_start.is_some() || player.position_time_start.is_some() {
            player.field_time_start = None;
            player.position_time_start = None;
            kinds.push(RepairKind::OrphanedSession);
        }

        if kinds.is_empty() {
            continue;
        }

        let player_id = player.id;
        player.updated_at = rfc3339(now);
        draft.put(player);
        for kind in kinds {
            draft.add_repair(Repair { player_id, kind });
        }
    }
}
