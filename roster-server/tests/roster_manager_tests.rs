
use roster_core::{ManualClock, default_formation};
use roster_server::config::Config;
use roster_server::roster_manager::{RosterManager, RosterSettings, ServiceError};
use roster_types::{Command, GameFormat, PlayerStatus, TrackerError};
use std::sync::Arc;
use test_helpers::*;

#[tokio::test]
async fn test_full_match_through_manager() {
    let setup = TestRosterSetup::new();
    let coach = new_coach();
    let ids = setup.add_players(coach, &["Alex", "Blake"]).await;
    let (alex, blake) = (ids[0], ids[1]);

    setup.execute(coach, assign(alex, "ST")).await.unwrap();
    let outcome = setup.execute(coach, start_match(60)).await.unwrap();
    let match_id = outcome.current_match.unwrap().id;

    setup.clock.advance(30 * MINUTE);
    let outcome = setup
        .execute(
            coach,
            Command::SwapPlayers {
                first: alex,
                second: blake,
            },
        )
        .await
        .unwrap();
    // Alex's field and position sessions close on the way off
    assert_eq!(outcome.time_logs.len(), 2);

    setup.clock.advance(30 * MINUTE);
    let roster = setup.roster(coach).await;
    assert_eq!(find_view(&roster, blake).current_field_time, 30 * MINUTE);
    assert_eq!(
        find_view(&roster, blake).status,
        PlayerStatus::Positioned {
            position: "ST".to_string()
        }
    );
    assert_eq!(find_view(&roster, alex).status, PlayerStatus::Bench);

    setup.execute(coach, Command::EndMatch).await.unwrap();

    let report = setup.manager.report(coach, match_id).await.unwrap();
    assert_eq!(report.for_player(alex).unwrap().field_ms, 30 * MINUTE);
    assert_eq!(report.for_player(blake).unwrap().field_ms, 30 * MINUTE);
    assert_eq!(
        report.for_player(blake).unwrap().positions.get("ST"),
        Some(&(30 * MINUTE))
    );
}

#[tokio::test]
async fn test_report_is_scoped_to_the_coach() {
    let setup = TestRosterSetup::new();
    let coach = new_coach();
    let ids = setup.add_players(coach, &["Alex"]).await;
    setup
        .execute(coach, Command::SubIn { player_id: ids[0] })
        .await
        .unwrap();
    let match_id = setup
        .execute(coach, start_match(60))
        .await
        .unwrap()
        .current_match
        .unwrap()
        .id;
    setup.clock.advance(10 * MINUTE);
    setup.execute(coach, Command::EndMatch).await.unwrap();

    let report = setup.manager.report(coach, match_id).await.unwrap();
    assert_eq!(report.players[0].field_ms, 10 * MINUTE);

    let stranger = new_coach();
    let result = setup.manager.report(stranger, match_id).await;
    assert!(matches!(
        result,
        Err(ServiceError::MatchNotFound { match_id: missing }) if missing == match_id
    ));
}

#[tokio::test]
async fn test_persistence_failure_leaves_roster_untouched() {
    let setup = TestRosterSetup::new();
    let coach = new_coach();
    let ids = setup.add_players(coach, &["Alex"]).await;
    setup.execute(coach, assign(ids[0], "GK")).await.unwrap();

    setup.store.set_fail_writes(true);
    let result = setup.execute(coach, start_match(60)).await;
    assert!(matches!(result, Err(ServiceError::Persistence(_))));

    let roster = setup.roster(coach).await;
    assert!(roster.current_match.is_none());
    assert_eq!(find_view(&roster, ids[0]).player.field_time_start, None);

    // The same command succeeds once the store recovers
    setup.store.set_fail_writes(false);
    let outcome = setup.execute(coach, start_match(60)).await.unwrap();
    assert!(outcome.current_match.unwrap().is_active);
}

#[tokio::test]
async fn test_rejected_command_is_a_tracker_error() {
    let setup = TestRosterSetup::new();
    let coach = new_coach();

    let result = setup.execute(coach, Command::EndMatch).await;
    assert!(matches!(
        result,
        Err(ServiceError::Tracker(TrackerError::NoActiveMatch))
    ));
    assert_eq!(setup.store.time_log_count(), 0);
}

#[tokio::test]
async fn test_coaches_are_isolated() {
    let setup = TestRosterSetup::new();
    let first = new_coach();
    let second = new_coach();

    setup.add_players(first, &["Alex", "Blake"]).await;
    setup.execute(first, start_match(60)).await.unwrap();

    let other = setup.roster(second).await;
    assert!(other.players.is_empty());
    assert!(other.current_match.is_none());
    assert!(setup.manager.clock_state(second).await.unwrap().is_none());

    // Each coach can run a match of their own
    setup.execute(second, start_match(40)).await.unwrap();
    assert_eq!(setup.manager.loaded_rosters().await, 2);
}

#[tokio::test]
async fn test_roster_resumes_from_store() {
    let setup = TestRosterSetup::new();
    let coach = new_coach();
    let ids = setup.add_players(coach, &["Alex", "Blake"]).await;
    setup.execute(coach, assign(ids[1], "GK")).await.unwrap();
    setup.execute(coach, start_match(60)).await.unwrap();
    setup.clock.advance(12 * MINUTE);

    // A second manager over the same store loads the roster on first use
    let resumed = RosterManager::new(
        setup.store.clone(),
        Arc::new(setup.clock.clone()),
        RosterSettings::default(),
    );
    assert_eq!(resumed.loaded_rosters().await, 0);

    let roster = resumed.roster_view(coach).await.unwrap();
    assert_eq!(roster.players.len(), 2);
    assert_eq!(roster.players[0].player.name, "Alex");
    assert_eq!(find_view(&roster, ids[1]).current_field_time, 12 * MINUTE);
    let clock = roster.clock.unwrap();
    assert_eq!(clock.elapsed_ms, 12 * MINUTE);
    assert_eq!(clock.display, "12:00");
    assert_eq!(resumed.loaded_rosters().await, 1);
}

#[tokio::test]
async fn test_settings_apply_to_new_rosters() {
    let setup = TestRosterSetup::with_settings(RosterSettings {
        default_match_minutes: Some(50),
        formation: Some(default_formation(GameFormat::SevenASide)),
    });
    let coach = new_coach();
    let ids = setup.add_players(coach, &["Alex"]).await;

    let result = setup.execute(coach, assign(ids[0], "ST")).await;
    assert!(matches!(
        result,
        Err(ServiceError::Tracker(TrackerError::UnknownPosition { .. }))
    ));
    setup.execute(coach, assign(ids[0], "GK")).await.unwrap();

    let outcome = setup
        .execute(
            coach,
            Command::StartMatch {
                opponent: None,
                duration_minutes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.current_match.unwrap().duration, 50);
}

#[tokio::test]
async fn test_configured_formation_limits_positions() {
    let config = Config::from_lookup(|key| match key {
        "FORMATION" => Some("1-4-3-3-11v11".to_string()),
        _ => None,
    })
    .unwrap();
    let setup = TestRosterSetup::with_settings(RosterSettings::from(&config));
    let coach = new_coach();
    let ids = setup.add_players(coach, &["Alex", "Blake"]).await;

    setup.execute(coach, assign(ids[0], "ST")).await.unwrap();
    let result = setup.execute(coach, assign(ids[1], "LM")).await;
    assert!(matches!(
        result,
        Err(ServiceError::Tracker(TrackerError::UnknownPosition { .. }))
    ));

    // Without a FORMATION key the format's default applies
    let setup = TestRosterSetup::with_settings(RosterSettings::from(&Config::default()));
    let ids = setup.add_players(coach, &["Alex"]).await;
    setup.execute(coach, assign(ids[0], "LM")).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_commands_for_one_coach() {
    let setup = TestRosterSetup::new();
    let coach = new_coach();

    let mut handles = Vec::new();
    for i in 0..10 {
        let manager = setup.manager.clone();
        handles.push(tokio::spawn(async move {
            manager
                .execute(coach, add_player(&format!("Player {}", i)))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let roster = setup.roster(coach).await;
    assert_eq!(roster.players.len(), 10);
    assert_eq!(setup.manager.loaded_rosters().await, 1);
}

#[tokio::test]
async fn test_sql_backed_manager_survives_restart() {
    let clock = ManualClock::new(0);
    let (manager, store) = create_sql_manager(clock.clone()).await;
    let coach = new_coach();

    let mut ids = Vec::new();
    for name in ["Alex", "Blake"] {
        let outcome = manager.execute(coach, add_player(name)).await.unwrap();
        ids.push(outcome.players[0].player.id);
    }
    manager.execute(coach, assign(ids[0], "ST")).await.unwrap();
    let match_id = manager
        .execute(coach, start_match(60))
        .await
        .unwrap()
        .current_match
        .unwrap()
        .id;

    clock.advance(20 * MINUTE);
    manager
        .execute(
            coach,
            Command::RecordGoal {
                scorer_id: Some(ids[0]),
                assist_id: None,
                is_own_goal: false,
            },
        )
        .await
        .unwrap();

    // Drop the in-memory trackers and continue from the database
    let restarted = RosterManager::new(store, Arc::new(clock.clone()), RosterSettings::default());
    let roster = restarted.roster_view(coach).await.unwrap();
    assert_eq!(roster.score.goals_for, 1);
    assert_eq!(find_view(&roster, ids[0]).current_field_time, 20 * MINUTE);

    clock.advance(40 * MINUTE);
    restarted.execute(coach, Command::EndMatch).await.unwrap();

    let report = restarted.report(coach, match_id).await.unwrap();
    assert_eq!(report.players.len(), 1);
    assert_eq!(report.players[0].player_id, ids[0]);
    assert_eq!(report.players[0].field_ms, 60 * MINUTE);
    assert!(matches!(
        restarted.report(new_coach(), match_id).await,
        Err(ServiceError::MatchNotFound { .. })
    ));
}
