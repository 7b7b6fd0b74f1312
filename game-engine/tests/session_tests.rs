
use game_core::{Alphabet, RoundEvent, WordList};
use game_engine::session::SessionSettings;
use game_persistence::{SqlKeyValueStore, StatisticsStore, connection::connect_to_memory_database};
use game_types::{
    DifficultyLevel, GameError, Hint, InputRejection, JokerEffect, JokerKind, LossReason,
    RoundOutcome,
};
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use std::time::Duration;
use test_helpers::*;

#[tokio::test]
async fn test_win_records_statistics_once() {
    let setup = TestSessionSetup::standard().await;
    let session = &setup.session;
    session
        .start_new_round(DifficultyLevel::Medium.profile())
        .await
        .unwrap();

    guess(session, "KARGO").await.unwrap();
    let result = guess(session, "elmas").await.unwrap();
    assert!(result.is_solved());

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.outcome, RoundOutcome::Won);
    assert_eq!(snapshot.target_word.as_deref(), Some("ELMAS"));

    assert_eq!(
        guess(session, "KALEM").await,
        Err(GameError::RoundNotInProgress)
    );
    assert_eq!(session.tick().await, Err(GameError::RoundNotInProgress));

    let stats = setup.statistics.statistics().await;
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.games_won, 1);
    assert_eq!(stats.wins_with(2), 1);
}

#[tokio::test]
async fn test_six_misses_record_a_loss() {
    let setup = TestSessionSetup::standard().await;
    let session = &setup.session;
    session
        .start_new_round(DifficultyLevel::Medium.profile())
        .await
        .unwrap();

    for word in ["KARGO", "RAKAM", "SALEM", "KALEM", "MAKAS", "KARGO"] {
        guess(session, word).await.unwrap();
    }

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.outcome, RoundOutcome::Lost);
    assert_eq!(snapshot.loss_reason, Some(LossReason::GuessesExhausted));

    let stats = setup.statistics.statistics().await;
    assert_eq!((stats.games_played, stats.games_won, stats.current_streak), (1, 0, 0));
}

#[tokio::test]
async fn test_unknown_word_keeps_input() {
    let setup = TestSessionSetup::standard().await;
    let session = &setup.session;
    session
        .start_new_round(DifficultyLevel::Medium.profile())
        .await
        .unwrap();

    let result = guess(session, "ABCDE").await;
    assert_eq!(
        result,
        Err(GameError::UnknownWord {
            word: "ABCDE".to_string()
        })
    );

    let snapshot = session.snapshot().await.unwrap();
    assert!(snapshot.invalid_word_alert);
    assert_eq!(snapshot.current_input, vec!['A', 'B', 'C', 'D', 'E']);
    assert!(snapshot.submitted_guesses.is_empty());

    // Fixing the word clears the alert
    session.remove_last_letter().await;
    assert!(!session.snapshot().await.unwrap().invalid_word_alert);
}

#[tokio::test]
async fn test_incomplete_guess_is_rejected() {
    let setup = TestSessionSetup::standard().await;
    let session = &setup.session;
    session
        .start_new_round(DifficultyLevel::Medium.profile())
        .await
        .unwrap();

    type_word(session, "ELM").await;
    assert_eq!(
        session.submit_guess().await,
        Err(GameError::IncompleteGuess {
            expected: 5,
            actual: 3
        })
    );
}

#[tokio::test]
async fn test_input_without_a_round() {
    let setup = TestSessionSetup::standard().await;

    assert_eq!(
        setup.session.append_letter('A').await,
        Err(InputRejection::RoundOver)
    );
    assert_eq!(setup.session.remove_last_letter().await, None);
    assert_eq!(setup.session.submit_guess().await, Err(GameError::NoActiveRound));
    assert!(setup.session.snapshot().await.is_none());
}

#[tokio::test]
async fn test_missing_word_is_surfaced() {
    let list = WordList::from_word_list("elmas", Alphabet::turkish());
    let setup = TestSessionSetup::new(FixedWordSource::new(None, list), manual_settings()).await;

    let result = setup
        .session
        .start_new_round(DifficultyLevel::Hard.profile())
        .await;

    assert!(matches!(result, Err(GameError::WordUnavailable { length: 6, .. })));
    assert!(setup.session.snapshot().await.is_none());
}

#[tokio::test]
async fn test_manual_ticks_end_the_round() {
    let setup = TestSessionSetup::standard().await;
    let session = &setup.session;
    session.start_new_round(profile_with_duration(2)).await.unwrap();

    assert_eq!(session.tick().await, Ok(None));
    let summary = session.tick().await.unwrap().unwrap();

    assert_eq!(summary.loss_reason, Some(LossReason::TimeExpired));
    assert_eq!(summary.guess_count, 0);
    assert_eq!(setup.statistics.statistics().await.games_played, 1);
}

#[tokio::test]
async fn test_joker_without_inventory_changes_nothing() {
    let setup = TestSessionSetup::standard().await;
    let session = &setup.session;
    session
        .start_new_round(DifficultyLevel::Medium.profile())
        .await
        .unwrap();

    for kind in JokerKind::ALL {
        assert_eq!(
            session.use_joker(kind).await,
            Err(GameError::JokerUnavailable { kind })
        );
    }

    let snapshot = session.snapshot().await.unwrap();
    assert!(snapshot.revealed.is_empty());
    assert!(snapshot.eliminated_letters.is_empty());
    assert!(snapshot.jokers_used.is_empty());
    assert_eq!(snapshot.remaining_secs, 180);
}

#[tokio::test]
async fn test_jokers_consume_inventory() {
    let setup = TestSessionSetup::standard().await;
    let session = &setup.session;
    session
        .start_new_round(DifficultyLevel::Medium.profile())
        .await
        .unwrap();
    setup.inventory.grant(JokerKind::ShowHint, 1).await.unwrap();
    setup.inventory.grant(JokerKind::ExtraTime, 2).await.unwrap();

    let effect = session.use_joker(JokerKind::ShowHint).await.unwrap();
    assert_eq!(
        effect,
        JokerEffect::HintShown(Hint::Definition("A precious stone".to_string()))
    );
    assert_eq!(setup.inventory.count(JokerKind::ShowHint).await, 0);
    assert_eq!(
        session.use_joker(JokerKind::ShowHint).await,
        Err(GameError::JokerUnavailable {
            kind: JokerKind::ShowHint
        })
    );

    session.use_joker(JokerKind::ExtraTime).await.unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.remaining_secs, 210);
    assert_eq!(
        snapshot.jokers_used,
        vec![JokerKind::ShowHint, JokerKind::ExtraTime]
    );
    assert_eq!(setup.inventory.count(JokerKind::ExtraTime).await, 1);
}

#[tokio::test]
async fn test_jokers_rejected_once_round_is_over() {
    let setup = TestSessionSetup::standard().await;
    let session = &setup.session;
    session
        .start_new_round(DifficultyLevel::Medium.profile())
        .await
        .unwrap();
    setup.inventory.grant(JokerKind::RevealLetter, 1).await.unwrap();

    guess(session, "ELMAS").await.unwrap();

    assert_eq!(
        session.use_joker(JokerKind::RevealLetter).await,
        Err(GameError::RoundNotInProgress)
    );
    assert_eq!(setup.inventory.count(JokerKind::RevealLetter).await, 1);
}

#[tokio::test]
async fn test_events_follow_the_round() {
    let setup = TestSessionSetup::standard().await;
    let session = &setup.session;
    let collector = EventCollector::default();
    session.add_handler(Box::new(collector.clone())).await;

    session
        .start_new_round(DifficultyLevel::Medium.profile())
        .await
        .unwrap();
    guess(session, "ABCDE").await.ok();
    for _ in 0..5 {
        session.remove_last_letter().await;
    }
    guess(session, "ELMAS").await.unwrap();

    assert_eq!(collector.count(|e| matches!(e, RoundEvent::RoundStarted { .. })), 1);
    assert_eq!(collector.count(|e| matches!(e, RoundEvent::InputChanged { .. })), 15);
    assert_eq!(collector.count(|e| matches!(e, RoundEvent::InvalidWord { .. })), 1);
    assert_eq!(collector.count(|e| matches!(e, RoundEvent::GuessEvaluated { .. })), 1);
    assert_eq!(collector.count(|e| matches!(e, RoundEvent::RoundFinished { .. })), 1);
    assert!(matches!(
        collector.get_events().last(),
        Some(RoundEvent::RoundFinished { summary }) if summary.won()
    ));
}

#[tokio::test(start_paused = true)]
async fn test_clock_expiry_records_one_loss() {
    let source = FixedWordSource::new(Some("ELMAS"), create_test_word_list());
    let setup = TestSessionSetup::new(source, timed_settings()).await;
    let session = &setup.session;
    session.start_new_round(profile_with_duration(3)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(session.snapshot().await.unwrap().remaining_secs, 2);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.outcome, RoundOutcome::Lost);
    assert_eq!(snapshot.loss_reason, Some(LossReason::TimeExpired));
    assert_eq!(snapshot.remaining_secs, 0);

    tokio::time::sleep(Duration::from_secs(5)).await;
    let stats = setup.statistics.statistics().await;
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.current_streak, 0);
}

#[tokio::test(start_paused = true)]
async fn test_restart_stops_the_old_clock() {
    let source = FixedWordSource::new(Some("ELMAS"), create_test_word_list());
    let setup = TestSessionSetup::new(source, timed_settings()).await;
    let session = &setup.session;

    let first = session.start_new_round(profile_with_duration(5)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(session.snapshot().await.unwrap().remaining_secs, 3);

    let second = session.start_new_round(profile_with_duration(5)).await.unwrap();
    assert_ne!(first.round_id, second.round_id);
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.round_id, second.round_id);
    assert_eq!(snapshot.remaining_secs, 4);
    assert_eq!(setup.statistics.statistics().await.games_played, 0);
}

#[tokio::test(start_paused = true)]
async fn test_clock_wins_race_against_slow_validation() {
    let source = FixedWordSource::new(Some("ELMAS"), create_test_word_list())
        .with_validation_delay(Duration::from_secs(2));
    let setup = TestSessionSetup::new(source, timed_settings()).await;
    let session = &setup.session;
    session.start_new_round(profile_with_duration(1)).await.unwrap();

    type_word(session, "ELMAS").await;
    assert_eq!(session.submit_guess().await, Err(GameError::RoundNotInProgress));

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.outcome, RoundOutcome::Lost);
    assert!(snapshot.submitted_guesses.is_empty());

    let stats = setup.statistics.statistics().await;
    assert_eq!((stats.games_played, stats.games_won), (1, 0));
}

#[tokio::test(start_paused = true)]
async fn test_validation_timeout_keeps_the_guess() {
    let source = FixedWordSource::new(Some("ELMAS"), create_test_word_list())
        .with_validation_delay(Duration::from_secs(5));
    let settings = SessionSettings {
        tick_interval: None,
        word_timeout: Duration::from_millis(500),
    };
    let setup = TestSessionSetup::new(source, settings).await;
    let session = &setup.session;
    session
        .start_new_round(DifficultyLevel::Medium.profile())
        .await
        .unwrap();

    type_word(session, "KALEM").await;
    assert!(matches!(
        session.submit_guess().await,
        Err(GameError::WordCheckFailed { .. })
    ));

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.current_input.len(), 5);
    assert!(!snapshot.invalid_word_alert);
    assert_eq!(snapshot.outcome, RoundOutcome::InProgress);
}

#[tokio::test]
async fn test_failing_word_check_raises_no_alert() {
    let source =
        FixedWordSource::new(Some("ELMAS"), create_test_word_list()).with_broken_validation();
    let setup = TestSessionSetup::new(source, manual_settings()).await;
    let session = &setup.session;
    session
        .start_new_round(DifficultyLevel::Medium.profile())
        .await
        .unwrap();

    let result = guess(session, "KALEM").await;
    assert_eq!(
        result,
        Err(GameError::WordCheckFailed {
            reason: "service down".to_string()
        })
    );

    let snapshot = session.snapshot().await.unwrap();
    assert!(!snapshot.invalid_word_alert);
    assert_eq!(snapshot.current_input.len(), 5);
    assert!(snapshot.submitted_guesses.is_empty());
}

#[tokio::test]
async fn test_statistics_persist_in_sqlite() {
    let db = connect_to_memory_database().await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let store = Arc::new(SqlKeyValueStore::new(db));

    let source = FixedWordSource::new(Some("ELMAS"), create_test_word_list());
    let setup = TestSessionSetup::with_store(source, manual_settings(), store.clone()).await;
    setup
        .session
        .start_new_round(DifficultyLevel::Medium.profile())
        .await
        .unwrap();
    guess(&setup.session, "ELMAS").await.unwrap();

    let reloaded = StatisticsStore::load(store).await;
    let stats = reloaded.statistics().await;
    assert_eq!(stats.games_won, 1);
    assert_eq!(stats.wins_with(1), 1);
}
