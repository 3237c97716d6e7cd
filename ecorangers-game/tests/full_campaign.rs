use ecorangers_game::{
    GameMode, GamePhase, GameSession, LevelCatalog, Signal, TimeLeft, Transition,
    constants::LEVEL_COUNT,
};
use std::rc::Rc;

fn session(seed: u64) -> GameSession {
    GameSession::new(Rc::new(LevelCatalog::generate(seed)), seed)
}

/// Sort every item on the field into its own bin.
fn clear_level(session: &mut GameSession) -> Vec<Transition> {
    let mut transitions = Vec::new();
    while let Some(item) = session.state().current_items.first().cloned() {
        let before = session.state().score;
        let transition = session.drop_item(item.id, item.category);
        assert!(transition.is_applied(), "drop of {item:?} ignored");
        let state = session.state();
        assert!(state.score > before);
        assert!(state.max_streak >= state.streak);
        assert!(state.items_collected <= state.total_items);
        transitions.push(transition);
    }
    transitions
}

#[test]
fn perfect_adventure_reaches_game_complete() {
    let mut session = session(2024);
    assert!(session.start_game(GameMode::Adventure, 0).is_applied());

    for level in 1..=LEVEL_COUNT {
        assert_eq!(session.state().level, level);
        assert_eq!(session.phase(), GamePhase::Playing);
        let expected_items = session.current_level().unwrap().item_count;
        assert_eq!(session.state().total_items, expected_items);

        let transitions = clear_level(&mut session);
        let last = transitions.last().expect("every level has items");
        let summary = last
            .signals()
            .iter()
            .find_map(|signal| match signal {
                Signal::LevelComplete(summary) => Some(summary.clone()),
                _ => None,
            })
            .expect("clearing the field completes the level");
        assert_eq!(summary.level, level);
        assert_eq!(summary.bonus.perfect, 100);
        assert_eq!(summary.is_final_level, level == LEVEL_COUNT);

        let next = session.next_level();
        assert!(next.is_applied());
    }

    assert_eq!(session.phase(), GamePhase::GameComplete);
    assert_eq!(session.state().level, LEVEL_COUNT);
    assert!(session.tick_handle().is_none());
}

#[test]
fn same_seed_replays_identically() {
    let play = |seed| {
        let mut session = session(seed);
        session.start_game(GameMode::TimeAttack, 0);
        for _ in 0..5 {
            clear_level(&mut session);
            session.next_level();
        }
        session.state().clone()
    };
    assert_eq!(play(11), play(11));
    assert_ne!(play(11).current_items, play(12).current_items);
}

#[test]
fn reseeded_items_replay_a_level_layout() {
    let mut first = session(21);
    first.start_game(GameMode::Adventure, 0);
    let layout = first.state().current_items.clone();

    let mut replay = session(21);
    replay.reseed_items(99);
    replay.start_game(GameMode::Adventure, 0);
    assert_ne!(replay.state().current_items, layout);

    replay.quit_to_menu();
    replay.reseed_items(21);
    replay.start_game(GameMode::Adventure, 0);
    assert_eq!(replay.state().current_items, layout);
}

#[test]
fn zen_campaign_never_counts_down() {
    let mut session = session(8);
    session.start_game(GameMode::Zen, 0);
    for _ in 0..20 {
        assert_eq!(session.state().time_left, TimeLeft::Unlimited);
        assert!(session.tick_handle().is_none());
        clear_level(&mut session);
        session.next_level();
    }
}

#[test]
fn time_attack_clock_respects_floor() {
    let mut session = session(99);
    session.start_game(GameMode::TimeAttack, 0);
    for _ in 0..40 {
        let limit = session.current_level().unwrap().time_limit;
        let expected = limit.saturating_sub(20).max(30);
        assert_eq!(session.state().time_left, TimeLeft::Finite(expected));
        clear_level(&mut session);
        session.next_level();
    }
}

#[test]
fn daily_challenge_earns_time_bonuses() {
    let mut session = session(5);
    session.start_game(GameMode::Challenge, 0);
    assert!(session.state().is_daily_challenge);
    let transitions = clear_level(&mut session);
    let bonuses: Vec<u32> = transitions
        .iter()
        .flat_map(Transition::signals)
        .filter_map(|signal| match signal {
            Signal::TimeBonus { seconds, .. } => Some(*seconds),
            _ => None,
        })
        .collect();
    let total = session.state().total_items;
    assert_eq!(bonuses.len() as u32, total / 5);
    assert_eq!(bonuses.first(), Some(&5));
    assert!(bonuses.windows(2).all(|pair| pair[1] <= pair[0]));
    assert!(bonuses.iter().all(|seconds| *seconds >= 1));
}
