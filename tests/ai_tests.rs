//! AI driver integration tests: untrusted suggestion batches, the greedy
//! suggester and whole games played by it.

use rustc_hash::FxHashSet;

use property_deal::ai::{parse_suggestions, run_ai_turn, AiStep, AiTurn, GreedySuggester, MoveSuggester, NoPause, SuggestedMove};
use property_deal::cards::{ActionKind, Card, CardId, PropertyColor};
use property_deal::core::{GameMode, GameRng, GameState, MoveKind, Phase, PlayerId, SuggestionError};
use property_deal::rules::{DealRules, RulesEngine};
use property_deal::zones;

/// A vs-AI game on the AI's play phase, with the AI holding `hand`.
fn ai_playing(rules: &DealRules, hand: Vec<Card>) -> GameState {
    let deck = (1000..1040).map(|i| Card::money(CardId::new(i), 1)).collect();
    let dealt = GameState::deal(rules.config(), GameMode::VsAi, deck);
    let mut state = rules.end_turn(&rules.start_turn(&dealt));
    state.players[PlayerId::SECOND].hand = hand.into_iter().collect();
    let state = rules.start_turn(&state);
    assert_eq!(state.active_player, PlayerId::SECOND);
    assert!(state.active().is_ai);
    state
}

fn assert_cards_conserved(state: &GameState, expected: usize) {
    let mut seen = FxHashSet::default();
    let mut count = 0;
    for card in state.all_cards() {
        assert!(seen.insert(card.id), "{} appears twice", card.id);
        count += 1;
    }
    assert_eq!(count, expected);
}

// =============================================================================
// Untrusted Batches
// =============================================================================

#[test]
fn test_json_batch_with_junk() {
    let rules = DealRules::default();
    let state = ai_playing(
        &rules,
        vec![Card::money(CardId::new(1), 2), Card::property(CardId::new(2), "Whitehall", PropertyColor::Pink, 2)],
    );
    let payload = r#"[
        {"action": "BANK", "cardId": "card-404"},
        {"action": "TELEPORT", "cardId": "card-1"},
        {"action": "PROPERTY", "cardId": "card-1"},
        {"action": "BANK", "cardId": "card-1"},
        {"action": "PROPERTY", "cardId": 2},
        {"action": "END_TURN"},
        {"action": "BANK", "cardId": "card-1012"}
    ]"#;
    let batch = parse_suggestions(payload).unwrap();
    let mut suggester = move |_: &GameState| -> Result<Vec<SuggestedMove>, SuggestionError> { Ok(batch.clone()) };

    let after = run_ai_turn(&rules, &state, &mut suggester, &mut NoPause);

    let ai = &after.players[PlayerId::SECOND];
    assert_eq!(ai.bank_total(), 2);
    assert_eq!(ai.properties.len(), 1);
    // The move after END_TURN never ran
    assert!(state.players[PlayerId::SECOND].has_in_hand(CardId::new(1012)));
    assert!(ai.has_in_hand(CardId::new(1012)));
    assert_eq!(after.active_player, PlayerId::FIRST);
    assert_eq!(after.phase, Phase::StartTurn);
}

#[test]
fn test_failed_suggester_ends_turn_untouched() {
    let rules = DealRules::default();
    let state = ai_playing(&rules, vec![Card::money(CardId::new(1), 2)]);
    let mut offline = |_: &GameState| -> Result<Vec<SuggestedMove>, SuggestionError> {
        Err(SuggestionError::Unavailable("offline".into()))
    };

    let after = run_ai_turn(&rules, &state, &mut offline, &mut NoPause);

    assert_eq!(after.players[PlayerId::SECOND], state.players[PlayerId::SECOND]);
    assert_eq!(after.active_player, PlayerId::FIRST);
    assert_eq!(after.logs[0], "Turn change: Player 1's turn.");
}

#[test]
fn test_abandoned_turn_still_ends() {
    let rules = DealRules::default();
    let state = ai_playing(&rules, vec![Card::money(CardId::new(1), 2), Card::money(CardId::new(2), 3)]);
    let mut turn = AiTurn::from_batch(
        PlayerId::SECOND,
        vec![
            SuggestedMove::play(MoveKind::Bank, CardId::new(1)),
            SuggestedMove::play(MoveKind::Bank, CardId::new(2)),
        ],
    );

    let AiStep::Applied { state: live, .. } = turn.step(&rules, &state) else {
        panic!("first move should apply");
    };
    let after = turn.finish(&rules, &live);

    assert_eq!(after.players[PlayerId::SECOND].bank_total(), 2);
    assert_eq!(after.active_player, PlayerId::FIRST);
}

#[test]
fn test_winning_move_stops_the_batch() {
    let rules = DealRules::default();
    let mut state = ai_playing(
        &rules,
        vec![
            Card::property(CardId::new(1), "Water Works", PropertyColor::Utility, 2),
            Card::money(CardId::new(2), 1),
        ],
    );
    let ai = &mut state.players[PlayerId::SECOND];
    for (id, color) in [(10, PropertyColor::Brown), (11, PropertyColor::Brown), (12, PropertyColor::DarkBlue)] {
        zones::add_to_set(ai, Card::property(CardId::new(id), "Lot", color, 1));
    }
    for (id, color) in [(13, PropertyColor::DarkBlue), (14, PropertyColor::Utility)] {
        zones::add_to_set(ai, Card::property(CardId::new(id), "Lot", color, 1));
    }
    let batch = vec![
        SuggestedMove::play(MoveKind::Property, CardId::new(1)),
        SuggestedMove::play(MoveKind::Bank, CardId::new(2)),
    ];
    let mut suggester = move |_: &GameState| -> Result<Vec<SuggestedMove>, SuggestionError> { Ok(batch.clone()) };

    let after = run_ai_turn(&rules, &state, &mut suggester, &mut NoPause);

    assert_eq!(after.winner.as_deref(), Some("Computer"));
    assert_eq!(after.phase, Phase::GameOver);
    assert!(after.players[PlayerId::SECOND].has_in_hand(CardId::new(2)));
}

// =============================================================================
// Greedy Suggester
// =============================================================================

#[test]
fn test_greedy_completes_sets_first() {
    let rules = DealRules::default();
    let mut state = ai_playing(
        &rules,
        vec![
            Card::money(CardId::new(1), 10),
            Card::property(CardId::new(2), "Old Kent Road", PropertyColor::Brown, 1),
        ],
    );
    zones::add_to_set(
        &mut state.players[PlayerId::SECOND],
        Card::property(CardId::new(3), "Whitechapel Road", PropertyColor::Brown, 1),
    );

    let batch = GreedySuggester::new(rules.clone()).suggest(&state).unwrap();

    assert_eq!(batch[0], SuggestedMove::play(MoveKind::Property, CardId::new(2)));
    assert_eq!(batch.last(), Some(&SuggestedMove::end_turn()));
    assert!(batch.len() <= usize::from(rules.config().actions_per_turn) + 1);
}

#[test]
fn test_greedy_skips_pointless_actions() {
    let rules = DealRules::default();
    let state = ai_playing(&rules, vec![Card::action(CardId::new(1), ActionKind::SlyDeal)]);

    let batch = GreedySuggester::new(rules).suggest(&state).unwrap();

    assert!(!batch.contains(&SuggestedMove::play(MoveKind::ActionPlay, CardId::new(1))));
}

#[test]
fn test_greedy_self_play_conserves_cards() {
    let rules = DealRules::default();
    let total = rules.catalog().len();
    let mut suggester = GreedySuggester::new(rules.clone());
    let mut state = rules.new_game(GameMode::VsAi, &mut GameRng::new(99));
    assert_cards_conserved(&state, total);

    for _ in 0..120 {
        if state.is_over() {
            break;
        }
        state = rules.start_turn(&state);
        state = run_ai_turn(&rules, &state, &mut suggester, &mut NoPause);
        assert_cards_conserved(&state, total);
        assert!(state.check_shape().is_ok());
    }

    if let Some(result) = rules.is_terminal(&state) {
        let winner = state.winner.as_deref().unwrap();
        assert!(PlayerId::all().any(|p| result.is_winner(p) && state.players[p].name == winner));
        assert!(state.active().complete_sets() >= rules.config().sets_to_win);
    }
}

#[test]
fn test_same_seed_same_game() {
    let rules = DealRules::default();
    let play = |seed| {
        let mut suggester = GreedySuggester::new(rules.clone());
        let mut state = rules.new_game(GameMode::VsAi, &mut GameRng::new(seed));
        for _ in 0..20 {
            state = rules.start_turn(&state);
            state = run_ai_turn(&rules, &state, &mut suggester, &mut NoPause);
        }
        state
    };

    assert_eq!(play(5), play(5));
}
