// ═══════════════════════════════════════════════════════════════════════
// Tests for the rules engine
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::cards::{card_def, creature_stats, CardInstance, Hand};
    use crate::combat::{deal_damage, try_attack};
    use crate::end_check::check_game_end;
    use crate::engine::{apply_action, Action};
    use crate::error::ActionError;
    use crate::invariants::check_invariants;
    use crate::movement::{compute_default_moves, move_unit};
    use crate::opponent::{attack_order, choose_target, play_turn};
    use crate::render::{NullSink, RenderCommand, TraceSink};
    use crate::setup::create_initial_state;
    use crate::state::{GameState, HighlightKind, Selection};
    use crate::summon::try_summon;
    use crate::templates::{StandardTemplates, UnitTemplate};
    use crate::turn::{begin_turn, draw_card, DrawResult};
    use crate::types::*;
    use crate::unit::{Unit, UnitKind, UnitStats};
    use crate::MatchConfig;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // ── Helpers ────────────────────────────────────────────────────────

    fn new_game() -> (GameState, Vec<RenderCommand>) {
        let mut out = Vec::new();
        let state = create_initial_state(&MatchConfig::default(), &mut out).unwrap();
        (state, out)
    }

    fn pos(x: u8, y: u8) -> Position {
        Position::new(x, y)
    }

    /// Place a creature that is free to act this turn.
    fn spawn(state: &mut GameState, owner: PlayerId, at: Position, attack: u32, health: u32) -> UnitId {
        let id = state.ids.unit();
        state.place_unit(Unit::new(id, owner, UnitKind::Creature, "test", UnitStats { attack, health }, at));
        id
    }

    fn set_hand(state: &mut GameState, player: PlayerId, keys: &[&str]) {
        let cards: Vec<CardInstance> = keys
            .iter()
            .map(|k| CardInstance::from_def(state.ids.card(), card_def(k).unwrap()))
            .collect();
        let hand = &mut state.player_mut(player).hand;
        for slot in 1..=HAND_SLOTS {
            hand.remove(slot);
        }
        for (i, card) in cards.into_iter().enumerate() {
            assert!(hand.put(i as u8 + 1, card));
        }
    }

    fn hand_keys(state: &GameState, player: PlayerId) -> Vec<String> {
        state.player(player).hand.iter().map(|(_, c)| c.key.clone()).collect()
    }

    fn set_avatar_health(state: &mut GameState, player: PlayerId, health: u32) {
        let id = state.avatar_id(player);
        state.unit_mut(id).unwrap().set_health(health);
        state.player_mut(player).set_health(health);
    }

    fn notices(out: &[RenderCommand]) -> Vec<String> {
        out.iter()
            .filter_map(|c| match c {
                RenderCommand::Notify { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn act(state: &mut GameState, action: Action) -> (Result<(), ActionError>, Vec<RenderCommand>) {
        let mut out = Vec::new();
        let result = apply_action(state, &StandardTemplates::new(), action, &mut out);
        (result, out)
    }

    fn assert_consistent(state: &GameState) {
        let violations = check_invariants(state);
        assert!(violations.is_empty(), "{:?}", violations);
    }

    fn random_action(rng: &mut ChaCha8Rng, state: &GameState) -> Action {
        match rng.gen_range(0..100) {
            0..=14 => Action::EndTurn,
            15..=34 => Action::CardClicked { slot: rng.gen_range(1..=HAND_SLOTS) },
            35..=39 => Action::OtherClicked,
            40..=59 => {
                // Prefer highlighted tiles so games actually progress.
                let lit: Vec<Position> = state.highlights.all().into_iter().collect();
                if lit.is_empty() {
                    Action::tile(pos(rng.gen_range(1..=BOARD_WIDTH), rng.gen_range(1..=BOARD_HEIGHT)))
                } else {
                    Action::tile(lit[rng.gen_range(0..lit.len())])
                }
            }
            _ => Action::tile(pos(rng.gen_range(1..=BOARD_WIDTH), rng.gen_range(1..=BOARD_HEIGHT))),
        }
    }

    /// Play random clicks until the game ends. Returns actions taken.
    fn play_full_game_random(seed: u64) -> (GameState, usize) {
        let (mut state, _) = new_game();
        let templates = StandardTemplates::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for n in 0..5_000 {
            if state.is_game_over() {
                return (state, n);
            }
            let action = random_action(&mut rng, &state);
            let _ = apply_action(&mut state, &templates, action, &mut NullSink);
            if let Some(id) = state.moving_unit {
                let _ = apply_action(&mut state, &templates, Action::UnitStopped { unit: id }, &mut NullSink);
            }
            assert_consistent(&state);
        }
        panic!("seed {} did not finish", seed);
    }

    // ═════════════════════════════════════════════════════════════════════
    // SETUP TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_initial_state() {
        let (state, _) = new_game();
        assert_eq!(state.current, PlayerId::One);
        assert_eq!(state.turn, 1);
        assert!(state.outcome.is_none());
        assert_eq!(state.avatar(PlayerId::One).unwrap().position, pos(2, 3));
        assert_eq!(state.avatar(PlayerId::Two).unwrap().position, pos(8, 3));
        for p in PlayerId::ALL {
            let avatar = state.avatar(p).unwrap();
            assert_eq!(avatar.health(), 20);
            assert_eq!(avatar.attack(), 2);
            assert!(avatar.is_avatar());
            assert_eq!(state.player(p).health(), 20);
            assert_eq!(state.player(p).hand.len(), 3);
            assert_eq!(state.player(p).deck.len(), 17);
        }
        // First own turn: ceiling 1 grows to 2.
        assert_eq!(state.player(PlayerId::One).mana(), 2);
        assert_eq!(state.player(PlayerId::Two).mana(), 0);
        assert_eq!(hand_keys(&state, PlayerId::One), ["bad_omen", "bad_omen", "horn_of_the_forsaken"]);
        assert_consistent(&state);
    }

    #[test]
    fn test_initial_render() {
        let (_, out) = new_game();
        let tiles = out.iter().filter(|c| matches!(c, RenderCommand::DrawTile { .. })).count();
        assert_eq!(tiles, 45);
        let units = out.iter().filter(|c| matches!(c, RenderCommand::DrawUnit { .. })).count();
        assert_eq!(units, 2);
        // Only the human hand is drawn.
        let cards = out.iter().filter(|c| matches!(c, RenderCommand::DrawCard { .. })).count();
        assert_eq!(cards, 3);
    }

    #[test]
    fn test_config_from_json_overrides() {
        let config = MatchConfig::from_json_str(r#"{ "starting_health": 5, "opening_hand": 1 }"#).unwrap();
        assert_eq!(config.starting_health, 5);
        assert_eq!(config.board_width, 9);
        let state = create_initial_state(&config, &mut NullSink).unwrap();
        assert_eq!(state.player(PlayerId::One).hand.len(), 1);
        assert_eq!(state.avatar(PlayerId::Two).unwrap().health(), 5);
    }

    #[test]
    fn test_config_rejects_unknown_card() {
        let mut config = MatchConfig::default();
        config.player2_deck.push("no_such_card".into());
        assert!(create_initial_state(&config, &mut NullSink).is_err());
    }

    #[test]
    fn test_config_rejects_bad_start() {
        let config = MatchConfig { player2_start: pos(10, 3), ..MatchConfig::default() };
        assert!(config.validate().is_err());
        let config = MatchConfig { player2_start: pos(2, 3), ..MatchConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_starting_health_is_immediate_draw() {
        let config = MatchConfig { starting_health: 0, ..MatchConfig::default() };
        let mut out = Vec::new();
        let mut state = create_initial_state(&config, &mut out).unwrap();
        assert_eq!(state.outcome, Some(Outcome::Draw));
        assert_eq!(notices(&out).last().map(String::as_str), Some("Draw!"));
        assert_consistent(&state);

        let (result, out) = act(&mut state, Action::CardClicked { slot: 1 });
        assert_eq!(result, Err(ActionError::GameOver));
        assert!(out.is_empty());
    }

    #[test]
    fn test_shuffled_decks_are_deterministic() {
        let config = MatchConfig { shuffle_decks: true, seed: 99, ..MatchConfig::default() };
        let a = create_initial_state(&config, &mut NullSink).unwrap();
        let b = create_initial_state(&config, &mut NullSink).unwrap();
        assert_eq!(hand_keys(&a, PlayerId::One), hand_keys(&b, PlayerId::One));
        assert_eq!(hand_keys(&a, PlayerId::Two), hand_keys(&b, PlayerId::Two));
    }

    // ═════════════════════════════════════════════════════════════════════
    // BOARD / UNIT / PLAYER TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_board_put_move_remove() {
        let mut board = Board::new(9, 5).unwrap();
        assert!(board.is_valid(pos(1, 1)));
        assert!(board.is_valid(pos(9, 5)));
        assert!(!board.is_valid(pos(0, 1)));
        assert!(!board.is_valid(pos(10, 5)));

        board.put(pos(3, 3), UnitId(7));
        assert!(board.is_occupied(pos(3, 3)));
        assert_eq!(board.move_unit(pos(3, 3), pos(4, 4)), UnitId(7));
        assert_eq!(board.unit_at(pos(3, 3)), None);
        assert_eq!(board.remove(pos(4, 4)), Some(UnitId(7)));
        assert_eq!(board.remove(pos(4, 4)), None);
    }

    #[test]
    fn test_board_rejects_empty_dimensions() {
        assert!(Board::new(0, 5).is_err());
    }

    #[test]
    #[should_panic]
    fn test_board_put_into_occupied_panics() {
        let mut board = Board::new(9, 5).unwrap();
        board.put(pos(1, 1), UnitId(1));
        board.put(pos(1, 1), UnitId(2));
    }

    #[test]
    #[should_panic]
    fn test_board_move_from_empty_panics() {
        let mut board = Board::new(9, 5).unwrap();
        board.move_unit(pos(1, 1), pos(2, 2));
    }

    #[test]
    #[should_panic]
    fn test_board_out_of_bounds_panics() {
        let board = Board::new(9, 5).unwrap();
        board.is_occupied(pos(10, 1));
    }

    #[test]
    fn test_unit_eligibility() {
        let mut unit = Unit::new(UnitId(1), PlayerId::One, UnitKind::Creature, "t", UnitStats { attack: 1, health: 3 }, pos(1, 1));
        unit.mark_summoned(4);
        assert!(!unit.can_move(4));
        assert!(!unit.can_attack(4));
        assert!(unit.can_move(5));
        unit.mark_moved(5);
        assert!(!unit.can_move(5));
        assert!(unit.can_attack(5));
        unit.mark_attacked(5);
        assert!(!unit.can_attack(5));
        unit.reset_turn_flags();
        assert!(unit.can_move(5));
        assert!(unit.can_attack(5));
    }

    #[test]
    fn test_unit_health_clamps() {
        let mut unit = Unit::new(UnitId(1), PlayerId::One, UnitKind::Creature, "t", UnitStats { attack: 1, health: 3 }, pos(1, 1));
        unit.set_health(10);
        assert_eq!(unit.health(), 3);
        unit.apply_damage(5);
        assert_eq!(unit.health(), 0);
        assert!(unit.is_dead());
    }

    #[test]
    fn test_player_mana_and_health_clamp() {
        let (mut state, _) = new_game();
        let seat = state.player_mut(PlayerId::One);
        seat.set_mana(50);
        assert_eq!(seat.mana(), MAX_MANA);
        seat.set_health(99);
        assert_eq!(seat.health(), MAX_PLAYER_HEALTH);
        seat.set_mana(1);
        assert!(!seat.spend_mana(2));
        assert_eq!(seat.mana(), 1);
        for _ in 0..20 {
            seat.begin_turn();
        }
        assert_eq!(seat.max_mana(), MAX_MANA);
        assert_eq!(seat.mana(), MAX_MANA);
    }

    #[test]
    fn test_hand_compacts_left() {
        let (mut state, _) = new_game();
        set_hand(&mut state, PlayerId::One, &["bad_omen", "gloom_chaser", "shadow_watcher", "rock_pulveriser"]);
        let hand = &mut state.player_mut(PlayerId::One).hand;
        hand.remove(2);
        hand.compact_left();
        let keys: Vec<(u8, String)> = hand.iter().map(|(s, c)| (s, c.key.clone())).collect();
        assert_eq!(
            keys,
            [(1, "bad_omen".to_string()), (2, "shadow_watcher".to_string()), (3, "rock_pulveriser".to_string())]
        );
        assert_eq!(hand.first_empty_slot(), Some(4));
    }

    #[test]
    fn test_hand_rejects_occupied_and_invalid_slots() {
        let mut hand = Hand::new();
        let card = CardInstance::from_def(CardId(1), card_def("bad_omen").unwrap());
        assert!(hand.put(1, card.clone()));
        assert!(!hand.put(1, card.clone()));
        assert!(!hand.put(0, card.clone()));
        assert!(!hand.put(7, card));
    }

    #[test]
    fn test_creature_stats_table() {
        assert_eq!(creature_stats("ironcliffe_guardian"), UnitStats { attack: 3, health: 10 });
        assert_eq!(creature_stats("bad_omen"), UnitStats { attack: 0, health: 1 });
        assert_eq!(creature_stats("unheard_of"), UnitStats { attack: 1, health: 1 });
    }

    // ═════════════════════════════════════════════════════════════════════
    // MOVEMENT TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_default_moves_open_field() {
        let (state, _) = new_game();
        let moves = compute_default_moves(&state, pos(5, 3));
        assert_eq!(
            moves,
            [
                pos(6, 3), pos(4, 3), pos(5, 4), pos(5, 2),
                pos(7, 3), pos(3, 3), pos(5, 5), pos(5, 1),
                pos(6, 4), pos(6, 2), pos(4, 4), pos(4, 2),
            ]
        );
    }

    #[test]
    fn test_default_moves_corner() {
        let (state, _) = new_game();
        let moves = compute_default_moves(&state, pos(1, 1));
        assert_eq!(moves, [pos(2, 1), pos(1, 2), pos(3, 1), pos(1, 3), pos(2, 2)]);
    }

    #[test]
    fn test_two_step_ignores_blocked_middle() {
        let (mut state, _) = new_game();
        spawn(&mut state, PlayerId::Two, pos(6, 3), 1, 1);
        let moves = compute_default_moves(&state, pos(5, 3));
        assert!(!moves.contains(&pos(6, 3)));
        assert!(moves.contains(&pos(7, 3)));
        // Never knight moves or distance-2 diagonals.
        assert!(!moves.contains(&pos(6, 5)));
        assert!(!moves.contains(&pos(7, 5)));
    }

    #[test]
    fn test_move_updates_board_and_marks_unit() {
        let (mut state, _) = new_game();
        let id = spawn(&mut state, PlayerId::One, pos(4, 3), 1, 2);
        let mut out = Vec::new();
        move_unit(&mut state, &mut out, id, pos(5, 4)).unwrap();
        assert_eq!(state.board.unit_at(pos(5, 4)), Some(id));
        assert_eq!(state.board.unit_at(pos(4, 3)), None);
        assert_eq!(state.unit(id).unwrap().position, pos(5, 4));
        assert_eq!(
            out,
            [
                RenderCommand::PlayAnimation { unit: id, animation: Animation::Move },
                RenderCommand::MoveUnitToTile { unit: id, position: pos(5, 4) },
                RenderCommand::PlayAnimation { unit: id, animation: Animation::Idle },
            ]
        );
        assert_eq!(move_unit(&mut state, &mut NullSink, id, pos(5, 3)), Err(ActionError::CannotMove));
        assert_consistent(&state);
    }

    #[test]
    fn test_move_rejects_occupied_and_unreachable() {
        let (mut state, _) = new_game();
        let id = spawn(&mut state, PlayerId::One, pos(4, 3), 1, 2);
        spawn(&mut state, PlayerId::Two, pos(5, 3), 1, 2);
        assert_eq!(move_unit(&mut state, &mut NullSink, id, pos(5, 3)), Err(ActionError::InvalidTarget));
        assert_eq!(move_unit(&mut state, &mut NullSink, id, pos(7, 5)), Err(ActionError::InvalidTarget));
        assert_eq!(state.unit(id).unwrap().position, pos(4, 3));
    }

    #[test]
    fn test_fresh_unit_cannot_move() {
        let (mut state, _) = new_game();
        let id = spawn(&mut state, PlayerId::One, pos(4, 3), 1, 2);
        let turn = state.turn;
        state.unit_mut(id).unwrap().mark_summoned(turn);
        assert_eq!(move_unit(&mut state, &mut NullSink, id, pos(5, 3)), Err(ActionError::CannotMove));
    }

    // ═════════════════════════════════════════════════════════════════════
    // COMBAT TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_attack_kills_without_counter() {
        let (mut state, _) = new_game();
        let attacker = spawn(&mut state, PlayerId::One, pos(4, 3), 3, 3);
        let defender = spawn(&mut state, PlayerId::Two, pos(5, 3), 1, 2);
        let mut out = Vec::new();
        try_attack(&mut state, &mut out, attacker, defender).unwrap();

        assert!(state.unit(defender).is_none());
        assert_eq!(state.board.unit_at(pos(5, 3)), None);
        assert_eq!(state.unit(attacker).unwrap().health(), 3);
        assert_eq!(
            out,
            [
                RenderCommand::PlayAnimation { unit: attacker, animation: Animation::Attack },
                RenderCommand::SetUnitHealth { unit: defender, health: 0 },
                RenderCommand::PlayAnimation { unit: defender, animation: Animation::Death },
                RenderCommand::DeleteUnit { unit: defender },
                RenderCommand::Notify { text: "Unit destroyed".into(), seconds: NOTICE_SECONDS },
                RenderCommand::PlayAnimation { unit: attacker, animation: Animation::Idle },
            ]
        );
        assert_consistent(&state);
    }

    #[test]
    fn test_counterattack_kills_attacker() {
        let (mut state, _) = new_game();
        let attacker = spawn(&mut state, PlayerId::One, pos(4, 3), 1, 3);
        let defender = spawn(&mut state, PlayerId::Two, pos(5, 4), 4, 5);
        let mut out = Vec::new();
        try_attack(&mut state, &mut out, attacker, defender).unwrap();

        assert!(state.unit(attacker).is_none());
        assert_eq!(state.board.unit_at(pos(4, 3)), None);
        assert_eq!(state.unit(defender).unwrap().health(), 4);
        assert_eq!(
            out.last(),
            Some(&RenderCommand::PlayAnimation { unit: defender, animation: Animation::Idle })
        );
        assert!(out.contains(&RenderCommand::PlayAnimation { unit: defender, animation: Animation::Attack }));
        assert_consistent(&state);
    }

    #[test]
    fn test_both_survive_return_to_idle() {
        let (mut state, _) = new_game();
        let attacker = spawn(&mut state, PlayerId::One, pos(4, 3), 1, 5);
        let defender = spawn(&mut state, PlayerId::Two, pos(5, 3), 1, 5);
        let mut out = Vec::new();
        try_attack(&mut state, &mut out, attacker, defender).unwrap();
        assert_eq!(state.unit(attacker).unwrap().health(), 4);
        assert_eq!(state.unit(defender).unwrap().health(), 4);
        let n = out.len();
        assert_eq!(out[n - 2], RenderCommand::PlayAnimation { unit: attacker, animation: Animation::Idle });
        assert_eq!(out[n - 1], RenderCommand::PlayAnimation { unit: defender, animation: Animation::Idle });
    }

    #[test]
    fn test_avatar_death_ends_game() {
        let (mut state, _) = new_game();
        set_avatar_health(&mut state, PlayerId::Two, 2);
        let attacker = spawn(&mut state, PlayerId::One, pos(7, 3), 3, 3);
        let avatar = state.avatar_id(PlayerId::Two);
        let mut out = Vec::new();
        try_attack(&mut state, &mut out, attacker, avatar).unwrap();

        assert_eq!(state.unit(avatar).unwrap().health(), 0);
        assert_eq!(state.player(PlayerId::Two).health(), 0);
        assert_eq!(state.board.unit_at(pos(8, 3)), Some(avatar));
        assert_eq!(state.unit(attacker).unwrap().health(), 3);
        assert_eq!(state.outcome, Some(Outcome::Winner(PlayerId::One)));
        assert!(notices(&out).contains(&"You win!".to_string()));

        let (result, out) = act(&mut state, Action::EndTurn);
        assert_eq!(result, Err(ActionError::GameOver));
        assert!(out.is_empty());
        let (result, _) = act(&mut state, Action::CardClicked { slot: 1 });
        assert_eq!(result, Err(ActionError::GameOver));
        assert_eq!(try_attack(&mut state, &mut NullSink, attacker, avatar), Err(ActionError::GameOver));
        assert_consistent(&state);
    }

    #[test]
    fn test_attack_range_is_chebyshev() {
        let (mut state, _) = new_game();
        let attacker = spawn(&mut state, PlayerId::One, pos(4, 3), 1, 5);
        let diagonal = spawn(&mut state, PlayerId::Two, pos(5, 4), 1, 5);
        let far = spawn(&mut state, PlayerId::Two, pos(6, 3), 1, 5);
        assert_eq!(try_attack(&mut state, &mut NullSink, attacker, far), Err(ActionError::OutOfRange));
        assert!(try_attack(&mut state, &mut NullSink, attacker, diagonal).is_ok());
    }

    #[test]
    fn test_attack_rejections() {
        let (mut state, _) = new_game();
        let attacker = spawn(&mut state, PlayerId::One, pos(4, 3), 1, 5);
        let friend = spawn(&mut state, PlayerId::One, pos(4, 4), 1, 5);
        let enemy = spawn(&mut state, PlayerId::Two, pos(5, 3), 1, 5);
        assert_eq!(try_attack(&mut state, &mut NullSink, attacker, friend), Err(ActionError::FriendlyTarget));
        try_attack(&mut state, &mut NullSink, attacker, enemy).unwrap();
        assert_eq!(try_attack(&mut state, &mut NullSink, attacker, enemy), Err(ActionError::CannotAttack));

        let turn = state.turn;
        state.unit_mut(friend).unwrap().mark_summoned(turn);
        let enemy_health = state.unit(enemy).unwrap().health();
        assert_eq!(try_attack(&mut state, &mut NullSink, friend, enemy), Err(ActionError::CannotAttack));
        assert_eq!(state.unit(enemy).unwrap().health(), enemy_health);
    }

    #[test]
    fn test_zero_damage_is_noop() {
        let (mut state, _) = new_game();
        let id = spawn(&mut state, PlayerId::Two, pos(5, 3), 1, 2);
        let mut out = Vec::new();
        deal_damage(&mut state, &mut out, id, 0);
        assert!(out.is_empty());
        assert_eq!(state.unit(id).unwrap().health(), 2);
    }

    // ═════════════════════════════════════════════════════════════════════
    // SUMMON / CARD PLAY TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_summon_removes_card_and_compacts() {
        let (mut state, _) = new_game();
        set_hand(&mut state, PlayerId::One, &["bad_omen", "gloom_chaser", "shadow_watcher", "rock_pulveriser"]);
        state.player_mut(PlayerId::One).set_mana(9);
        let id = try_summon(&mut state, &StandardTemplates::new(), &mut NullSink, PlayerId::One, 2, pos(3, 3)).unwrap();

        assert_eq!(hand_keys(&state, PlayerId::One), ["bad_omen", "shadow_watcher", "rock_pulveriser"]);
        assert!(state.player(PlayerId::One).hand.get(4).is_none());
        assert_eq!(state.player(PlayerId::One).mana(), 7);
        let unit = state.unit(id).unwrap();
        assert_eq!((unit.attack(), unit.health()), (3, 1));
        assert_eq!(unit.owner, PlayerId::One);
        assert_eq!(unit.template, "units/gloom_chaser");
        assert!(!unit.can_move(state.turn));
        assert!(!unit.can_attack(state.turn));
        assert!(unit.can_move(state.turn + 1));
        assert_consistent(&state);
    }

    #[test]
    fn test_summon_without_mana_is_rejected() {
        let (mut state, _) = new_game();
        set_hand(&mut state, PlayerId::One, &["gloom_chaser"]);
        state.player_mut(PlayerId::One).set_mana(0);

        let (result, _) = act(&mut state, Action::CardClicked { slot: 1 });
        assert_eq!(result, Err(ActionError::NotEnoughMana { cost: 2, available: 0 }));
        assert_eq!(state.selection, Selection::Idle);

        let direct = try_summon(&mut state, &StandardTemplates::new(), &mut NullSink, PlayerId::One, 1, pos(3, 3));
        assert_eq!(direct, Err(ActionError::NotEnoughMana { cost: 2, available: 0 }));
        assert_eq!(hand_keys(&state, PlayerId::One), ["gloom_chaser"]);
        assert_eq!(state.player(PlayerId::One).mana(), 0);
        assert_eq!(state.units.len(), 2);
    }

    #[test]
    fn test_missing_template_refunds_mana() {
        let (mut state, _) = new_game();
        set_hand(&mut state, PlayerId::One, &["gloom_chaser"]);
        let before = state.player(PlayerId::One).mana();
        let result = try_summon(&mut state, &StandardTemplates::empty(), &mut NullSink, PlayerId::One, 1, pos(3, 3));
        assert_eq!(result, Err(ActionError::TemplateNotFound("gloom_chaser".into())));
        assert_eq!(state.player(PlayerId::One).mana(), before);
        assert_eq!(hand_keys(&state, PlayerId::One), ["gloom_chaser"]);
        assert!(!state.board.is_occupied(pos(3, 3)));
    }

    #[test]
    fn test_summon_spell_card_rejected_without_side_effects() {
        let (mut state, _) = new_game();
        set_hand(&mut state, PlayerId::One, &["horn_of_the_forsaken"]);
        let mut out = Vec::new();
        let result = try_summon(&mut state, &StandardTemplates::new(), &mut out, PlayerId::One, 1, pos(3, 3));
        assert_eq!(result, Err(ActionError::NotACreature("horn_of_the_forsaken".into())));
        assert!(out.is_empty(), "{:?}", out);
        assert_eq!(state.player(PlayerId::One).mana(), 2);
        assert_eq!(hand_keys(&state, PlayerId::One), ["horn_of_the_forsaken"]);
    }

    #[test]
    fn test_summon_rejects_tile_away_from_own_units() {
        let (mut state, _) = new_game();
        let result = try_summon(&mut state, &StandardTemplates::new(), &mut NullSink, PlayerId::One, 1, pos(5, 3));
        assert_eq!(result, Err(ActionError::InvalidTarget));
        assert_eq!(state.player(PlayerId::One).mana(), 2);
    }

    #[test]
    fn test_summon_through_clicks() {
        let (mut state, _) = new_game();
        let (result, _) = act(&mut state, Action::CardClicked { slot: 1 });
        result.unwrap();
        assert_eq!(state.selection, Selection::Card(1));
        assert_eq!(state.highlights.summons.len(), 8);
        assert!(state.highlights.contains(HighlightKind::Summon, pos(3, 3)));

        let (result, out) = act(&mut state, Action::TileClicked { x: 3, y: 3 });
        result.unwrap();
        let unit = state.unit_at(pos(3, 3)).unwrap();
        assert_eq!(unit.template, "units/bad_omen");
        assert_eq!(state.selection, Selection::Idle);
        assert!(state.highlights.is_empty());
        assert_eq!(state.player(PlayerId::One).mana(), 1);
        assert_eq!(hand_keys(&state, PlayerId::One), ["bad_omen", "horn_of_the_forsaken"]);
        assert!(notices(&out).contains(&"Summoned!".to_string()));
    }

    #[test]
    fn test_card_click_toggles_selection() {
        let (mut state, _) = new_game();
        act(&mut state, Action::CardClicked { slot: 1 }).0.unwrap();
        assert_eq!(state.selection, Selection::Card(1));
        act(&mut state, Action::CardClicked { slot: 1 }).0.unwrap();
        assert_eq!(state.selection, Selection::Idle);
        assert!(state.highlights.is_empty());
        act(&mut state, Action::CardClicked { slot: 6 }).0.unwrap();
        assert_eq!(state.selection, Selection::Idle);
    }

    #[test]
    fn test_spell_cast_on_enemy() {
        let (mut state, _) = new_game();
        act(&mut state, Action::CardClicked { slot: 3 }).0.unwrap();
        assert_eq!(state.selection, Selection::Spell(3));
        assert!(state.highlights.contains(HighlightKind::SpellTarget, pos(8, 3)));

        let (result, out) = act(&mut state, Action::TileClicked { x: 8, y: 3 });
        result.unwrap();
        assert_eq!(state.player(PlayerId::One).mana(), 1);
        assert_eq!(hand_keys(&state, PlayerId::One), ["bad_omen", "bad_omen"]);
        assert_eq!(state.selection, Selection::Idle);
        assert!(state.highlights.is_empty());
        assert!(notices(&out).contains(&"Spell played: Horn of the Forsaken".to_string()));
        assert_eq!(state.avatar(PlayerId::Two).unwrap().health(), 20);
    }

    #[test]
    fn test_spell_targeting_cancelled_by_other_tile() {
        let (mut state, _) = new_game();
        act(&mut state, Action::CardClicked { slot: 3 }).0.unwrap();
        act(&mut state, Action::TileClicked { x: 5, y: 1 }).0.unwrap();
        assert_eq!(state.selection, Selection::Idle);
        assert!(state.highlights.is_empty());
        assert_eq!(state.player(PlayerId::One).hand.len(), 3);
        assert_eq!(state.player(PlayerId::One).mana(), 2);
    }

    // ═════════════════════════════════════════════════════════════════════
    // SELECTION / DISPATCH TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_select_and_move_avatar() {
        let (mut state, _) = new_game();
        act(&mut state, Action::TileClicked { x: 2, y: 3 }).0.unwrap();
        let avatar = state.avatar_id(PlayerId::One);
        assert_eq!(state.selection, Selection::Unit(avatar));
        assert_eq!(state.highlights.moves.len(), 11);
        assert_eq!(state.highlights.focus, Some(pos(2, 3)));
        assert!(state.highlights.attacks.is_empty());
        assert!(state.hand_hidden);

        act(&mut state, Action::TileClicked { x: 4, y: 3 }).0.unwrap();
        assert_eq!(state.board.unit_at(pos(4, 3)), Some(avatar));
        assert_eq!(state.moving_unit, Some(avatar));
        assert!(!state.hand_hidden);
        assert!(state.highlights.is_empty());

        act(&mut state, Action::UnitStopped { unit: avatar }).0.unwrap();
        assert_eq!(state.moving_unit, None);
        assert_consistent(&state);
    }

    #[test]
    fn test_select_shows_attack_targets() {
        let (mut state, _) = new_game();
        let mine = spawn(&mut state, PlayerId::One, pos(4, 3), 2, 2);
        spawn(&mut state, PlayerId::Two, pos(5, 2), 1, 1);
        act(&mut state, Action::TileClicked { x: 4, y: 3 }).0.unwrap();
        assert_eq!(state.selection, Selection::Unit(mine));
        assert!(state.highlights.contains(HighlightKind::Attack, pos(5, 2)));

        act(&mut state, Action::TileClicked { x: 5, y: 2 }).0.unwrap();
        assert!(state.unit_at(pos(5, 2)).is_none());
        assert_eq!(state.selection, Selection::Idle);
    }

    #[test]
    fn test_select_fresh_unit_notifies() {
        let (mut state, _) = new_game();
        let id = spawn(&mut state, PlayerId::One, pos(4, 3), 2, 2);
        let turn = state.turn;
        state.unit_mut(id).unwrap().mark_summoned(turn);
        let (result, out) = act(&mut state, Action::TileClicked { x: 4, y: 3 });
        result.unwrap();
        assert!(state.highlights.moves.is_empty());
        assert_eq!(state.highlights.focus, Some(pos(4, 3)));
        assert!(notices(&out).contains(&"Summoned units can't move/attack this turn".to_string()));
    }

    #[test]
    fn test_other_click_clears_everything() {
        let (mut state, _) = new_game();
        act(&mut state, Action::TileClicked { x: 2, y: 3 }).0.unwrap();
        let (result, out) = act(&mut state, Action::OtherClicked);
        result.unwrap();
        assert_eq!(state.selection, Selection::Idle);
        assert!(state.highlights.is_empty());
        assert!(!state.hand_hidden);
        assert!(out.iter().any(|c| matches!(c, RenderCommand::DrawTile { mode: TileMode::Normal, .. })));
    }

    #[test]
    fn test_enemy_click_clears_selection() {
        let (mut state, _) = new_game();
        act(&mut state, Action::TileClicked { x: 2, y: 3 }).0.unwrap();
        act(&mut state, Action::TileClicked { x: 8, y: 3 }).0.unwrap();
        assert_eq!(state.selection, Selection::Idle);
        assert!(state.highlights.is_empty());
    }

    #[test]
    fn test_actions_rejected_off_turn() {
        let (mut state, _) = new_game();
        state.current = PlayerId::Two;
        let (result, out) = act(&mut state, Action::CardClicked { slot: 1 });
        assert_eq!(result, Err(ActionError::NotYourTurn));
        assert_eq!(notices(&out), ["Not your turn"]);
        assert_eq!(act(&mut state, Action::EndTurn).0, Err(ActionError::NotYourTurn));
    }

    #[test]
    fn test_out_of_bounds_click_is_soft_failure() {
        let (mut state, _) = new_game();
        let (result, _) = act(&mut state, Action::TileClicked { x: 0, y: 9 });
        assert_eq!(result, Err(ActionError::InvalidTarget));
        assert_consistent(&state);
    }

    #[test]
    fn test_stale_unit_stopped_is_ignored() {
        let (mut state, _) = new_game();
        let (result, out) = act(&mut state, Action::UnitStopped { unit: UnitId(999) });
        assert!(result.is_ok());
        assert!(out.is_empty());
    }

    // ═════════════════════════════════════════════════════════════════════
    // TURN TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_end_turn_runs_opponent_and_returns_control() {
        let (mut state, _) = new_game();
        let (result, out) = act(&mut state, Action::EndTurn);
        result.unwrap();

        assert_eq!(state.current, PlayerId::One);
        assert_eq!(state.turn, 3);
        assert_eq!(state.player(PlayerId::One).mana(), 3);
        assert_eq!(state.player(PlayerId::One).hand.len(), 4);
        assert_eq!(state.player(PlayerId::One).turns_taken, 2);
        assert_eq!(state.player(PlayerId::Two).turns_taken, 1);
        // Opponent had 2 mana, summoned Skyrock Golem next to its avatar.
        let golem = state.unit_at(pos(7, 2)).unwrap();
        assert_eq!(golem.owner, PlayerId::Two);
        assert_eq!(golem.template, "units/skyrock_golem");
        assert_eq!(state.player(PlayerId::Two).mana(), 0);
        assert_eq!(hand_keys(&state, PlayerId::Two), ["skyrock_golem", "swamp_entangler", "swamp_entangler"]);
        assert_eq!(notices(&out).last().map(String::as_str), Some("Your turn"));
        assert_consistent(&state);
    }

    #[test]
    fn test_end_turn_forfeits_mana() {
        let (mut state, _) = new_game();
        let mut out = Vec::new();
        apply_action(&mut state, &StandardTemplates::empty(), Action::EndTurn, &mut out).unwrap();
        let forfeits: Vec<&RenderCommand> = out
            .iter()
            .filter(|c| matches!(c, RenderCommand::SetPlayerMana { mana: 0, .. }))
            .collect();
        assert!(forfeits.contains(&&RenderCommand::SetPlayerMana { player: PlayerId::One, mana: 0 }));
        assert!(forfeits.contains(&&RenderCommand::SetPlayerMana { player: PlayerId::Two, mana: 0 }));
        // Without templates the opponent could not summon; mana still forfeited.
        assert_eq!(state.player(PlayerId::Two).mana(), 0);
        assert_eq!(state.units.len(), 2);
    }

    #[test]
    fn test_flags_reset_only_for_owner() {
        let (mut state, _) = new_game();
        let mine = spawn(&mut state, PlayerId::One, pos(4, 3), 1, 1);
        let theirs = spawn(&mut state, PlayerId::Two, pos(6, 3), 1, 1);
        let next = state.turn + 1;
        state.unit_mut(mine).unwrap().mark_moved(next);
        state.unit_mut(theirs).unwrap().mark_moved(next);
        begin_turn(&mut state, &mut NullSink, PlayerId::One);
        assert_eq!(state.turn, next);
        assert!(state.unit(mine).unwrap().can_move(next));
        assert!(!state.unit(theirs).unwrap().can_move(next));
    }

    #[test]
    fn test_fatigue_on_empty_deck() {
        let (mut state, _) = new_game();
        while state.player_mut(PlayerId::One).deck.draw_top().is_some() {}
        let mut out = Vec::new();
        assert_eq!(draw_card(&mut state, &mut out, PlayerId::One), DrawResult::Fatigue);
        assert_eq!(state.avatar(PlayerId::One).unwrap().health(), 19);
        assert_eq!(state.player(PlayerId::One).health(), 19);
        assert_eq!(state.player(PlayerId::One).hand.len(), 3);
        assert_eq!(notices(&out), ["Fatigue: 1 damage"]);
    }

    #[test]
    fn test_fatigue_can_end_game() {
        let (mut state, _) = new_game();
        set_avatar_health(&mut state, PlayerId::One, 1);
        while state.player_mut(PlayerId::One).deck.draw_top().is_some() {}
        draw_card(&mut state, &mut NullSink, PlayerId::One);
        assert_eq!(state.outcome, Some(Outcome::Winner(PlayerId::Two)));
    }

    #[test]
    fn test_full_hand_burns_drawn_card() {
        let (mut state, _) = new_game();
        let keys = ["bad_omen", "gloom_chaser", "shadow_watcher", "rock_pulveriser", "shadowdancer", "dark_terminus"];
        set_hand(&mut state, PlayerId::One, &keys);
        let deck_before = state.player(PlayerId::One).deck.len();
        act(&mut state, Action::EndTurn).0.unwrap();
        assert_eq!(hand_keys(&state, PlayerId::One), keys);
        assert_eq!(state.player(PlayerId::One).deck.len(), deck_before - 1);
    }

    // ═════════════════════════════════════════════════════════════════════
    // GAME END TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_end_check_is_idempotent() {
        let (mut state, _) = new_game();
        set_avatar_health(&mut state, PlayerId::One, 0);
        let mut first = Vec::new();
        assert_eq!(check_game_end(&mut state, &mut first), Some(Outcome::Winner(PlayerId::Two)));
        assert_eq!(notices(&first), ["You lose!"]);

        let mut second = Vec::new();
        assert_eq!(check_game_end(&mut state, &mut second), Some(Outcome::Winner(PlayerId::Two)));
        assert!(second.is_empty());
    }

    #[test]
    fn test_end_check_draw() {
        let (mut state, _) = new_game();
        set_avatar_health(&mut state, PlayerId::One, 0);
        set_avatar_health(&mut state, PlayerId::Two, 0);
        let mut out = Vec::new();
        assert_eq!(check_game_end(&mut state, &mut out), Some(Outcome::Draw));
        assert_eq!(notices(&out).last().map(String::as_str), Some("Draw!"));
    }

    #[test]
    fn test_end_check_clears_selection() {
        let (mut state, _) = new_game();
        act(&mut state, Action::TileClicked { x: 2, y: 3 }).0.unwrap();
        set_avatar_health(&mut state, PlayerId::Two, 0);
        check_game_end(&mut state, &mut NullSink);
        assert_eq!(state.selection, Selection::Idle);
        assert!(state.highlights.is_empty());
    }

    #[test]
    fn test_end_check_noop_while_alive() {
        let (mut state, _) = new_game();
        let mut out = Vec::new();
        assert_eq!(check_game_end(&mut state, &mut out), None);
        assert!(out.is_empty());
    }

    // ═════════════════════════════════════════════════════════════════════
    // SCRIPTED OPPONENT TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_opponent_prefers_avatar() {
        let (mut state, _) = new_game();
        let attacker = spawn(&mut state, PlayerId::Two, pos(3, 3), 2, 5);
        spawn(&mut state, PlayerId::One, pos(4, 3), 1, 1);
        assert_eq!(choose_target(&state, attacker), Some(state.avatar_id(PlayerId::One)));
    }

    #[test]
    fn test_opponent_targets_weakest() {
        let (mut state, _) = new_game();
        let attacker = spawn(&mut state, PlayerId::Two, pos(5, 3), 2, 5);
        spawn(&mut state, PlayerId::One, pos(4, 3), 1, 3);
        let weak = spawn(&mut state, PlayerId::One, pos(6, 3), 1, 1);
        assert_eq!(choose_target(&state, attacker), Some(weak));
    }

    #[test]
    fn test_attack_order_is_stable() {
        let (mut state, _) = new_game();
        let strong = spawn(&mut state, PlayerId::Two, pos(7, 1), 3, 1);
        let peer = spawn(&mut state, PlayerId::Two, pos(7, 5), 2, 1);
        let avatar = state.avatar_id(PlayerId::Two);
        assert_eq!(attack_order(&state), [strong, avatar, peer]);
    }

    #[test]
    fn test_opponent_idle_on_human_turn() {
        let (mut state, _) = new_game();
        let mut out = Vec::new();
        play_turn(&mut state, &StandardTemplates::new(), &mut out);
        assert!(out.is_empty());
        assert_eq!(state.units.len(), 2);
    }

    #[test]
    fn test_opponent_attacks_adjacent_avatar() {
        let (mut state, _) = new_game();
        state.current = PlayerId::Two;
        state.player_mut(PlayerId::Two).set_mana(0);
        let brute = spawn(&mut state, PlayerId::Two, pos(3, 3), 5, 9);
        play_turn(&mut state, &StandardTemplates::new(), &mut NullSink);
        assert_eq!(state.avatar(PlayerId::One).unwrap().health(), 15);
        // Avatar counterattacks for 2.
        assert_eq!(state.unit(brute).unwrap().health(), 7);
        assert!(!state.unit(brute).unwrap().can_attack(state.turn));
    }

    #[test]
    fn test_opponent_refunds_when_summon_fails() {
        let (mut state, _) = new_game();
        state.current = PlayerId::Two;
        state.player_mut(PlayerId::Two).set_mana(5);
        play_turn(&mut state, &StandardTemplates::empty(), &mut NullSink);
        assert_eq!(state.player(PlayerId::Two).mana(), 5);
        assert_eq!(state.units.len(), 2);
        assert_eq!(state.player(PlayerId::Two).hand.len(), 3);
    }

    // ═════════════════════════════════════════════════════════════════════
    // RENDER / TEMPLATE TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_render_command_json_shape() {
        let command = RenderCommand::DrawTile { position: pos(3, 4), mode: TileMode::Summon };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["command"], "draw_tile");
        assert_eq!(json["position"]["x"], 3);
        assert_eq!(TileMode::Summon.code(), TileMode::Move.code());
        assert_eq!(TileMode::SpellTarget.code(), TileMode::Attack.code());
    }

    #[test]
    fn test_action_json_round_trip() {
        let action: Action = serde_json::from_str(r#"{ "type": "tile_clicked", "x": 4, "y": 2 }"#).unwrap();
        assert_eq!(action, Action::tile(pos(4, 2)));
    }

    #[test]
    fn test_trace_sink_forwards() {
        let mut sink = TraceSink::new(Vec::new());
        let (mut state, _) = new_game();
        apply_action(&mut state, &StandardTemplates::new(), Action::OtherClicked, &mut sink).unwrap();
        assert!(!sink.into_inner().is_empty());
    }

    #[test]
    fn test_custom_template_used_for_summon() {
        let mut templates = StandardTemplates::empty();
        assert!(templates.is_empty());
        templates.insert("bad_omen", UnitTemplate { id: "units/omen_alt".into() });
        assert_eq!(templates.len(), 1);
        let (mut state, _) = new_game();
        let id = try_summon(&mut state, &templates, &mut NullSink, PlayerId::One, 1, pos(3, 3)).unwrap();
        assert_eq!(state.unit(id).unwrap().template, "units/omen_alt");
    }

    // ═════════════════════════════════════════════════════════════════════
    // FULL GAME TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_full_games_finish_consistently() {
        for seed in 0..20 {
            let (state, actions) = play_full_game_random(seed);
            assert!(state.is_game_over(), "seed {}", seed);
            assert!(actions > 0);
        }
    }

    #[test]
    fn test_full_game_is_deterministic() {
        let (a, na) = play_full_game_random(7);
        let (b, nb) = play_full_game_random(7);
        assert_eq!(na, nb);
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.turn, b.turn);
    }

    #[test]
    fn test_passive_human_game_still_ends() {
        let (mut state, _) = new_game();
        for _ in 0..200 {
            if state.is_game_over() {
                break;
            }
            act(&mut state, Action::EndTurn).0.unwrap();
            assert_consistent(&state);
        }
        // Fatigue guarantees an end even when nobody attacks.
        assert!(state.is_game_over());
    }
}
