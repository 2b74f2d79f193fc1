// ═══════════════════════════════════════════════════════════════════════
// Game setup - builds the opening GameState from a MatchConfig
// ═══════════════════════════════════════════════════════════════════════

use crate::board::Board;
use crate::cards::{card_def, CardInstance, Deck};
use crate::config::MatchConfig;
use crate::end_check::check_game_end;
use crate::error::ConfigError;
use crate::feedback;
use crate::player::PlayerState;
use crate::render::RenderSink;
use crate::state::{GameState, Highlights, Selection};
use crate::templates::avatar_template;
use crate::turn::begin_turn;
use crate::types::*;
use crate::unit::{Unit, UnitKind, UnitStats};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::info;

fn build_deck(keys: &[String], ids: &mut IdAllocator) -> Result<Deck, ConfigError> {
    let cards = keys
        .iter()
        .map(|key| {
            card_def(key)
                .map(|def| CardInstance::from_def(ids.card(), def))
                .ok_or_else(|| ConfigError::UnknownCard(key.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Deck::new(cards))
}

/// Create a match ready for the human's first action.
///
/// Avatars are placed, opening hands dealt into slots 1..n, the initial
/// board and stats rendered, and player 1's first turn begun (no draw).
/// A match whose avatars start at zero health is over on creation.
pub fn create_initial_state(config: &MatchConfig, out: &mut dyn RenderSink) -> Result<GameState, ConfigError> {
    config.validate()?;
    let board = Board::new(config.board_width, config.board_height)?;
    let mut ids = IdAllocator::new();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let mut seat = |player: PlayerId| -> Result<PlayerState, ConfigError> {
        let mut deck = build_deck(config.deck(player), &mut ids)?;
        if config.shuffle_decks {
            deck.shuffle(&mut rng);
        }
        Ok(PlayerState::new(player, config.starting_health, config.starting_max_mana, deck))
    };
    let players = [seat(PlayerId::One)?, seat(PlayerId::Two)?];

    let avatar_stats = UnitStats { attack: config.avatar_attack, health: MAX_PLAYER_HEALTH };
    let avatar_ids = [ids.unit(), ids.unit()];
    let mut state = GameState {
        board,
        players,
        units: BTreeMap::new(),
        avatars: avatar_ids,
        current: HUMAN,
        turn: 0,
        selection: Selection::Idle,
        highlights: Highlights::default(),
        hand_hidden: false,
        moving_unit: None,
        outcome: None,
        ids,
    };

    feedback::draw_board(&state, out);
    for player in PlayerId::ALL {
        let id = state.avatar_id(player);
        let mut avatar = Unit::new(id, player, UnitKind::Avatar, avatar_template(player).id, avatar_stats, config.start(player));
        avatar.set_health(config.starting_health);
        state.place_unit(avatar);
        feedback::draw_unit(&state, out, id);
        feedback::show_player_health(&state, out, player);
        feedback::show_mana(&state, out, player);
    }

    for player in PlayerId::ALL {
        let seat = state.player_mut(player);
        for slot in 1..=config.opening_hand {
            if let Some(card) = seat.deck.draw_top() {
                seat.hand.put(slot, card);
            }
        }
    }
    feedback::redraw_hand(&state, out);

    // A zero-health start is decided before anyone acts.
    if check_game_end(&mut state, out).is_none() {
        begin_turn(&mut state, out, HUMAN);
    }
    info!(seed = config.seed, shuffled = config.shuffle_decks, "match created");
    Ok(state)
}
