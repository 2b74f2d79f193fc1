// ═══════════════════════════════════════════════════════════════════════
// Game Runner - runs a complete headless match with one agent driving
// the human seat and the scripted opponent on the other
// ═══════════════════════════════════════════════════════════════════════

use duel_agents::Agent;
use duel_engine::engine::{apply_action, Action};
use duel_engine::error::ConfigError;
use duel_engine::invariants::check_invariants;
use duel_engine::render::{NullSink, RenderSink};
use duel_engine::setup::create_initial_state;
use duel_engine::state::GameState;
use duel_engine::templates::StandardTemplates;
use duel_engine::types::*;
use duel_engine::view::player_view;
use duel_engine::MatchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Result of a completed match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub seed: u64,
    pub agent_name: String,
    pub outcome: Outcome,
    /// Global turn counter at the end (both seats counted).
    pub turns: u32,
    pub decisions: usize,
    /// Actions the engine refused.
    pub rejected: usize,
    pub final_health: [u32; 2],
    pub units_left: [usize; 2],
}

impl GameResult {
    /// Outcome from the agent's side of the table.
    pub fn agent_won(&self) -> bool {
        self.outcome == Outcome::Winner(HUMAN)
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("game exceeded {limit} decisions without finishing (turn {turn})")]
    DecisionLimit { limit: usize, turn: u32 },
    #[error("state inconsistent after {action:?}: {message}")]
    Invariant { action: Action, message: String },
}

/// Run a complete match and discard the render stream.
pub fn run_game(agent: &mut dyn Agent, config: &MatchConfig, max_decisions: usize) -> Result<GameResult, RunError> {
    run_game_with_sink(agent, config, max_decisions, &mut NullSink)
}

/// Run a complete match, writing every render command to `out`.
/// Move animations are acknowledged immediately, as a renderer would.
pub fn run_game_with_sink(
    agent: &mut dyn Agent,
    config: &MatchConfig,
    max_decisions: usize, // safety limit against agents that never end a turn
    out: &mut dyn RenderSink,
) -> Result<GameResult, RunError> {
    let mut state = create_initial_state(config, out)?;
    let templates = StandardTemplates::new();
    let mut decisions = 0;
    let mut rejected = 0;

    let outcome = loop {
        if let Some(outcome) = state.outcome {
            break outcome;
        }
        if decisions >= max_decisions {
            return Err(RunError::DecisionLimit { limit: max_decisions, turn: state.turn });
        }
        let action = agent.decide(&player_view(&state, HUMAN));
        decisions += 1;
        if apply_action(&mut state, &templates, action, out).is_err() {
            rejected += 1;
        }
        if let Some(unit) = state.moving_unit {
            let _ = apply_action(&mut state, &templates, Action::UnitStopped { unit }, out);
        }

        if cfg!(debug_assertions) {
            if let Some(v) = check_invariants(&state).into_iter().next() {
                return Err(RunError::Invariant { action, message: v.message });
            }
        }
    };

    let result = build_result(&state, outcome, config.seed, agent.name(), decisions, rejected);
    info!(
        agent = %result.agent_name,
        outcome = %result.outcome,
        turns = result.turns,
        decisions,
        "match finished"
    );
    debug!(rejected, "rejected actions");
    Ok(result)
}

fn build_result(
    state: &GameState,
    outcome: Outcome,
    seed: u64,
    agent: &str,
    decisions: usize,
    rejected: usize,
) -> GameResult {
    GameResult {
        seed,
        agent_name: agent.to_string(),
        outcome,
        turns: state.turn,
        decisions,
        rejected,
        final_health: [state.player(PlayerId::One).health(), state.player(PlayerId::Two).health()],
        units_left: [state.units_of(PlayerId::One).count(), state.units_of(PlayerId::Two).count()],
    }
}
