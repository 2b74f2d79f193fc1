// ═══════════════════════════════════════════════════════════════════════
// Series - many independent matches in parallel, summarised in memory
//
// Every match owns its GameState and a seed derived from the series
// seed, so results do not depend on thread scheduling.
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::{run_game, GameResult, RunError};
use duel_agents::make_agent;
use duel_engine::types::*;
use duel_engine::MatchConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub games: u32,
    pub base_seed: u64,
    /// Agent name understood by `make_agent`.
    pub agent: String,
    pub config: MatchConfig,
    pub max_decisions: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        SeriesConfig {
            games: 100,
            base_seed: 42,
            agent: "random".to_string(),
            config: MatchConfig { shuffle_decks: true, ..MatchConfig::default() },
            max_decisions: 50_000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub agent: String,
    pub games: u32,
    /// From the agent's seat.
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub errors: u32,
    pub avg_turns: f64,
    pub avg_decisions: f64,
}

impl SeriesSummary {
    pub fn win_rate(&self) -> f64 {
        let finished = self.wins + self.losses + self.draws;
        if finished == 0 { 0.0 } else { f64::from(self.wins) / f64::from(finished) }
    }
}

pub fn game_seed(base_seed: u64, index: u32) -> u64 {
    base_seed.wrapping_add(u64::from(index) * 1000)
}

pub fn run_series(series: &SeriesConfig) -> SeriesSummary {
    let results: Vec<Result<GameResult, RunError>> = (0..series.games)
        .into_par_iter()
        .map(|i| {
            let seed = game_seed(series.base_seed, i);
            let config = MatchConfig { seed, ..series.config.clone() };
            let mut agent = make_agent(&series.agent, seed);
            run_game(agent.as_mut(), &config, series.max_decisions)
        })
        .collect();
    summarize(&series.agent, &results)
}

pub fn summarize(agent: &str, results: &[Result<GameResult, RunError>]) -> SeriesSummary {
    let mut summary = SeriesSummary { agent: agent.to_string(), games: results.len() as u32, ..Default::default() };
    let (mut turns, mut decisions) = (0u64, 0u64);

    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(r) => {
                match r.outcome {
                    Outcome::Winner(p) if p == HUMAN => summary.wins += 1,
                    Outcome::Winner(_) => summary.losses += 1,
                    Outcome::Draw => summary.draws += 1,
                }
                turns += u64::from(r.turns);
                decisions += r.decisions as u64;
            }
            Err(e) => {
                summary.errors += 1;
                warn!(game = i + 1, error = %e, "match failed");
            }
        }
    }

    let finished = summary.games - summary.errors;
    if finished > 0 {
        summary.avg_turns = turns as f64 / f64::from(finished);
        summary.avg_decisions = decisions as f64 / f64::from(finished);
    }
    summary
}
