pub mod runner;
pub mod series;

pub use runner::{run_game, run_game_with_sink, GameResult, RunError};
pub use series::{run_series, SeriesConfig, SeriesSummary};

#[cfg(test)]
mod tests {
    use super::*;
    use duel_agents::{AggressiveAgent, RandomAgent};
    use duel_engine::render::RenderCommand;
    use duel_engine::types::*;
    use duel_engine::MatchConfig;

    fn shuffled(seed: u64) -> MatchConfig {
        MatchConfig { shuffle_decks: true, seed, ..MatchConfig::default() }
    }

    #[test]
    fn test_run_game_finishes_across_seeds() {
        for seed in 0..8 {
            let mut agent = RandomAgent::new(seed);
            let result = run_game(&mut agent, &shuffled(seed), 50_000).unwrap();
            assert_eq!(result.seed, seed);
            assert_eq!(result.agent_name, "Random");
            assert!(result.turns >= 1);
            assert!(result.final_health.iter().any(|&h| h == 0));
        }
    }

    #[test]
    fn test_aggressive_matches_finish() {
        for seed in 0..4 {
            let mut agent = AggressiveAgent::new();
            assert!(run_game(&mut agent, &shuffled(seed), 50_000).is_ok());
        }
    }

    #[test]
    fn test_decision_limit() {
        let mut agent = RandomAgent::new(1);
        let err = run_game(&mut agent, &MatchConfig::default(), 3).unwrap_err();
        assert!(matches!(err, RunError::DecisionLimit { limit: 3, .. }));
    }

    #[test]
    fn test_bad_config_is_reported() {
        let config = MatchConfig { board_width: 0, ..MatchConfig::default() };
        let err = run_game(&mut RandomAgent::new(0), &config, 10).unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
    }

    #[test]
    fn test_render_stream_ends_with_banner() {
        let mut out: Vec<RenderCommand> = Vec::new();
        let mut agent = AggressiveAgent::new();
        let result = run_game_with_sink(&mut agent, &MatchConfig::default(), 50_000, &mut out).unwrap();
        let banner = out.iter().rev().find_map(|c| match c {
            RenderCommand::Notify { text, seconds } if *seconds == GAME_END_NOTICE_SECONDS => Some(text.clone()),
            _ => None,
        });
        assert_eq!(banner.as_deref(), Some(result.outcome.banner()));
    }

    #[test]
    fn test_series_is_deterministic() {
        let series = SeriesConfig { games: 6, agent: "random".into(), ..SeriesConfig::default() };
        let a = run_series(&series);
        let b = run_series(&series);
        assert_eq!(a, b);
        assert_eq!(a.games, 6);
        assert_eq!(a.wins + a.losses + a.draws + a.errors, 6);
        assert_eq!(a.errors, 0);
        assert!(a.avg_turns > 0.0);
    }

    #[test]
    fn test_series_summary_serializes() {
        let series = SeriesConfig { games: 2, agent: "aggressive".into(), ..SeriesConfig::default() };
        let summary = run_series(&series);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"agent\":\"aggressive\""));
    }
}
