// ═══════════════════════════════════════════════════════════════════════
// Runner - CLI entry point for playing and simulating card duels
// ═══════════════════════════════════════════════════════════════════════

use clap::{Parser, Subcommand};
use duel_agents::make_agent;
use duel_engine::cards::{CardKind, CATALOG};
use duel_engine::render::{RenderCommand, RenderSink};
use duel_engine::{MatchConfig, NullSink, PlayerId, TraceSink};
use duel_tournament::{run_game_with_sink, run_series, SeriesConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duel-runner", about = "Tactical card duel - headless rules engine")]
struct Cli {
    /// Log match progress (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match against the scripted opponent
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Agent type: "random" or "aggressive"
        #[arg(short, long, default_value = "random")]
        agent: String,
        /// JSON match configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print every render command as a JSON line
        #[arg(long)]
        show_commands: bool,
    },
    /// Run a series of matches in parallel
    Simulate {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value = "random")]
        agent: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the card catalog
    Cards,
}

/// Prints each render command as one JSON line.
struct JsonLines;

impl RenderSink for JsonLines {
    fn send(&mut self, command: RenderCommand) {
        match serde_json::to_string(&command) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("render command not serializable: {}", e),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Play { seed, agent, config, show_commands } => cmd_play(seed, &agent, config, show_commands),
        Commands::Simulate { games, seed, agent, config, json } => cmd_simulate(games, seed, &agent, config, json),
        Commands::Cards => cmd_cards(),
    }
}

fn load_config(path: Option<PathBuf>) -> MatchConfig {
    let Some(path) = path else {
        return MatchConfig::default();
    };
    match MatchConfig::from_json_file(&path) {
        Ok(config) => {
            info!(path = %path.display(), "config loaded");
            config
        }
        Err(e) => {
            eprintln!("Config error ({}): {}", path.display(), e);
            std::process::exit(2);
        }
    }
}

fn cmd_play(seed: u64, agent_type: &str, config: Option<PathBuf>, show_commands: bool) {
    let mut config = load_config(config);
    config.seed = seed;
    let mut agent = make_agent(agent_type, seed);

    if !show_commands {
        println!("=== Card Duel ===\n");
        println!("Running single match: seed={}, agent={}\n", seed, agent.name());
    }

    let result = if show_commands {
        run_game_with_sink(agent.as_mut(), &config, 50_000, &mut TraceSink::new(JsonLines))
    } else {
        run_game_with_sink(agent.as_mut(), &config, 50_000, &mut TraceSink::new(NullSink))
    };

    match result {
        Ok(result) if show_commands => {
            eprintln!("{} after {} turns", result.outcome, result.turns);
        }
        Ok(result) => {
            println!("Match finished!");
            println!("  Outcome: {} ({})", result.outcome, result.outcome.banner());
            println!("  Turns played: {}", result.turns);
            println!("  Decisions: {} ({} rejected)", result.decisions, result.rejected);
            println!();
            for p in PlayerId::ALL {
                println!(
                    "    {:10} -- health: {:>2}, units: {}",
                    p.to_string(),
                    result.final_health[p.index()],
                    result.units_left[p.index()],
                );
            }
        }
        Err(e) => {
            eprintln!("Match error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_simulate(games: u32, seed: u64, agent_type: &str, config: Option<PathBuf>, json: bool) {
    let config = load_config(config);
    let series = SeriesConfig {
        games,
        base_seed: seed,
        agent: agent_type.to_string(),
        config: MatchConfig { shuffle_decks: true, ..config },
        ..SeriesConfig::default()
    };
    let summary = run_series(&series);

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Summary not serializable: {}", e),
        }
        return;
    }

    println!("=== Series: {} games, agent={} ===\n", games, agent_type);
    println!("--- Summary ({} games, {} errors) ---", summary.games, summary.errors);
    println!("  Wins:   {:>5} ({:.1}%)", summary.wins, summary.win_rate() * 100.0);
    println!("  Losses: {:>5}", summary.losses);
    println!("  Draws:  {:>5}", summary.draws);
    println!("  Avg turns:     {:.1}", summary.avg_turns);
    println!("  Avg decisions: {:.1}", summary.avg_decisions);
}

fn cmd_cards() {
    println!("{:<22} {:<22} {:>4}  {}", "Key", "Name", "Cost", "Kind");
    println!("{}", "-".repeat(62));
    for card in &CATALOG {
        let kind = match card.kind {
            CardKind::Creature(stats) => format!("creature {}/{}", stats.attack, stats.health),
            CardKind::Spell => "spell".to_string(),
        };
        println!("{:<22} {:<22} {:>4}  {}", card.key, card.name, card.cost, kind);
    }
}
