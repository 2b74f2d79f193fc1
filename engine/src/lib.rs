pub mod types;
pub mod error;
pub mod board;
pub mod unit;
pub mod player;
pub mod cards;
pub mod templates;
pub mod config;
pub mod render;
pub mod state;
pub mod feedback;
pub mod end_check;
pub mod combat;
pub mod movement;
pub mod summon;
pub mod card_play;
pub mod turn;
pub mod opponent;
pub mod engine;
pub mod setup;
pub mod view;
pub mod invariants;

#[cfg(test)]
mod tests;

pub use types::*;
pub use config::MatchConfig;
pub use engine::{apply_action, Action};
pub use error::{ActionError, ConfigError};
pub use render::{NullSink, RenderCommand, RenderSink, TraceSink};
pub use state::GameState;
pub use templates::{StandardTemplates, UnitTemplates};
