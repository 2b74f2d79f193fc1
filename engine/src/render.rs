// ═══════════════════════════════════════════════════════════════════════
// Render commands - the outbound vocabulary
//
// The engine writes commands into a one-way sink in the exact order the
// presentation layer must apply them. Nothing is ever read back.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RenderCommand {
    DrawTile { position: Position, mode: TileMode },
    DrawUnit { unit: UnitId, template: String, position: Position },
    DeleteUnit { unit: UnitId },
    SetUnitHealth { unit: UnitId, health: u32 },
    SetUnitAttack { unit: UnitId, attack: u32 },
    PlayAnimation { unit: UnitId, animation: Animation },
    MoveUnitToTile { unit: UnitId, position: Position },
    PlayEffect { effect: Effect, position: Position },
    DrawCard { slot: u8, card: String, mode: CardMode },
    DeleteCard { slot: u8 },
    SetPlayerHealth { player: PlayerId, health: u32 },
    SetPlayerMana { player: PlayerId, mana: u32 },
    Notify { text: String, seconds: u32 },
}

pub trait RenderSink {
    fn send(&mut self, command: RenderCommand);
}

impl RenderSink for Vec<RenderCommand> {
    fn send(&mut self, command: RenderCommand) {
        self.push(command);
    }
}

/// Drops everything. Used by headless simulations.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn send(&mut self, _command: RenderCommand) {}
}

/// Logs each command at trace level before forwarding it.
pub struct TraceSink<S> {
    inner: S,
}

impl<S: RenderSink> TraceSink<S> {
    pub fn new(inner: S) -> Self {
        TraceSink { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RenderSink> RenderSink for TraceSink<S> {
    fn send(&mut self, command: RenderCommand) {
        trace!(?command, "render");
        self.inner.send(command);
    }
}

pub fn notify(out: &mut dyn RenderSink, text: impl Into<String>, seconds: u32) {
    out.send(RenderCommand::Notify { text: text.into(), seconds });
}
