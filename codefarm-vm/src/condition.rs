//! # Condition Evaluator
//!
//! Conditions are a closed set of sensor forms. There are no boolean
//! operators and no arithmetic; anything not recognised evaluates to false.

use crate::world::{CropState, World};
use serde::{Deserialize, Serialize};

/// A classified `while`/`if` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Condition {
    /// `True` / `False`
    Literal(bool),
    /// `check_ripe()` - tile under the bot is ripe
    Ripe,
    /// `check_soil()` - tile under the bot is empty
    EmptySoil,
    /// `bot.x == N`
    AgentX(i64),
    /// `bot.y == N`
    AgentY(i64),
    /// Not a recognised form, always false
    Unknown,
}

impl Condition {
    /// Classify the text between the keyword and the colon.
    ///
    /// Sensors are found by substring, first match wins, so
    /// `check_ripe() or True` is just `check_ripe()`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text {
            "True" => return Condition::Literal(true),
            "False" => return Condition::Literal(false),
            _ => {}
        }

        if text.contains("check_ripe()") {
            return Condition::Ripe;
        }
        if text.contains("check_soil()") {
            return Condition::EmptySoil;
        }
        if text.contains("bot.x") || text.contains("agent.x") {
            return compared_value(text).map_or(Condition::Unknown, Condition::AgentX);
        }
        if text.contains("bot.y") || text.contains("agent.y") {
            return compared_value(text).map_or(Condition::Unknown, Condition::AgentY);
        }
        Condition::Unknown
    }

    pub fn evaluate(&self, world: &World) -> bool {
        let under = || world.tile_under_agent().map(|tile| tile.state);
        match *self {
            Condition::Literal(value) => value,
            Condition::Ripe => under() == Some(CropState::Ripe),
            Condition::EmptySoil => under() == Some(CropState::Empty),
            Condition::AgentX(x) => world.agent.x as i64 == x,
            Condition::AgentY(y) => world.agent.y as i64 == y,
            Condition::Unknown => false,
        }
    }
}

/// Leading integer of whatever follows `==`, e.g. `" 5 # edge"` -> 5
fn compared_value(text: &str) -> Option<i64> {
    let (_, rhs) = text.split_once("==")?;
    let rhs = rhs.trim_start();
    let digits_from = usize::from(rhs.starts_with(|c| c == '-' || c == '+'));
    let end = rhs[digits_from..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rhs.len(), |i| i + digits_from);
    rhs[..end].parse().ok()
}
