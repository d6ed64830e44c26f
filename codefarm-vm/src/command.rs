//! # Action Commands
//!
//! The zero-argument commands a script can call, and their effect on a
//! world snapshot.

use crate::config::GameConfig;
use crate::world::{CropState, World};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Forward,
    Left,
    Right,
    Plant,
    Water,
    Harvest,
    Pass,
}

impl Command {
    /// Look up a keyword (case-sensitive), including the turtle-style aliases
    pub fn parse(word: &str) -> Option<Self> {
        Some(match word {
            "forward" | "fd" => Command::Forward,
            "left" | "lt" => Command::Left,
            "right" | "rt" => Command::Right,
            "plant" => Command::Plant,
            "water" => Command::Water,
            "harvest" => Command::Harvest,
            "pass" => Command::Pass,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Forward => "forward",
            Command::Left => "left",
            Command::Right => "right",
            Command::Plant => "plant",
            Command::Water => "water",
            Command::Harvest => "harvest",
            Command::Pass => "pass",
        }
    }
}

/// Outcome of a single command.
///
/// `error` is set for failures the host may halt on; a refused action that
/// is merely pointless (harvesting nothing) only sets `log`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub log: Option<String>,
    pub error: Option<String>,
    /// Whether the world snapshot was modified
    pub changed: bool,
}

impl CommandResult {
    fn done(log: impl Into<String>) -> Self {
        Self {
            log: Some(log.into()),
            error: None,
            changed: true,
        }
    }

    fn info(log: impl Into<String>) -> Self {
        Self {
            log: Some(log.into()),
            error: None,
            changed: false,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            log: None,
            error: Some(error.into()),
            changed: false,
        }
    }
}

/// Apply `command` to `world` in place
pub fn execute(command: Command, world: &mut World, config: &GameConfig) -> CommandResult {
    let result = match command {
        Command::Forward => forward(world),
        Command::Left => {
            world.agent.facing = world.agent.facing.turn_left();
            CommandResult::done("left(): turned left")
        }
        Command::Right => {
            world.agent.facing = world.agent.facing.turn_right();
            CommandResult::done("right(): turned right")
        }
        Command::Plant => plant(world, config),
        Command::Water => water(world, config),
        Command::Harvest => harvest(world, config),
        Command::Pass => CommandResult::default(),
    };
    debug!(
        command = command.name(),
        changed = result.changed,
        failed = result.error.is_some(),
        "command executed"
    );
    result
}

fn forward(world: &mut World) -> CommandResult {
    let (x, y) = world.agent.ahead();
    if !world.grid.contains(x, y) {
        return CommandResult::failed("Hit the wall! (Out of bounds)");
    }
    world.agent.x = x as usize;
    world.agent.y = y as usize;
    CommandResult::done(format!("forward(): moved to ({}, {})", x, y))
}

fn plant(world: &mut World, config: &GameConfig) -> CommandResult {
    let gold = world.gold;
    let Some(tile) = world.tile_under_agent_mut() else {
        return CommandResult::failed("The bot is not on the farm");
    };
    if tile.state != CropState::Empty {
        return CommandResult::info("Cannot plant here (soil is not empty)");
    }
    if gold < config.plant_cost {
        return CommandResult::failed(format!("Not enough gold (need {} G)", config.plant_cost));
    }
    tile.set_state(CropState::Planted);
    world.gold = gold - config.plant_cost;
    CommandResult::done(format!("plant(): seeds sown (-{} G)", config.plant_cost))
}

fn water(world: &mut World, config: &GameConfig) -> CommandResult {
    let gold = world.gold;
    if gold < config.water_cost {
        return CommandResult::failed(format!("Not enough gold (need {} G)", config.water_cost));
    }
    let Some(tile) = world.tile_under_agent_mut() else {
        return CommandResult::failed("The bot is not on the farm");
    };
    tile.set_state(CropState::Watered);
    tile.growth = 0;
    world.gold = gold - config.water_cost;
    CommandResult::done(format!("water(): watered (-{} G)", config.water_cost))
}

fn harvest(world: &mut World, config: &GameConfig) -> CommandResult {
    let Some(tile) = world.tile_under_agent_mut() else {
        return CommandResult::failed("The bot is not on the farm");
    };
    if tile.state != CropState::Ripe {
        return CommandResult::info("Nothing ripe to harvest");
    }
    tile.set_state(CropState::Empty);
    world.gold = world.gold.saturating_add(config.harvest_value);
    world.agent.inventory = world.agent.inventory.saturating_add(1);
    CommandResult::done(format!("harvest(): harvested (+{} G)", config.harvest_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Direction;

    fn setup() -> (World, GameConfig) {
        let config = GameConfig::default();
        (World::new(&config), config)
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Command::parse("fd"), Some(Command::Forward));
        assert_eq!(Command::parse("lt"), Some(Command::Left));
        assert_eq!(Command::parse("rt"), Some(Command::Right));
        assert_eq!(Command::parse("Forward"), None);
        assert_eq!(Command::parse("move"), None);
    }

    #[test]
    fn test_forward_interior() {
        let (mut world, config) = setup();
        let result = execute(Command::Forward, &mut world, &config);
        assert_eq!((world.agent.x, world.agent.y), (1, 0));
        assert!(result.changed);
        assert_eq!(result.log.as_deref(), Some("forward(): moved to (1, 0)"));
    }

    #[test]
    fn test_forward_into_wall() {
        let (mut world, config) = setup();
        world.agent.facing = Direction::Up;
        let result = execute(Command::Forward, &mut world, &config);
        assert_eq!((world.agent.x, world.agent.y), (0, 0));
        assert!(result.error.is_some());
        assert!(result.log.is_none());
        assert!(!result.changed);
    }

    #[test]
    fn test_plant() {
        let (mut world, config) = setup();
        let result = execute(Command::Plant, &mut world, &config);
        assert!(result.error.is_none());
        assert_eq!(world.grid.state_at(0, 0), Some(CropState::Planted));
        assert_eq!(world.gold, config.starting_gold - config.plant_cost);
    }

    #[test]
    fn test_plant_insufficient_gold() {
        let (mut world, config) = setup();
        world.gold = config.plant_cost - 1;
        let before = world.clone();
        let result = execute(Command::Plant, &mut world, &config);
        assert!(result.error.is_some());
        assert_eq!(world, before);
    }

    #[test]
    fn test_plant_occupied_is_info() {
        let (mut world, config) = setup();
        world.grid.set_state(0, 0, CropState::Watered);
        let before = world.clone();
        let result = execute(Command::Plant, &mut world, &config);
        assert!(result.error.is_none());
        assert!(result.log.is_some());
        assert_eq!(world, before);
    }

    #[test]
    fn test_water_any_state() {
        let (mut world, config) = setup();
        world.grid.set_state(0, 0, CropState::Ripe);
        let result = execute(Command::Water, &mut world, &config);
        assert!(result.changed);
        let tile = world.tile_under_agent().unwrap();
        assert_eq!(tile.state, CropState::Watered);
        assert_eq!(tile.growth, 0);
        assert_eq!(world.gold, config.starting_gold - config.water_cost);
    }

    #[test]
    fn test_rewater_restarts_growth() {
        let (mut world, config) = setup();
        world.grid.set_state(0, 0, CropState::Watered);
        world.tile_under_agent_mut().unwrap().growth = 50;
        execute(Command::Water, &mut world, &config);
        let tile = world.tile_under_agent().unwrap();
        assert_eq!(tile.state, CropState::Watered);
        assert_eq!(tile.growth, 0);
    }

    #[test]
    fn test_water_insufficient_gold() {
        let (mut world, config) = setup();
        world.gold = 0;
        let result = execute(Command::Water, &mut world, &config);
        assert!(result.error.is_some());
        assert_eq!(world.grid.state_at(0, 0), Some(CropState::Empty));
        assert_eq!(world.gold, 0);
    }

    #[test]
    fn test_harvest() {
        let (mut world, config) = setup();
        world.grid.set_state(0, 0, CropState::Ripe);
        let result = execute(Command::Harvest, &mut world, &config);
        assert!(result.changed);
        assert_eq!(world.grid.state_at(0, 0), Some(CropState::Empty));
        assert_eq!(world.gold, config.starting_gold + config.harvest_value);
        assert_eq!(world.agent.inventory, 1);
    }

    #[test]
    fn test_harvest_nothing_is_info() {
        let (mut world, config) = setup();
        world.grid.set_state(0, 0, CropState::Planted);
        let before = world.clone();
        let result = execute(Command::Harvest, &mut world, &config);
        assert!(result.error.is_none());
        assert_eq!(result.log.as_deref(), Some("Nothing ripe to harvest"));
        assert_eq!(world, before);
    }

    #[test]
    fn test_pass() {
        let (mut world, config) = setup();
        let before = world.clone();
        let result = execute(Command::Pass, &mut world, &config);
        assert_eq!(result, CommandResult::default());
        assert_eq!(world, before);
    }
}
