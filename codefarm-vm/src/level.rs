//! # Levels
//!
//! Built-in chapters: starter code, optional grid seeding, and the goal the
//! host checks after every tick.

use crate::config::GameConfig;
use crate::error::{self, Result};
use crate::world::{Agent, CropState, Grid};

/// Goal predicate, checked against the snapshot after each tick
pub type GoalFn = fn(&Agent, &Grid, u32, &GameConfig) -> bool;

/// Seeds tile states before the first tick
pub type SetupFn = fn(&mut Grid);

#[derive(Debug, Clone, Copy)]
pub struct Level {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub goal_description: &'static str,
    pub initial_code: &'static str,
    pub available_commands: &'static [&'static str],
    pub setup: Option<SetupFn>,
    pub goal: GoalFn,
}

impl Level {
    /// A fresh grid for this level
    pub fn build_grid(&self, config: &GameConfig) -> Grid {
        let mut grid = Grid::new(config.grid_size);
        if let Some(setup) = self.setup {
            setup(&mut grid);
        }
        grid
    }

    pub fn is_complete(&self, agent: &Agent, grid: &Grid, gold: u32, config: &GameConfig) -> bool {
        (self.goal)(agent, grid, gold, config)
    }
}

static LEVELS: [Level; 3] = [
    Level {
        id: 1,
        title: "Chapter 1: First Steps",
        description: "Welcome to programming. Even the most complex automation starts with \
                      one instruction at a time. Drive the bot with turtle-style commands.",
        goal_description: "Move to (3, 3) and plant a seed",
        initial_code: "\
# Level 1: sequential execution
# Task: move to (3,3) and plant a seed
# Hint: forward() moves ahead, left() turns left

forward()
forward()
forward()
left()
# keep writing your code here...
",
        available_commands: &["forward()", "left()", "right()", "plant()"],
        setup: None,
        goal: reach_and_plant,
    },
    Level {
        id: 2,
        title: "Chapter 2: The Power of Loops",
        description: "Repeated code is a programmer's enemy. Use a 'for' loop to make the \
                      bot repeat an action.",
        goal_description: "Plant 5 tiles in a row on the first row (y = 0)",
        initial_code: "\
# Level 2: loops
# Task: plant 5 times along the first row
# Python uses indentation (a tab or 4 spaces) to mark a block

for i in range(5):
    plant()
    forward()

# code after the loop
right()
",
        available_commands: &["for i in range(n):", "forward()", "plant()"],
        setup: None,
        goal: plant_first_row,
    },
    Level {
        id: 3,
        title: "Chapter 3: Forever and If",
        description: "Use a 'while' loop to keep working and 'if' to react to the field.",
        goal_description: "Harvest the 3 ripe crops scattered on the map",
        initial_code: "\
# Level 3: conditions
# Task: patrol the field and harvest ripe carrots
# Hint: keep moving, harvest whenever something is ripe

while True:
    forward()

    # edge check: turn right at the border
    if bot.x == 5:
        right()

    if check_ripe():
        harvest()
",
        available_commands: &["while True:", "if check_ripe():", "harvest()", "forward()"],
        setup: Some(scatter_ripe_crops),
        goal: harvest_three,
    },
];

/// All built-in levels, in play order
pub fn levels() -> &'static [Level] {
    &LEVELS
}

/// Look up a level by id
pub fn by_id(id: u32) -> Result<&'static Level> {
    LEVELS
        .iter()
        .find(|level| level.id == id)
        .ok_or_else(|| error::level_not_found(id))
}

/// The level after `id`, if any
pub fn next_after(id: u32) -> Option<&'static Level> {
    let index = LEVELS.iter().position(|level| level.id == id)?;
    LEVELS.get(index + 1)
}

fn reach_and_plant(agent: &Agent, grid: &Grid, _gold: u32, _config: &GameConfig) -> bool {
    agent.x == 3 && agent.y == 3 && grid.state_at(3, 3) == Some(CropState::Planted)
}

fn plant_first_row(_agent: &Agent, grid: &Grid, _gold: u32, _config: &GameConfig) -> bool {
    let planted = (0..5)
        .filter(|&x| matches!(grid.state_at(x, 0), Some(state) if state != CropState::Empty))
        .count();
    planted >= 5
}

fn scatter_ripe_crops(grid: &mut Grid) {
    grid.set_state(1, 1, CropState::Ripe);
    grid.set_state(3, 3, CropState::Ripe);
    grid.set_state(1, 4, CropState::Ripe);
}

fn harvest_three(_agent: &Agent, _grid: &Grid, gold: u32, config: &GameConfig) -> bool {
    u64::from(gold) >= u64::from(config.starting_gold) + 3 * u64::from(config.harvest_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_lookup() {
        assert_eq!(by_id(2).unwrap().id, 2);
        assert_eq!(by_id(9).unwrap_err().kind(), ErrorKind::LevelNotFound);
        assert_eq!(next_after(1).map(|l| l.id), Some(2));
        assert!(next_after(3).is_none());
    }

    #[test]
    fn test_ids_in_order() {
        let ids: Vec<u32> = levels().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_level_three_seeding() {
        let config = GameConfig::default();
        let grid = by_id(3).unwrap().build_grid(&config);
        let ripe: Vec<(usize, usize)> = grid
            .tiles()
            .filter(|t| t.state == CropState::Ripe)
            .map(|t| (t.x, t.y))
            .collect();
        assert_eq!(ripe, vec![(1, 1), (3, 3), (1, 4)]);
    }

    #[test]
    fn test_reach_and_plant_goal() {
        let config = GameConfig::default();
        let level = by_id(1).unwrap();
        let mut grid = level.build_grid(&config);
        let mut agent = Agent::spawn();
        agent.x = 3;
        agent.y = 3;
        assert!(!level.is_complete(&agent, &grid, 20, &config));

        grid.set_state(3, 3, CropState::Planted);
        assert!(level.is_complete(&agent, &grid, 20, &config));
    }

    #[test]
    fn test_first_row_goal() {
        let config = GameConfig::default();
        let level = by_id(2).unwrap();
        let mut grid = level.build_grid(&config);
        for x in 0..4 {
            grid.set_state(x, 0, CropState::Planted);
        }
        assert!(!level.is_complete(&Agent::spawn(), &grid, 0, &config));
        grid.set_state(4, 0, CropState::Watered);
        assert!(level.is_complete(&Agent::spawn(), &grid, 0, &config));
    }

    #[test]
    fn test_harvest_goal_uses_config() {
        let config = GameConfig::default();
        let level = by_id(3).unwrap();
        let grid = level.build_grid(&config);
        assert!(!level.is_complete(&Agent::spawn(), &grid, 64, &config));
        assert!(level.is_complete(&Agent::spawn(), &grid, 65, &config));
    }

    #[test]
    fn test_harvest_goal_with_huge_harvest_value() {
        let config = GameConfig::from_json(r#"{"harvest_value": 2000000000}"#).unwrap();
        let level = by_id(3).unwrap();
        let grid = level.build_grid(&config);
        assert!(!level.is_complete(&Agent::spawn(), &grid, u32::MAX, &config));
    }
}
