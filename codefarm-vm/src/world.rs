//! # Farm World
//!
//! The state a script acts on: a square grid of tiles, the bot standing on
//! it, and the gold ledger. A [`World`] is a plain value; each tick clones the
//! snapshot it is given and returns the modified copy.

use crate::config::GameConfig;
use serde::{Deserialize, Serialize};

/// Growth progress at which a watered crop ripens
pub const RIPE_AT: u32 = 100;

/// Crop state of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CropState {
    Empty,
    Planted,
    Watered,
    Ripe,
}

/// Direction the bot is facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Rotate 90° counter-clockwise: Up -> Left -> Down -> Right -> Up
    pub fn turn_left(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// Rotate 90° clockwise: Up -> Right -> Down -> Left -> Up
    pub fn turn_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Unit step `(dx, dy)`. `y` grows downwards, (0, 0) is the top-left corner.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A single farm tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub x: usize,
    pub y: usize,
    pub state: CropState,
    /// 0..=100, only non-zero while `state == Watered`
    pub growth: u32,
}

impl Tile {
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            state: CropState::Empty,
            growth: 0,
        }
    }

    /// Change the crop state, keeping `growth == 0` outside of `Watered`
    pub fn set_state(&mut self, state: CropState) {
        if state != CropState::Watered {
            self.growth = 0;
        }
        self.state = state;
    }

    /// Advance growth by `step`; returns true if the crop ripened
    fn grow(&mut self, step: u32) -> bool {
        if self.state != CropState::Watered {
            return false;
        }
        self.growth = self.growth.saturating_add(step);
        if self.growth >= RIPE_AT {
            self.set_state(CropState::Ripe);
            return true;
        }
        false
    }
}

/// Square farm grid, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a `size` x `size` grid of empty tiles
    pub fn new(size: usize) -> Self {
        let tiles = (0..size)
            .flat_map(|y| (0..size).map(move |x| Tile::new(x, y)))
            .collect();
        Self { size, tiles }
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check whether a (possibly negative) coordinate lies on the grid
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Tile> {
        if x < self.size && y < self.size {
            self.tiles.get(y * self.size + x)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        if x < self.size && y < self.size {
            self.tiles.get_mut(y * self.size + x)
        } else {
            None
        }
    }

    /// Crop state at (x, y); `None` off the grid
    pub fn state_at(&self, x: usize, y: usize) -> Option<CropState> {
        self.get(x, y).map(|tile| tile.state)
    }

    /// Seed a tile's state (used by level setup); ignores off-grid positions
    pub fn set_state(&mut self, x: usize, y: usize, state: CropState) {
        if let Some(tile) = self.get_mut(x, y) {
            tile.set_state(state);
        }
    }

    /// Iterate tiles row by row
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Iterate rows (top to bottom)
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        // chunks(0) panics; an empty grid has no rows anyway
        self.tiles.chunks(self.size.max(1))
    }

    /// Environment update: every watered tile grows by `step`.
    ///
    /// Returns how many tiles ripened.
    pub fn grow(&mut self, step: u32) -> usize {
        let mut ripened = 0;
        for tile in &mut self.tiles {
            if tile.grow(step) {
                ripened += 1;
            }
        }
        ripened
    }
}

/// The farm bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub x: usize,
    pub y: usize,
    pub facing: Direction,
    /// Harvested crops, never decreases
    pub inventory: u32,
}

impl Agent {
    /// Starting position: top-left corner, facing right
    pub fn spawn() -> Self {
        Self {
            x: 0,
            y: 0,
            facing: Direction::Right,
            inventory: 0,
        }
    }

    /// The cell one step ahead, which may lie off the grid
    pub fn ahead(&self) -> (i64, i64) {
        let (dx, dy) = self.facing.delta();
        (self.x as i64 + dx, self.y as i64 + dy)
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::spawn()
    }
}

/// A complete world snapshot: grid, bot and ledger change together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub grid: Grid,
    pub agent: Agent,
    /// Ledger balance
    pub gold: u32,
}

impl World {
    /// Fresh world for a level load or reset
    pub fn new(config: &GameConfig) -> Self {
        Self {
            grid: Grid::new(config.grid_size),
            agent: Agent::spawn(),
            gold: config.starting_gold,
        }
    }

    pub fn tile_under_agent(&self) -> Option<&Tile> {
        self.grid.get(self.agent.x, self.agent.y)
    }

    pub fn tile_under_agent_mut(&mut self) -> Option<&mut Tile> {
        self.grid.get_mut(self.agent.x, self.agent.y)
    }
}
