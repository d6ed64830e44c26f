//! # Code Farm VM
//!
//! A line-stepping interpreter for a small Python-like language that drives
//! a farm bot around a square grid.
//!
//! ## Core Concepts
//! - **Tick**: One unit of progress. Crops grow, then at most one line runs
//! - **Snapshot**: A tick takes the world and program state by reference and
//!   returns new ones; the interpreter itself holds nothing between ticks
//! - **Block stack**: Open `for`/`while`/`if`/`else` bodies, closed by
//!   indentation
//! - **Levels**: Starter code, grid seeding and a goal checked after each tick
//! - **Runner**: Host loop that adopts each tick and keeps the log

pub mod command;
pub mod condition;
pub mod config;
pub mod error;
pub mod frame;
pub mod interpreter;
pub mod level;
pub mod runner;
pub mod script;
pub mod statement;
pub mod vocabulary;
pub mod world;

pub use command::{Command, CommandResult};
pub use condition::Condition;
pub use config::GameConfig;
pub use error::{Error, ErrorKind, ErrorStatus, Result};
pub use frame::{BlockStack, Frame};
pub use interpreter::{tick, ProgramState, TickOutcome, TickStatus};
pub use level::Level;
pub use runner::{LogLevel, RunOutcome, Runner, StepReport, TraceStep};
pub use script::Script;
pub use statement::Statement;
pub use world::{Agent, CropState, Direction, Grid, Tile, World, RIPE_AT};
