//! # Tick Driver
//!
//! One call to [`tick`] advances a script by one unit of progress. The
//! interpreter keeps no state of its own: the cursor and block stack travel
//! in [`ProgramState`], the farm in [`World`], and both come back as new
//! values in the [`TickOutcome`].
//!
//! ## Tick order
//! 1. Grow every watered tile (always, even when no line runs)
//! 2. Stop if the script is exhausted and no block is open
//! 3. Skip blank and comment lines
//! 4. Close every block the current line is not indented into; closing a
//!    `while` or an unfinished `for` jumps back and ends the tick
//! 5. Run the statement on the current line

use crate::command::{self, Command};
use crate::config::GameConfig;
use crate::frame::{BlockStack, Frame};
use crate::script::{indentation_of, Script};
use crate::statement::Statement;
use crate::world::World;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

const ASSIGNMENT_UNSUPPORTED: &str = "Variable assignment is not supported yet";

/// Where a run is in its script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramState {
    /// Line to run next; `>= script.len()` once the script is used up
    pub cursor: usize,
    pub stack: BlockStack,
}

impl ProgramState {
    pub fn new() -> Self {
        Self::default()
    }

    /// No line left and no block waiting to loop
    pub fn is_exhausted(&self, script: &Script) -> bool {
        self.cursor >= script.len() && self.stack.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickStatus {
    /// The program moved (or only the environment did, on a skipped line)
    Running,
    /// Nothing left to run; the host should stop ticking
    Exhausted,
}

/// Everything a tick produces. The host adopts all of it before the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub world: World,
    pub program: ProgramState,
    pub log: Option<String>,
    pub error: Option<String>,
    pub status: TickStatus,
}

enum BlockExit {
    /// Cursor moved to a loop header or body; the tick is over
    LoopedBack,
    /// All closed blocks were finished; run the current line
    FellThrough,
}

/// Run one tick against a snapshot.
///
/// Never fails: script problems come back as `log` or `error` text and the
/// cursor still advances.
pub fn tick(
    world: &World,
    script: &Script,
    program: &ProgramState,
    config: &GameConfig,
) -> TickOutcome {
    let mut world = world.clone();
    let ripened = world.grid.grow(config.growth_step);
    if ripened > 0 {
        debug!(ripened, "crops ripened");
    }

    let mut outcome = TickOutcome {
        world,
        program: program.clone(),
        log: None,
        error: None,
        status: TickStatus::Running,
    };

    let cursor = program.cursor;
    let Some(line) = script.line(cursor) else {
        if outcome.program.stack.is_empty() {
            outcome.status = TickStatus::Exhausted;
        } else {
            // the end of the script closes blocks like a line at column 0
            close_blocks(&mut outcome.program, 0);
        }
        return outcome;
    };

    let statement = Statement::classify(line);
    trace!(line = cursor, statement = statement.kind(), "tick");

    if statement == Statement::Blank {
        outcome.program.cursor += 1;
        return outcome;
    }

    let indent = indentation_of(line);
    if let BlockExit::LoopedBack = close_blocks(&mut outcome.program, indent) {
        return outcome;
    }

    let program = &mut outcome.program;
    match statement {
        Statement::While { condition } => {
            if condition.evaluate(&outcome.world) {
                program.stack.push(Frame::While { line: cursor, indent });
                program.cursor += 1;
            } else {
                program.cursor = script.find_block_end(cursor, indent);
            }
        }
        Statement::For { count } => {
            program.stack.push(Frame::For {
                line: cursor,
                indent,
                iteration: 0,
                target: count,
            });
            program.cursor += 1;
        }
        Statement::If { condition } => {
            if condition.evaluate(&outcome.world) {
                program.stack.push(Frame::If { line: cursor, indent });
                program.cursor += 1;
            } else {
                program.cursor = script.find_block_end(cursor, indent);
            }
        }
        Statement::Else => {
            // no record of the matching `if`: reaching `else:` means entering it
            program.stack.push(Frame::Else { line: cursor, indent });
            program.cursor += 1;
        }
        Statement::Call { command } => {
            match Command::parse(&command) {
                Some(command) => {
                    let result = command::execute(command, &mut outcome.world, config);
                    outcome.log = result.log;
                    outcome.error = result.error;
                }
                None => trace!(%command, "unknown command ignored"),
            }
            program.cursor += 1;
        }
        Statement::Assignment => {
            outcome.log = Some(ASSIGNMENT_UNSUPPORTED.to_string());
            program.cursor += 1;
        }
        Statement::Blank | Statement::NoOp => {
            program.cursor += 1;
        }
    }

    outcome
}

/// Pop every frame that a line at `indent` lies outside of.
fn close_blocks(program: &mut ProgramState, indent: usize) -> BlockExit {
    while let Some(frame) = program.stack.pop_closed_by(indent) {
        match frame {
            Frame::While { line, .. } => {
                debug!(header = line, "while body done, re-checking condition");
                program.cursor = line;
                return BlockExit::LoopedBack;
            }
            Frame::For {
                line,
                indent,
                iteration,
                target,
            } if iteration.saturating_add(1) < target => {
                debug!(header = line, iteration = iteration + 1, target, "for loop repeats");
                program.stack.push(Frame::For {
                    line,
                    indent,
                    iteration: iteration + 1,
                    target,
                });
                program.cursor = line + 1;
                return BlockExit::LoopedBack;
            }
            closed => debug!(header = closed.line(), kind = closed.kind(), "block closed"),
        }
    }
    BlockExit::FellThrough
}
