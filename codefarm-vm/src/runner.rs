//! # Runner
//!
//! The host side of a run: owns the snapshot between ticks, adopts each
//! [`TickOutcome`] in full, keeps the learner-facing log, and decides when
//! the run is over (goal reached, script exhausted, or halted on an error).
//! Scheduling is up to the caller: call [`Runner::step`] on a timer, or
//! [`Runner::run`] to go as fast as possible.

use crate::config::GameConfig;
use crate::error::Result;
use crate::interpreter::{self, ProgramState, TickOutcome, TickStatus};
use crate::level::Level;
use crate::script::Script;
use crate::world::{Agent, World};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

/// Why a run stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The level's goal holds
    GoalReached { ticks: u64 },
    /// No line left to run
    Exhausted { ticks: u64 },
    /// A tick reported an error and the runner halts on errors.
    /// `line` is 1-based.
    Halted { line: usize, message: String },
    /// `run` gave up before any of the above
    TickLimit { ticks: u64 },
}

/// One entry of the execution trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub tick: u64,
    /// 0-based line the tick started on
    pub line: usize,
    /// Trimmed source text of that line, empty past the end
    pub source: String,
    pub log: Option<String>,
    pub error: Option<String>,
}

/// What a single [`Runner::step`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub tick: u64,
    pub line: usize,
    pub log: Option<String>,
    pub error: Option<String>,
    /// Set once the run is over
    pub outcome: Option<RunOutcome>,
}

pub type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync>;

pub struct Runner {
    config: GameConfig,
    level: &'static Level,
    script: Script,
    world: World,
    program: ProgramState,
    ticks: u64,
    logs: VecDeque<String>,
    trace: Vec<TraceStep>,
    record_trace: bool,
    halt_on_error: bool,
    finished: Option<RunOutcome>,
    log_callback: Option<LogCallback>,
}

impl Runner {
    /// Load `level` with a fresh world and `script` at line 0
    pub fn new(config: GameConfig, level: &'static Level, script: Script) -> Result<Self> {
        config.validate()?;
        let world = Self::fresh_world(&config, level);
        Ok(Self {
            logs: VecDeque::with_capacity(config.max_logs),
            config,
            level,
            script,
            world,
            program: ProgramState::new(),
            ticks: 0,
            trace: Vec::new(),
            record_trace: false,
            halt_on_error: true,
            finished: None,
            log_callback: None,
        })
    }

    /// Keep ticking after a tick reports an error
    pub fn with_halt_on_error(mut self, halt: bool) -> Self {
        self.halt_on_error = halt;
        self
    }

    /// Record a [`TraceStep`] for every tick
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }

    /// Receive every log line as it is produced
    pub fn with_log_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(LogLevel, &str) + Send + Sync + 'static,
    {
        self.log_callback = Some(Box::new(callback));
        self
    }

    fn fresh_world(config: &GameConfig, level: &Level) -> World {
        World {
            grid: level.build_grid(config),
            agent: Agent::spawn(),
            gold: config.starting_gold,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Back to the level's starting state; the script is kept
    pub fn reset(&mut self) {
        self.world = Self::fresh_world(&self.config, self.level);
        self.program = ProgramState::new();
        self.ticks = 0;
        self.logs.clear();
        self.trace.clear();
        self.finished = None;
        self.emit(LogLevel::Info, "Level reset".to_string());
    }

    /// Swap in new source. Block context restarts from scratch; the farm is
    /// left as it is.
    pub fn edit(&mut self, script: Script) {
        self.script = script;
        self.program = ProgramState::new();
        self.finished = None;
        debug!(lines = self.script.len(), "script replaced");
    }

    /// Run one tick and adopt its outcome
    pub fn step(&mut self) -> StepReport {
        if let Some(outcome) = &self.finished {
            return StepReport {
                tick: self.ticks,
                line: self.program.cursor,
                log: None,
                error: None,
                outcome: Some(outcome.clone()),
            };
        }

        let line = self.program.cursor;
        let TickOutcome {
            world,
            program,
            log,
            error,
            status,
        } = interpreter::tick(&self.world, &self.script, &self.program, &self.config);

        self.ticks += 1;
        self.world = world;
        self.program = program;

        if let Some(message) = &log {
            self.emit(LogLevel::Info, message.clone());
        }
        if let Some(message) = &error {
            warn!(line = line + 1, %message, "tick reported an error");
            self.emit(LogLevel::Error, format!("Error [Line {}]: {}", line + 1, message));
        }

        if self.record_trace {
            self.trace.push(TraceStep {
                tick: self.ticks,
                line,
                source: self.script.line(line).map(str::trim).unwrap_or_default().to_string(),
                log: log.clone(),
                error: error.clone(),
            });
        }

        let outcome = if self.goal_reached() {
            info!(level = self.level.id, ticks = self.ticks, "goal reached");
            self.emit(LogLevel::Info, "Level complete!".to_string());
            Some(RunOutcome::GoalReached { ticks: self.ticks })
        } else if let (Some(message), true) = (&error, self.halt_on_error) {
            Some(RunOutcome::Halted {
                line: line + 1,
                message: message.clone(),
            })
        } else if status == TickStatus::Exhausted {
            info!(ticks = self.ticks, "script finished");
            self.emit(LogLevel::Info, "Script finished".to_string());
            Some(RunOutcome::Exhausted { ticks: self.ticks })
        } else {
            None
        };
        self.finished = outcome.clone();

        StepReport {
            tick: self.ticks,
            line,
            log,
            error,
            outcome,
        }
    }

    /// Step until the run ends or `max_ticks` more ticks have run
    pub fn run(&mut self, max_ticks: u64) -> RunOutcome {
        for _ in 0..max_ticks {
            if let Some(outcome) = self.step().outcome {
                return outcome;
            }
        }
        self.finished
            .clone()
            .unwrap_or(RunOutcome::TickLimit { ticks: self.ticks })
    }

    fn goal_reached(&self) -> bool {
        self.level.is_complete(
            &self.world.agent,
            &self.world.grid,
            self.world.gold,
            &self.config,
        )
    }

    fn emit(&mut self, level: LogLevel, message: String) {
        if let Some(callback) = &self.log_callback {
            callback(level, &message);
        }
        self.logs.push_front(message);
        self.logs.truncate(self.config.max_logs);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn program(&self) -> &ProgramState {
        &self.program
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn level(&self) -> &'static Level {
        self.level
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Empty unless the runner was built `with_trace(true)`
    pub fn trace(&self) -> &[TraceStep] {
        &self.trace
    }

    /// Log lines, newest first, at most `max_logs`
    pub fn logs(&self) -> impl Iterator<Item = &str> {
        self.logs.iter().map(String::as_str)
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.finished.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level;
    use crate::world::CropState;
    use std::sync::{Arc, Mutex};

    fn runner(level_id: u32, source: &str) -> Runner {
        Runner::new(
            GameConfig::default(),
            level::by_id(level_id).unwrap(),
            Script::parse(source),
        )
        .unwrap()
    }

    #[test]
    fn test_level_one_solution() {
        let source = "\
forward()
forward()
forward()
right()
forward()
forward()
forward()
plant()";
        let mut runner = runner(1, source);
        assert_eq!(runner.run(100), RunOutcome::GoalReached { ticks: 8 });
        assert_eq!(runner.logs().next(), Some("Level complete!"));
    }

    #[test]
    fn test_level_two_starter_code() {
        let mut runner = runner(2, level::by_id(2).unwrap().initial_code);
        assert!(matches!(runner.run(100), RunOutcome::GoalReached { .. }));
        let world = runner.world();
        assert!((0..5).all(|x| world.grid.state_at(x, 0) == Some(CropState::Planted)));
    }

    #[test]
    fn test_halts_on_error() {
        let mut runner = runner(1, "left()\nforward()\nplant()");
        let outcome = runner.run(10);
        assert_eq!(
            outcome,
            RunOutcome::Halted {
                line: 2,
                message: "Hit the wall! (Out of bounds)".to_string()
            }
        );
        assert_eq!(runner.ticks(), 2);
        assert!(runner.logs().next().unwrap().starts_with("Error [Line 2]"));

        // further steps do nothing
        let report = runner.step();
        assert_eq!(report.tick, 2);
        assert_eq!(report.outcome, Some(outcome));
    }

    #[test]
    fn test_keep_going_on_error() {
        let mut runner = runner(1, "left()\nforward()\nplant()").with_halt_on_error(false);
        assert_eq!(runner.run(10), RunOutcome::Exhausted { ticks: 4 });
        assert_eq!(runner.world().grid.state_at(0, 0), Some(CropState::Planted));
    }

    #[test]
    fn test_tick_limit() {
        let mut runner = runner(1, "while True:\n    pass()");
        assert_eq!(runner.run(50), RunOutcome::TickLimit { ticks: 50 });
        assert!(!runner.is_finished());
    }

    #[test]
    fn test_log_ring_is_bounded() {
        let config = GameConfig {
            max_logs: 3,
            ..GameConfig::default()
        };
        let mut runner = Runner::new(
            config,
            level::by_id(1).unwrap(),
            Script::parse("left()\nleft()\nleft()\nleft()\nleft()"),
        )
        .unwrap();
        runner.run(10);
        let logs: Vec<&str> = runner.logs().collect();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0], "Script finished");
    }

    #[test]
    fn test_log_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut runner = runner(1, "left()\nforward()").with_log_callback(move |level, msg| {
            sink.lock().unwrap().push((level, msg.to_string()));
        });
        runner.run(10);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], (LogLevel::Info, "left(): turned left".to_string()));
        assert_eq!(seen[1].0, LogLevel::Error);
    }

    #[test]
    fn test_reset_restores_level() {
        let mut runner = runner(3, "forward()\nharvest()");
        runner.run(10);
        assert_eq!(runner.world().agent.x, 1);

        runner.reset();
        assert_eq!(runner.world().agent, Agent::spawn());
        assert_eq!(runner.world().gold, 20);
        assert_eq!(runner.world().grid.state_at(1, 1), Some(CropState::Ripe));
        assert_eq!(runner.program(), &ProgramState::new());
        assert_eq!(runner.ticks(), 0);
        assert!(runner.trace().is_empty());
        assert!(!runner.is_finished());
    }

    #[test]
    fn test_edit_restarts_program_only() {
        let mut runner = runner(1, "forward()\nforward()");
        runner.run(10);
        assert!(runner.is_finished());

        runner.edit(Script::parse("right()"));
        assert!(!runner.is_finished());
        assert_eq!(runner.program().cursor, 0);
        assert_eq!(runner.world().agent.x, 2);
        runner.step();
        assert_eq!(runner.world().agent.facing, crate::world::Direction::Down);
    }

    #[test]
    fn test_trace_records_lines() {
        let mut runner = runner(1, "# go\nforward()").with_trace(true);
        runner.run(10);
        let trace = runner.trace();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace[0].source, "# go");
        assert_eq!(trace[1].log.as_deref(), Some("forward(): moved to (1, 0)"));
        assert_eq!(trace[2].source, "");
    }

    #[test]
    fn test_trace_off_by_default() {
        let mut runner = runner(1, "while True:\n    pass()");
        runner.run(200);
        assert_eq!(runner.ticks(), 200);
        assert!(runner.trace().is_empty());
    }

    #[test]
    fn test_huge_harvest_value_does_not_abort() {
        let config = GameConfig::from_json(r#"{"harvest_value": 2000000000}"#).unwrap();
        let mut runner =
            Runner::new(config, level::by_id(3).unwrap(), Script::parse("pass()")).unwrap();
        assert_eq!(runner.run(5), RunOutcome::Exhausted { ticks: 2 });
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            grid_size: 0,
            ..GameConfig::default()
        };
        assert!(Runner::new(config, level::by_id(1).unwrap(), Script::default()).is_err());
    }
}
