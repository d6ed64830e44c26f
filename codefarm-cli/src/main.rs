//! # Code Farm CLI
//!
//! Command-line interface for running farm scripts against the built-in
//! levels.
//!
//! Usage:
//!   codefarm run <script.py> [-l LEVEL]
//!   codefarm levels
//!   codefarm level <id>
//!   codefarm vocab
//!   codefarm ask <question>
//!
//! Examples:
//!   codefarm run solution.py -l 2 --render
//!   codefarm run patrol.py -l 3 --interval-ms 0 --max-ticks 5000
//!   codefarm ask -l 2 "How do I repeat plant() five times?" --apply solution.py

use clap::{Parser, Subcommand};
use codefarm_error::{Error, ErrorKind, Result};
use codefarm_tutor::{
    extract_code, level_context, looks_like_code, Explainer, OpenAIProvider, ProviderConfig,
    Tutor,
};
use codefarm_vm::{
    level, vocabulary, CropState, Direction, GameConfig, LogLevel, RunOutcome, Runner, Script,
    World,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codefarm")]
#[command(author, version, about = "Code Farm - learn to program by farming")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only show the outcome
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script against a level
    Run {
        /// Path to the script
        script: PathBuf,

        /// Level to play
        #[arg(short, long, default_value_t = 1)]
        level: u32,

        /// Game configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop after this many ticks
        #[arg(long, default_value_t = 1000)]
        max_ticks: u64,

        /// Delay between ticks; 0 runs as fast as possible
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Keep ticking after an error
        #[arg(long)]
        keep_going: bool,

        /// Draw the farm after every tick
        #[arg(long)]
        render: bool,

        /// Print the execution trace as JSON lines when done
        #[arg(long)]
        trace: bool,
    },
    /// List the built-in levels
    Levels,
    /// Show a level's description and starter code
    Level {
        id: u32,
    },
    /// Show the script vocabulary
    Vocab {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask the tutor for help
    Ask {
        /// The question
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,

        /// Level the question is about
        #[arg(short, long, default_value_t = 1)]
        level: u32,

        /// Write the code from the answer to this file
        #[arg(long)]
        apply: Option<PathBuf>,
    },
}

struct RunArgs {
    script: PathBuf,
    level: u32,
    config: Option<PathBuf>,
    max_ticks: u64,
    interval_ms: Option<u64>,
    keep_going: bool,
    render: bool,
    trace: bool,
}

fn load_config(path: Option<&Path>, interval_ms: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(ms) = interval_ms {
        config.tick_interval_ms = ms;
    }
    debug!(?config, "game config loaded");
    Ok(config)
}

/// Draw the farm as text, one character per tile
fn render(world: &World) -> String {
    let mut out = String::new();
    for (y, row) in world.grid.rows().enumerate() {
        for tile in row {
            let glyph = if (tile.x, tile.y) == (world.agent.x, world.agent.y) {
                match world.agent.facing {
                    Direction::Up => '^',
                    Direction::Down => 'v',
                    Direction::Left => '<',
                    Direction::Right => '>',
                }
            } else {
                match tile.state {
                    CropState::Empty => '.',
                    CropState::Planted => ',',
                    CropState::Watered => '~',
                    CropState::Ripe => '*',
                }
            };
            out.push(glyph);
        }
        if y == 0 {
            out.push_str(&format!("   gold: {} G", world.gold));
        } else if y == 1 {
            out.push_str(&format!("   harvested: {}", world.agent.inventory));
        }
        out.push('\n');
    }
    out
}

/// Wait for the next tick; without an interval just yield so Ctrl-C is
/// still seen
async fn next_tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => tokio::task::yield_now().await,
    }
}

async fn run_script(args: RunArgs, quiet: bool) -> Result<RunOutcome> {
    let config = load_config(args.config.as_deref(), args.interval_ms)?;
    let level = level::by_id(args.level)?;
    let script = Script::from_file(&args.script)?;

    if !quiet {
        println!("{}", level.title);
        println!("Goal: {}\n", level.goal_description);
    }

    let interval = config.tick_interval_ms;
    let mut runner = Runner::new(config, level, script)?
        .with_halt_on_error(!args.keep_going)
        .with_trace(args.trace);
    if !quiet {
        runner = runner.with_log_callback(|level, msg| match level {
            LogLevel::Info => println!("  {}", msg),
            LogLevel::Error => println!("  ✗ {}", msg),
        });
    }

    let mut ticker = (interval > 0).then(|| {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome = loop {
        if runner.ticks() >= args.max_ticks {
            break RunOutcome::TickLimit {
                ticks: runner.ticks(),
            };
        }
        tokio::select! {
            biased;
            _ = &mut ctrl_c => {
                println!("\nStopped by user");
                break RunOutcome::TickLimit { ticks: runner.ticks() };
            }
            _ = next_tick(ticker.as_mut()) => {}
        }

        let report = runner.step();
        if args.render && !quiet {
            println!("{}", render(runner.world()));
        }
        if let Some(outcome) = report.outcome {
            break outcome;
        }
    };

    if !quiet && !args.render {
        println!("\n{}", render(runner.world()));
    }
    if args.trace {
        for step in runner.trace() {
            let line = serde_json::to_string(step).map_err(|e| {
                Error::new(ErrorKind::SerializationFailed, e.to_string()).set_source(e)
            })?;
            println!("{}", line);
        }
    }
    Ok(outcome)
}

fn report_outcome(outcome: &RunOutcome, level_id: u32) {
    match outcome {
        RunOutcome::GoalReached { ticks } => {
            println!("✓ Level complete in {} ticks", ticks);
            if let Some(next) = level::next_after(level_id) {
                println!("  Next: codefarm level {} ({})", next.id, next.title);
            }
        }
        RunOutcome::Exhausted { ticks } => {
            println!("Script finished after {} ticks, goal not reached", ticks)
        }
        RunOutcome::Halted { line, message } => {
            println!("✗ Error [Line {}]: {}", line, message)
        }
        RunOutcome::TickLimit { ticks } => println!("Stopped after {} ticks", ticks),
    }
}

fn list_levels() {
    println!("Levels:");
    for level in level::levels() {
        println!("  {}. {}", level.id, level.title);
        println!("     {}", level.goal_description);
    }
}

fn show_level(id: u32) -> Result<()> {
    let level = level::by_id(id)?;
    println!("{}\n", level.title);
    println!("{}\n", level.description);
    println!("Goal: {}", level.goal_description);
    println!("Commands: {}\n", level.available_commands.join(", "));
    println!("--- starter code ---");
    print!("{}", level.initial_code);
    Ok(())
}

fn show_vocab(json: bool) {
    if json {
        println!("{}", vocabulary::to_json());
    } else {
        print!("{}", vocabulary::reference(&GameConfig::default()));
    }
}

async fn ask(question: &str, level_id: u32, apply: Option<&Path>, quiet: bool) -> Result<()> {
    let level = level::by_id(level_id)?;
    let provider = OpenAIProvider::new(ProviderConfig::from_env()).map_err(Error::from)?;
    let tutor = Tutor::new(provider, &GameConfig::default());

    if !quiet {
        println!("Asking the tutor...\n");
    }
    let answer = tutor.explain(question, &level_context(level)).await?;
    println!("{}", answer);

    if let Some(path) = apply {
        if looks_like_code(&answer) {
            std::fs::write(path, extract_code(&answer) + "\n").map_err(|e| {
                Error::from(e)
                    .with_operation("cli::ask")
                    .with_context("path", path.display().to_string())
            })?;
            if !quiet {
                println!("\nCode written to {}", path.display());
            }
        } else {
            eprintln!("\nThe answer contains no code; {} left untouched", path.display());
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            script,
            level,
            config,
            max_ticks,
            interval_ms,
            keep_going,
            render,
            trace,
        } => {
            let args = RunArgs {
                script,
                level,
                config,
                max_ticks,
                interval_ms,
                keep_going,
                render,
                trace,
            };
            match run_script(args, cli.quiet).await {
                Ok(outcome) => {
                    report_outcome(&outcome, level);
                    if matches!(outcome, RunOutcome::Halted { .. }) {
                        std::process::exit(2);
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Commands::Levels => {
            list_levels();
            Ok(())
        }
        Commands::Level { id } => show_level(id),
        Commands::Vocab { json } => {
            show_vocab(json);
            Ok(())
        }
        Commands::Ask {
            question,
            level,
            apply,
        } => ask(&question.join(" "), level, apply.as_deref(), cli.quiet).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
