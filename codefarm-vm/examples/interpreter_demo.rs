//! # Interpreter Demo
//!
//! Runs the built-in levels' solutions through the Code Farm runner and
//! prints what each tick did.

use codefarm_vm::{level, GameConfig, RunOutcome, Runner, Script};

fn main() {
    println!("=== Code Farm Interpreter Demo ===\n");

    // Example 1: Straight-line commands
    demo(
        1,
        "\
forward()
forward()
forward()
right()
forward()
forward()
forward()
plant()
",
    );

    // Example 2: Counted loop
    demo(
        2,
        "\
for i in range(5):
    plant()
    forward()
",
    );

    // Example 3: Patrol with conditions
    demo(
        3,
        "\
while True:
    if check_ripe():
        harvest()
    if bot.x == 5:
        right()
    forward()
",
    );
}

fn demo(level_id: u32, source: &str) {
    let level = match level::by_id(level_id) {
        Ok(level) => level,
        Err(e) => {
            println!("✗ {}", e);
            return;
        }
    };
    println!("--- {} ---", level.title);
    println!("Goal: {}", level.goal_description);

    let runner = Runner::new(GameConfig::default(), level, Script::parse(source));
    let mut runner = match runner {
        Ok(runner) => runner.with_log_callback(|level, msg| {
            println!("  [{:?}] {}", level, msg);
        }),
        Err(e) => {
            println!("✗ {}", e);
            return;
        }
    };

    match runner.run(500) {
        RunOutcome::GoalReached { ticks } => println!("✓ Goal reached in {} ticks", ticks),
        RunOutcome::Exhausted { ticks } => println!("… Script ended after {} ticks", ticks),
        RunOutcome::Halted { line, message } => println!("✗ Halted on line {}: {}", line, message),
        RunOutcome::TickLimit { ticks } => println!("… Stopped after {} ticks", ticks),
    }
    println!(
        "  Bot at ({}, {}), {} G\n",
        runner.world().agent.x,
        runner.world().agent.y,
        runner.world().gold
    );
}
