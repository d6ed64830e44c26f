//! # Script Vocabulary
//!
//! The complete set of words a script may use. The interpreter matches the
//! same words in [`crate::command`] and [`crate::condition`]; this module
//! describes them for people (the `vocab` command) and for the tutor's
//! system prompt.

use crate::config::GameConfig;
use serde::Serialize;

/// One documented word of the language
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Entry {
    /// How it is written in a script
    pub syntax: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

/// Action commands, one per line, no arguments
pub const COMMANDS: &[Entry] = &[
    Entry {
        syntax: "forward()",
        aliases: &["fd()"],
        description: "Move one cell in the facing direction",
    },
    Entry {
        syntax: "left()",
        aliases: &["lt()"],
        description: "Turn 90 degrees to the left",
    },
    Entry {
        syntax: "right()",
        aliases: &["rt()"],
        description: "Turn 90 degrees to the right",
    },
    Entry {
        syntax: "plant()",
        aliases: &[],
        description: "Sow seeds on empty soil (costs gold)",
    },
    Entry {
        syntax: "water()",
        aliases: &[],
        description: "Water the tile so the crop grows (costs gold)",
    },
    Entry {
        syntax: "harvest()",
        aliases: &[],
        description: "Collect a ripe crop (earns gold)",
    },
    Entry {
        syntax: "pass()",
        aliases: &[],
        description: "Do nothing for one step",
    },
];

/// Condition forms for `while` and `if`
pub const SENSORS: &[Entry] = &[
    Entry {
        syntax: "True",
        aliases: &[],
        description: "Always true",
    },
    Entry {
        syntax: "False",
        aliases: &[],
        description: "Always false",
    },
    Entry {
        syntax: "check_ripe()",
        aliases: &[],
        description: "The tile under the bot is ripe",
    },
    Entry {
        syntax: "check_soil()",
        aliases: &[],
        description: "The tile under the bot is empty soil",
    },
    Entry {
        syntax: "bot.x == N",
        aliases: &["agent.x == N"],
        description: "The bot's column equals N",
    },
    Entry {
        syntax: "bot.y == N",
        aliases: &["agent.y == N"],
        description: "The bot's row equals N",
    },
];

/// Block headers
pub const BLOCKS: &[Entry] = &[
    Entry {
        syntax: "for i in range(N):",
        aliases: &[],
        description: "Repeat the indented block N times",
    },
    Entry {
        syntax: "while <condition>:",
        aliases: &[],
        description: "Repeat the indented block while the condition holds",
    },
    Entry {
        syntax: "if <condition>:",
        aliases: &[],
        description: "Run the indented block once if the condition holds",
    },
    Entry {
        syntax: "else:",
        aliases: &[],
        description: "Run the indented block when reached",
    },
];

fn render_section(out: &mut String, title: &str, entries: &[Entry]) {
    out.push_str(&format!("## {}\n\n", title));
    for entry in entries {
        out.push_str(&format!("- `{}`", entry.syntax));
        if !entry.aliases.is_empty() {
            out.push_str(&format!(" (or `{}`)", entry.aliases.join("`, `")));
        }
        out.push_str(&format!(": {}\n", entry.description));
    }
    out.push('\n');
}

/// Reference card for the language, with the economy filled in
pub fn reference(config: &GameConfig) -> String {
    let mut out = String::new();
    out.push_str("# Code Farm Script Reference\n\n");
    render_section(&mut out, "Commands", COMMANDS);
    render_section(&mut out, "Conditions", SENSORS);
    render_section(&mut out, "Blocks", BLOCKS);

    out.push_str("## Farm\n\n");
    out.push_str(&format!(
        "- The grid is {size}x{size}; (0,0) is the top-left corner\n",
        size = config.grid_size
    ));
    out.push_str(&format!(
        "- plant() costs {} G, water() costs {} G, harvest() earns {} G\n",
        config.plant_cost, config.water_cost, config.harvest_value
    ));
    out.push_str("- Indent blocks with 4 spaces (a tab counts as 4)\n");
    out.push_str("- There are no variables, no arithmetic and no and/or/not\n");
    out
}

/// Reference as JSON for structured consumption
pub fn to_json() -> String {
    serde_json::json!({
        "commands": COMMANDS,
        "sensors": SENSORS,
        "blocks": BLOCKS,
    })
    .to_string()
}
