//! Item Tracker CLI
//!
//! Usage:
//!   item-tracker check layout.xml                 # Validate a layout
//!   item-tracker dump layout.xml --json           # Print the loaded model
//!   item-tracker state new layout.xml             # Write a fresh snapshot
//!   item-tracker state show layout.xml -s run.txt # Apply a snapshot and print it

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use item_tracker::display::{DisplaySink, Handle};
use item_tracker::{Config, MemorySink, StateStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "item-tracker")]
#[command(about = "Item tracker layout and session tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a layout, then print a summary
    Check {
        /// Layout file (.xml)
        config: PathBuf,
    },

    /// Print the loaded layout model
    Dump {
        /// Layout file (.xml)
        config: PathBuf,

        /// Print as JSON instead of debug output
        #[arg(long)]
        json: bool,
    },

    /// Session snapshot commands
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
}

#[derive(Subcommand)]
enum StateCommands {
    /// Write the snapshot of a freshly loaded session
    New {
        /// Layout file (.xml)
        config: PathBuf,

        /// Snapshot file (defaults to the layout's StatePath)
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Inventory to capture (defaults to the layout's DefaultInventory)
        #[arg(short, long)]
        inventory: Option<i32>,
    },

    /// Apply a snapshot onto a fresh session and print the result
    Show {
        /// Layout file (.xml)
        config: PathBuf,

        /// Snapshot file (defaults to the layout's StatePath)
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Inventory to restore into (defaults to the layout's DefaultInventory)
        #[arg(short, long)]
        inventory: Option<i32>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => check(&config)?,
        Commands::Dump { config, json } => dump(&config, json)?,
        Commands::State { command } => match command {
            StateCommands::New {
                config,
                state,
                inventory,
            } => state_new(&config, state, inventory)?,
            StateCommands::Show {
                config,
                state,
                inventory,
            } => state_show(&config, state, inventory)?,
        },
    }

    Ok(())
}

fn load(path: &Path, inventory: Option<i32>) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::from_file(path)?;
    if let Some(index) = inventory {
        if !config.select_inventory(index) {
            return Err(format!("inventory {} is not declared", index).into());
        }
    }
    Ok(config)
}

fn check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(path, None)?;

    println!("{}: OK", path.display());
    println!("  fonts: {}", config.fonts.len());
    for font in &config.fonts {
        println!("    [{}] {} ({})", font.index, font.name, font.path);
    }
    println!("  text settings: {}", config.text_settings.len());
    println!("  flags: {}", config.flags.len());
    match &config.gomode_settings {
        Some(gomode) => println!(
            "  go mode: {} at ({}, {}){}",
            gomode.path,
            gomode.pos.x,
            gomode.pos.y,
            if gomode.has_light() { " with light" } else { "" }
        ),
        None => println!("  go mode: none"),
    }
    println!("  inventories: {}", config.inventories.len());
    for inv in config.inventories.values() {
        let marker = if inv.index == config.default_inv { " (default)" } else { "" };
        println!(
            "    [{}] {}{}: {} items, {} slots, {} rewards",
            inv.index,
            inv.name,
            marker,
            inv.items.len(),
            inv.slot_count(),
            inv.rewards.items.len()
        );
    }
    if let Some(state_path) = &config.state_path {
        println!("  state path: {}", state_path.display());
    }
    Ok(())
}

fn dump(path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(path, None)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{:#?}", config);
    }
    Ok(())
}

fn state_new(
    path: &Path,
    state: Option<PathBuf>,
    inventory: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load(path, inventory)?;
    let mut sink = MemorySink::for_config(&config);
    config.register_fonts(&mut sink);

    let mut store = StateStore::new(&mut config, state);
    let count = store.save(&sink)?.labels.len();
    if let Some(path) = store.path() {
        println!("Wrote {} labels to {}", count, path.display());
    }
    Ok(())
}

fn state_show(
    path: &Path,
    state: Option<PathBuf>,
    inventory: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load(path, inventory)?;
    let mut sink = MemorySink::for_config(&config);
    config.register_fonts(&mut sink);

    let mut store = StateStore::new(&mut config, state);
    let report = store.open(&mut sink)?;

    println!(
        "Applied {} labels, skipped {}, {} warnings",
        report.applied,
        report.skipped(),
        report.warnings.len()
    );
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }

    println!(
        "go mode: {}",
        if sink.effect_strength(Handle::GoMode) == Some(0.0) { "on" } else { "off" }
    );
    for slot in sink.slots() {
        let Some(label) = sink.label(slot) else {
            continue;
        };
        let enabled = sink.effect_strength(Handle::Item(slot)) == Some(0.0);
        let counter = sink
            .widget(Handle::Counter(slot))
            .filter(|w| w.visible)
            .map(|w| format!(" counter={}", w.text))
            .unwrap_or_default();
        let flag = sink
            .widget(Handle::Flag(slot))
            .filter(|w| w.visible)
            .map(|w| format!(" flag='{}'", w.text))
            .unwrap_or_default();
        println!(
            "  [{}] {} img={} {}{}{}",
            slot,
            label.name,
            label.img_index,
            if enabled { "enabled" } else { "disabled" },
            counter,
            flag
        );
    }
    Ok(())
}
