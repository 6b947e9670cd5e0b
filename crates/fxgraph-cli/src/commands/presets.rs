//! Preset management commands.
//!
//! User presets live in the settings' state store; factory presets are built
//! in and read-only.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use fxgraph_config::{
    FileStore, PresetRecord, Settings, factory_presets, find_preset, get_factory_preset,
    graph_state_from_preset, load_presets, remove_preset, save_presets, upsert_preset,
};
use fxgraph_contract::{graph_state_from_payload, serialize_state};
use fxgraph_core::{GraphState, format_param, param_specs};

use super::common::{now_millis, pretty, read_payload};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List factory and user presets
    List,

    /// Show a preset's nodes and parameters
    Show {
        /// Preset name (user presets first, then factory)
        name: String,

        /// Print the stored payload instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Save a graph as a user preset (replaces a preset with the same name)
    Save {
        /// Name for the preset
        name: String,

        /// Graph payload file (`-` for stdin)
        #[arg(short, long, conflicts_with = "factory")]
        input: Option<PathBuf>,

        /// Copy a factory preset instead of reading a file
        #[arg(short, long)]
        factory: Option<String>,
    },

    /// Delete a user preset
    Delete {
        /// Preset name
        name: String,
    },

    /// Print a factory preset as a graph payload
    Factory {
        /// Factory preset name
        name: String,
    },
}

pub fn run(args: PresetsArgs, settings: &Settings) -> anyhow::Result<()> {
    let mut store = settings.store();
    match args.command {
        PresetsCommand::List => list_presets(&store),
        PresetsCommand::Show { name, json } => show_preset(&store, settings, &name, json),
        PresetsCommand::Save {
            name,
            input,
            factory,
        } => save_preset(&mut store, settings, &name, input, factory.as_deref()),
        PresetsCommand::Delete { name } => delete_preset(&mut store, &name),
        PresetsCommand::Factory { name } => {
            let preset = get_factory_preset(&name)
                .ok_or_else(|| anyhow::anyhow!("Unknown factory preset: {name}"))?;
            println!("{}", pretty(&serialize_state(&preset.graph)?)?);
            Ok(())
        }
    }
}

fn list_presets(store: &FileStore) -> anyhow::Result<()> {
    println!("Factory Presets:");
    println!("================");
    for preset in factory_presets() {
        println!("  {:20} - {}", preset.name, preset.description);
    }
    println!();

    println!("User Presets:");
    println!("=============");
    let presets = load_presets(store);
    if presets.is_empty() {
        println!("  (none)");
        println!();
        println!("  Create a preset with: fxgraph presets save <name> --input graph.json");
    } else {
        for preset in &presets {
            println!("  {:20} - {}", preset.name, describe(preset));
        }
    }
    println!();
    Ok(())
}

fn describe(preset: &PresetRecord) -> String {
    match graph_state_from_preset(preset, fxgraph_core::MAX_NODE_LIMIT) {
        Ok(state) => format!(
            "{} effects, {} edges",
            state.nodes().len().saturating_sub(2),
            state.edges().len()
        ),
        Err(_) => "(error loading)".to_string(),
    }
}

fn show_preset(store: &FileStore, settings: &Settings, name: &str, json: bool) -> anyhow::Result<()> {
    let presets = load_presets(store);
    let (title, state) = if let Some(preset) = find_preset(&presets, name) {
        (preset.name.clone(), graph_state_from_preset(preset, settings.node_limit)?)
    } else if let Some(preset) = get_factory_preset(name) {
        (format!("{} (factory)", preset.name), preset.graph)
    } else {
        anyhow::bail!("Preset '{name}' not found. Use 'fxgraph presets list' to see available presets.");
    };

    if json {
        println!("{}", pretty(&serialize_state(&state)?)?);
        return Ok(());
    }
    print_summary(&title, &state);
    Ok(())
}

fn print_summary(title: &str, state: &GraphState) {
    println!("Preset: {title}");
    println!("{}", "=".repeat(8 + title.len()));
    println!();

    println!("Nodes ({}):", state.nodes().len());
    for node in state.nodes() {
        let bypass = if node.bypass { " [BYPASSED]" } else { "" };
        println!("  {} ({}){bypass}", node.id, node.kind.label());
        for spec in param_specs(node.kind) {
            println!("      {:10} = {}", spec.key, format_param(node, spec.key));
        }
    }
    println!();

    println!("Edges ({}):", state.edges().len());
    for edge in state.edges() {
        println!("  {} -> {}", edge.from, edge.to);
    }
}

fn save_preset(
    store: &mut FileStore,
    settings: &Settings,
    name: &str,
    input: Option<PathBuf>,
    factory: Option<&str>,
) -> anyhow::Result<()> {
    let state = match (input, factory) {
        (Some(path), _) => graph_state_from_payload(&read_payload(&path)?, settings.node_limit)?,
        (None, Some(source)) => {
            get_factory_preset(source)
                .ok_or_else(|| anyhow::anyhow!("Unknown factory preset: {source}"))?
                .graph
        }
        (None, None) => anyhow::bail!("Nothing to save: pass --input <file> or --factory <name>"),
    };

    if name.trim().is_empty() {
        anyhow::bail!("Preset name must not be blank");
    }
    let presets = upsert_preset(&load_presets(store), name, &state, now_millis())?;
    save_presets(store, &presets)?;

    println!("Saved preset '{}' to {}", name.trim(), store.dir().display());
    Ok(())
}

fn delete_preset(store: &mut FileStore, name: &str) -> anyhow::Result<()> {
    let presets = remove_preset(&load_presets(store), name)?;
    save_presets(store, &presets)?;
    println!("Deleted preset '{}'", name.trim());
    Ok(())
}
