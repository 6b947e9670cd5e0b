//! Effect kind and parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use fxgraph_core::{NodeKind, ParamScale, param_specs};

#[derive(Args)]
pub struct SchemaArgs {
    /// Show parameters for a single kind
    #[arg(value_name = "KIND")]
    kind: Option<String>,
}

pub fn run(args: SchemaArgs) -> anyhow::Result<()> {
    let kinds: Vec<NodeKind> = match &args.kind {
        Some(name) => vec![name.parse().map_err(|e| anyhow::anyhow!("{e}"))?],
        None => NodeKind::EFFECTS.to_vec(),
    };

    for kind in kinds {
        print_kind(kind);
    }
    Ok(())
}

fn print_kind(kind: NodeKind) {
    let title = format!("{} ({}, engine id {})", kind.label(), kind, kind.effect_type());
    println!("{title}");
    println!("{}", "=".repeat(title.len()));

    let specs = param_specs(kind);
    if specs.is_empty() {
        println!("  (no parameters)");
        println!();
        return;
    }

    println!(
        "  {:10}  {:10}  {:>9}  {:>9}  {:>10}  {}",
        "Key", "Label", "Min", "Max", "Default", "Scale"
    );
    println!(
        "  {:10}  {:10}  {:>9}  {:>9}  {:>10}  {}",
        "---", "-----", "---", "---", "-------", "-----"
    );
    for spec in specs {
        let scale = match spec.scale {
            ParamScale::Linear => "linear",
            ParamScale::Logarithmic => "log",
        };
        println!(
            "  {:10}  {:10}  {:>9}  {:>9}  {:>10}  {}",
            spec.key,
            spec.label,
            spec.min,
            spec.max,
            spec.format(spec.default),
            scale
        );
    }
    println!();
}
