//! Contract validation command.

use std::path::PathBuf;

use clap::Args;
use fxgraph_config::Settings;
use fxgraph_contract::graph_state_from_payload;

use super::common::read_payload;

#[derive(Args)]
pub struct ValidateArgs {
    /// Graph payload file (`-` for stdin)
    file: PathBuf,
}

pub fn run(args: ValidateArgs, settings: &Settings) -> anyhow::Result<()> {
    let payload = read_payload(&args.file)?;
    let state = graph_state_from_payload(&payload, settings.node_limit)
        .map_err(|e| anyhow::anyhow!("{}: {e}", args.file.display()))?;

    println!(
        "{}: valid (schema {}, {} nodes, {} edges, node limit {})",
        args.file.display(),
        payload.schema_version,
        payload.nodes.len(),
        payload.edges.len(),
        state.node_limit()
    );
    Ok(())
}
