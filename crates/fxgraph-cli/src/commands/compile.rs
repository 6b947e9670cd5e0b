//! Engine compilation command.

use std::path::PathBuf;

use clap::Args;
use fxgraph_contract::compile;

use super::common::{read_payload, write_text};

#[derive(Args)]
pub struct CompileArgs {
    /// Graph payload file (`-` for stdin)
    file: PathBuf,

    /// Write the runtime graph here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    let payload = read_payload(&args.file)?;
    let runtime = compile(&payload);
    if !runtime.has_output_path {
        tracing::warn!("{}: output is not reachable from input", args.file.display());
    }
    write_text(args.output.as_deref(), &serde_json::to_string_pretty(&runtime)?)
}
