//! Parameter bank encoding command.

use std::path::PathBuf;

use clap::Args;
use fxgraph_contract::{compile, encode};

use super::common::read_payload;

#[derive(Args)]
pub struct BankArgs {
    /// Graph payload file (`-` for stdin)
    file: PathBuf,

    /// Revision written to the last slot
    #[arg(short, long, default_value_t = 1)]
    revision: u64,

    /// Only print non-zero writes
    #[arg(long)]
    nonzero: bool,
}

pub fn run(args: BankArgs) -> anyhow::Result<()> {
    let payload = read_payload(&args.file)?;
    let writes = encode(&compile(&payload), args.revision);

    for write in writes.iter().filter(|w| !args.nonzero || w.value != 0.0) {
        println!("{:>4} {}", write.index, write.value);
    }
    Ok(())
}
