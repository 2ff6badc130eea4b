use std::{fs::File, io, io::BufReader};

use anyhow::Context;
use clap::Parser;
use fatsim::{cli_interface::FatSimCli, shell::Shell, FileSystem};
/// a CLI interface to users to explore a simulated FAT filesystem,
/// either by typing commands or by running a script of them.
///
/// The filesystem lives in memory only and is gone when the program exits.
fn main() -> anyhow::Result<()> {
    env_logger::builder().format_timestamp_nanos().init();
    let args = FatSimCli::parse();
    match args {
        FatSimCli::Shell(args) => {
            let fs = FileSystem::new(args.disk.config()?);
            let mut shell =
                Shell::new(fs, io::stdin().lock(), io::stdout().lock()).with_prompt(true);
            shell.run()?;
        }
        FatSimCli::Run(args) => {
            let fs = FileSystem::new(args.disk.config()?);
            let script = File::open(&args.script)
                .with_context(|| format!("can't open script {}", args.script))?;
            let mut shell = Shell::new(fs, BufReader::new(script), io::stdout().lock());
            shell.run()?;
        }
    }
    Ok(())
}
