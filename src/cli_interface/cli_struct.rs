use clap::Parser;

use crate::fs::{FsConfig, BLOCK_SIZE, MAX_BLOCK_COUNT};

/// explore a simulated FAT filesystem that lives in memory only
#[derive(Parser, Debug, PartialEq)]
#[command(author, version, about, long_about)]
pub enum FatSimCli {
    /// start an interactive shell on a fresh filesystem
    Shell(ShellArgs),
    /// run the shell commands of a script file on a fresh filesystem
    Run(RunArgs),
}

/// geometry of the simulated disk
#[derive(clap::Args, Debug, PartialEq)]
pub struct DiskArgs {
    /// the number of blocks of the disk
    #[clap(short = 'c', long, default_value_t = MAX_BLOCK_COUNT)]
    pub block_count: u32,
    /// the number of content units per block
    #[clap(short, long, default_value_t = BLOCK_SIZE)]
    pub block_size: u32,
}

impl DiskArgs {
    pub fn config(&self) -> anyhow::Result<FsConfig> {
        FsConfig::new(self.block_count, self.block_size)
    }
}

/// interactive shell subcommand
#[derive(clap::Args, Debug, PartialEq)]
#[command(author, version, about = "start an interactive shell")]
pub struct ShellArgs {
    #[command(flatten)]
    pub disk: DiskArgs,
}

/// script subcommand
#[derive(clap::Args, Debug, PartialEq)]
#[command(author, version, about = "run a script of shell commands")]
pub struct RunArgs {
    /// the path of the script, one command per line
    #[clap(short, long)]
    pub script: String,
    #[command(flatten)]
    pub disk: DiskArgs,
}

/// test the `FatSimCli` struct
/// test `shell` subcommand
#[cfg(test)]
mod shell_parse_args_tests {
    use super::*;
    /// test default geometry
    #[test]
    fn test_default_parameters() {
        let args = FatSimCli::parse_from(["fatsim", "shell"]);
        assert_eq!(
            args,
            FatSimCli::Shell(ShellArgs {
                disk: DiskArgs {
                    block_count: 131072,
                    block_size: 1024,
                },
            })
        );
    }
    /// test short parameter form
    #[test]
    fn test_short_parameter_form() {
        let args = FatSimCli::parse_from(["fatsim", "shell", "-c", "64", "-b", "512"]);
        assert_eq!(
            args,
            FatSimCli::Shell(ShellArgs {
                disk: DiskArgs {
                    block_count: 64,
                    block_size: 512,
                },
            })
        );
    }
}

/// test the `FatSimCli` struct
/// test `run` subcommand
#[cfg(test)]
mod run_parse_args_tests {
    use super::*;
    /// test long parameter form
    #[test]
    fn test_long_parameter_form() {
        let args = FatSimCli::parse_from([
            "fatsim",
            "run",
            "--script",
            "demo.txt",
            "--block-count",
            "128",
            "--block-size",
            "1024",
        ]);
        assert_eq!(
            args,
            FatSimCli::Run(RunArgs {
                script: "demo.txt".to_string(),
                disk: DiskArgs {
                    block_count: 128,
                    block_size: 1024,
                },
            })
        );
    }

    #[test]
    fn test_zero_block_count_is_rejected() {
        let FatSimCli::Run(args) =
            FatSimCli::parse_from(["fatsim", "run", "-s", "x", "-c", "0"])
        else {
            panic!("expected `run` subcommand");
        };
        assert!(args.disk.config().is_err());
    }
}
