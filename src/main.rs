use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use p4overlay::model::{Changelist, OverlayConfig};
use p4overlay::overlay::{self, MaterializeOptions};
use p4overlay::p4::Perforce;
use p4overlay::workspace_init;

#[derive(Parser)]
#[command(name = "p4overlay")]
#[command(about = "Overlay folders for script changelists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the overlay folder for a batch of changelists
    Pack {
        /// Optional client (workspace) name followed by changelist numbers
        #[arg(required = true)]
        args: Vec<String>,

        /// Destination root (defaults to ./OverlayFolder)
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Config file (defaults to ./p4overlay.json when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip creating the zip archive
        #[arg(long)]
        no_archive: bool,

        /// Skip revealing the folder when done
        #[arg(long)]
        no_reveal: bool,
    },

    /// Generate .p4config and a .code-workspace file for a client
    InitWorkspace {
        workspace: String,

        /// Config file (defaults to ./p4overlay.json when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    p4overlay::logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack {
            args,
            dest,
            config,
            no_archive,
            no_reveal,
        } => {
            let config = OverlayConfig::load(config.as_deref())?;
            let p4 = Perforce::system();
            let (workspace, changes) = split_workspace_args(&p4, &args)?;
            let dest_root = match dest {
                Some(dest) => dest,
                None => std::env::current_dir()
                    .context("get current dir")?
                    .join(&config.dest_name),
            };
            let options = MaterializeOptions {
                archive: !no_archive,
                reveal: !no_reveal,
            };
            let manifest =
                overlay::build_overlay(&p4, &config, &workspace, &changes, &dest_root, &options)?;
            if manifest.is_empty() {
                println!("no script files in target changelists");
            } else {
                print!("{}", manifest.render());
                println!("overlay ready at {}", dest_root.display());
            }
        }

        Commands::InitWorkspace { workspace, config } => {
            let config = OverlayConfig::load(config.as_deref())?;
            let p4 = Perforce::system();
            workspace_init::init_workspace(&p4, &config, &workspace)?;
            println!("workspace files written for {}", workspace);
        }
    }

    Ok(())
}

/// A leading non-numeric argument names the workspace when such a client
/// exists; otherwise every argument is a changelist number and local-file
/// resolution is skipped.
fn split_workspace_args(p4: &Perforce, args: &[String]) -> Result<(String, Vec<Changelist>)> {
    let mut rest = args;
    let mut workspace = String::new();
    if let Some(first) = args.first()
        && first.parse::<u32>().is_err()
        && p4.client_exists(first)
    {
        workspace = first.clone();
        rest = &args[1..];
    }

    let mut changes = Vec::new();
    for arg in rest {
        let number: u32 = arg
            .parse()
            .with_context(|| format!("invalid changelist number {arg:?}"))?;
        if number == 0 {
            bail!("changelist number must be positive");
        }
        changes.push(Changelist(number));
    }
    if changes.is_empty() {
        bail!("no changelist numbers given");
    }
    Ok((workspace, changes))
}
