//! itemsmith command-line entry point.
//!
//! # Responsibility
//! - Build a directory of definitions into an in-memory pack.
//! - Validate single identifiers and list registered types.
//! - Keep output deterministic: JSON on stdout, diagnostics in the log.

use clap::{Parser, Subcommand};
use itemsmith_core::{
    bulk_implement, collect_definitions, core_version, init_logging, load_config, BuildConfig,
    DefinitionEngine, FinalizeContext, IdentifierValidator, MemoryPack,
};
use log::info;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "itemsmith", version, about = "Declarative custom item builder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build every definition under a directory into one pack.
    Build {
        /// JSON config file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Definitions directory, overriding the config.
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Write the pack JSON here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Stop at the first failing definition.
        #[arg(long)]
        strict: bool,
    },
    /// Validate one identifier.
    Check {
        identifier: String,
        #[arg(long)]
        tag: bool,
        #[arg(long)]
        negation: bool,
        #[arg(long)]
        no_paths: bool,
    },
    /// List registered definition types and their operations.
    Types,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Build {
            config,
            dir,
            out,
            strict,
        } => {
            let mut config = match config {
                Some(path) => load_config(&path)?,
                None => BuildConfig::default(),
            };
            if let Some(dir) = dir {
                config.definitions_dir = dir;
            }
            config.strict |= strict;
            build(&config, out)
        }
        Command::Check {
            identifier,
            tag,
            negation,
            no_paths,
        } => {
            let validator = IdentifierValidator::new(tag, negation, !no_paths);
            println!("{}", validator.validate(&identifier)?);
            Ok(())
        }
        Command::Types => {
            for entry in DefinitionEngine::default().registry().entries() {
                let operations: Vec<&str> = entry.operations.iter().map(|op| op.name).collect();
                println!(
                    "{} ({}): {}",
                    entry.name,
                    entry.parameters.join(", "),
                    operations.join(", ")
                );
            }
            Ok(())
        }
    }
}

fn build(config: &BuildConfig, out: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    init_logging(&config.log_level, config.log_dir.as_deref())?;
    info!(
        "event=cli_build module=cli status=start version={} dir={}",
        core_version(),
        config.definitions_dir.display()
    );

    let sources = collect_definitions(&config.definitions_dir)?;
    let engine = DefinitionEngine::default();
    let mut ctx = FinalizeContext::new(config.pack_format);
    let mut pack = MemoryPack::new(config.pack_name.as_str(), config.pack_format);
    let outcome = bulk_implement(&engine, &sources, &mut pack, &mut ctx, config.strict)?;

    let rendered = serde_json::to_string_pretty(&pack.to_json())?;
    match out {
        Some(path) => fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }
    for built in &outcome.built {
        eprintln!(
            "built {}: {} [{} {}] artifacts={}",
            built.origin, built.display_name, built.type_name, built.identity, built.artifacts
        );
    }
    for skipped in &outcome.skipped {
        eprintln!("skipped {}: {}", skipped.origin, skipped.reason);
    }
    eprintln!(
        "built={} skipped={} artifacts={} advisories={}",
        outcome.built.len(),
        outcome.skipped.len(),
        outcome.artifact_count(),
        ctx.advisories().len()
    );
    Ok(())
}
