//! Command-line front end for Quarry.
//!
//! ```bash
//! quarry resolve com.acme.lint@1.0 --config quarry.toml
//! quarry chain
//! ```
//!
//! `resolve` exits with 0 when the plugin is found, 2 when no source has it
//! and 1 on any error.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quarry::prelude::*;
use serde_json::json;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Resolve plugin requests against an ordered chain of sources")]
#[command(version)]
struct Cli {
    /// Configuration file (default: quarry.toml in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Configuration profile (e.g. development, production)
    #[arg(short, long, global = true)]
    profile: Option<String>,

    /// Directory relative repository and classpath paths resolve against
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a plugin request
    Resolve {
        /// Plugin id with an optional version (e.g. com.acme.lint@1.0)
        request: String,
    },

    /// Print the resolution chain in the order it is consulted
    Chain,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = build_runtime(&cli).and_then(|runtime| match &cli.command {
        Commands::Resolve { request } => handle_resolve(&runtime, request, cli.json),
        Commands::Chain => handle_chain(&runtime, cli.json),
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_runtime(cli: &Cli) -> Result<QuarryRuntime> {
    let mut builder = QuarryRuntime::builder();
    if let Some(path) = &cli.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &cli.profile {
        builder = builder.profile(profile);
    }
    if let Some(dir) = &cli.base_dir {
        builder = builder.base_dir(dir);
    }
    Ok(builder.build()?)
}

fn handle_resolve(runtime: &QuarryRuntime, input: &str, as_json: bool) -> Result<ExitCode> {
    let request = PluginRequest::parse(input)?;
    let resolution = runtime.resolve(&request)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&resolution_json(&request, &resolution))?);
    } else {
        println!("{}", resolution.report(&request));
    }

    Ok(exit_code(&resolution))
}

fn handle_chain(runtime: &QuarryRuntime, as_json: bool) -> Result<ExitCode> {
    let names = runtime.dispatcher()?.strategy_names();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for (position, name) in names.iter().enumerate() {
            println!("{:>2}. {name}", position + 1);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn exit_code(resolution: &Resolution) -> ExitCode {
    if resolution.is_found() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn resolution_json(request: &PluginRequest, resolution: &Resolution) -> serde_json::Value {
    match resolution {
        Resolution::Found(found) => json!({
            "request": request.to_string(),
            "found": true,
            "strategy": found.strategy,
            "artifact": found.artifact,
        }),
        Resolution::NotFound(not_found) => json!({
            "request": request.to_string(),
            "found": false,
            "declined": not_found
                .declined()
                .iter()
                .map(|d| json!({ "strategy": d.strategy, "reason": d.reason }))
                .collect::<Vec<_>>(),
        }),
    }
}
