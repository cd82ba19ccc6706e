// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XMapper contract checker
//!
//! # Usage
//!
//! ```bash
//! # Write an example manifest
//! xmapper-gen gen-manifest -o xmapper.toml
//!
//! # Validate every contract (exit status 1 on diagnostics)
//! xmapper-gen check xmapper.toml
//!
//! # Show the strategy tree of every method
//! xmapper-gen explain xmapper.toml --json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use xmapper_gen::{analyze, render_text, Manifest};

/// XMapper contract checker
#[derive(Parser, Debug)]
#[command(name = "xmapper-gen")]
#[command(about = "Validate and explain XMapper mapping contracts")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate every contract of a manifest
    Check {
        /// Manifest file path
        manifest: PathBuf,
    },

    /// Print the strategy tree of every contract method
    Explain {
        /// Manifest file path
        manifest: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate an example manifest
    GenManifest {
        /// Output file path
        #[arg(short, long, default_value = "xmapper.toml")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Check { manifest } => {
            if !cmd_check(&manifest)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Explain { manifest, json } => cmd_explain(&manifest, json),
        Commands::GenManifest { output } => cmd_gen_manifest(&output),
    }
}

fn load(path: &Path) -> anyhow::Result<Manifest> {
    tracing::info!("Loading manifest {}", path.display());
    Manifest::from_file(path).with_context(|| format!("cannot load {}", path.display()))
}

fn cmd_check(path: &Path) -> anyhow::Result<bool> {
    let reports = analyze(&load(path)?)?;

    let mut ok = true;
    for report in &reports {
        if report.is_ok() {
            println!("[OK]    {} ({} method(s))", report.contract, report.methods.len());
        } else {
            ok = false;
            println!("[ERROR] {}", report.contract);
            for error in &report.errors {
                println!("        {}", error);
            }
        }
    }
    println!();
    println!(
        "{} contract(s), {} rejected",
        reports.len(),
        reports.iter().filter(|r| !r.is_ok()).count()
    );
    Ok(ok)
}

fn cmd_explain(path: &Path, json: bool) -> anyhow::Result<()> {
    let reports = analyze(&load(path)?)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print!("{}", render_text(&reports));
    }
    Ok(())
}

fn cmd_gen_manifest(output: &Path) -> anyhow::Result<()> {
    let content = toml::to_string_pretty(&Manifest::example())?;
    std::fs::write(output, content)
        .with_context(|| format!("cannot write {}", output.display()))?;
    println!("Example manifest written to {}", output.display());
    Ok(())
}
