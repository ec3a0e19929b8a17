// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Coremesh CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coremesh::cli::Reporter;
use coremesh::io;
use coremesh::partition::MeshTemplate;
use coremesh::{Config, SortMode};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coremesh")]
#[command(about = "Coremesh - polytope soups, Morton ordering and face-vertex meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./coremesh.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a soup file
    Info {
        /// Input .inp or .json file
        input: PathBuf,
    },

    /// Convert between soup formats, applying the configured Morton sort
    Convert {
        input: PathBuf,

        output: PathBuf,

        /// Override the configured sort (none, vertices, elements, all)
        #[arg(long)]
        sort: Option<SortMode>,
    },

    /// Extract the elements of one elset into a new soup
    Submesh {
        input: PathBuf,

        /// Elset name
        elset: String,

        output: PathBuf,
    },

    /// Build a face-vertex mesh and check orientation and material coverage
    Validate {
        input: PathBuf,
    },

    /// Compare two soups
    Compare {
        a: PathBuf,

        b: PathBuf,

        /// Relative vertex tolerance
        #[arg(short, long)]
        tolerance: Option<f64>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    init_logging(&config, cli.verbose);

    let outcome = match cli.command {
        Commands::Info { input } => info_command(&input),
        Commands::Convert {
            input,
            output,
            sort,
        } => convert_command(&input, &output, sort, &config),
        Commands::Submesh {
            input,
            elset,
            output,
        } => submesh_command(&input, &elset, &output),
        Commands::Validate { input } => validate_command(&input),
        Commands::Compare { a, b, tolerance } => {
            compare_command(&a, &b, tolerance.unwrap_or(config.tolerance))
        }
        Commands::Version => {
            println!("coremesh v{}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
    };

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            Reporter::report_error(&format!("{e:#}"));
            std::process::exit(1);
        }
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = if verbose { "debug" } else { config.log_filter.as_str() };
        EnvFilter::new(directive)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn info_command(input: &Path) -> Result<bool> {
    let start = std::time::Instant::now();
    let soup = io::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    Reporter::report_soup(&input.display().to_string(), &soup, start.elapsed());
    Ok(true)
}

fn convert_command(
    input: &Path,
    output: &Path,
    sort: Option<SortMode>,
    config: &Config,
) -> Result<bool> {
    let mut soup = io::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let config = Config {
        morton_sort: sort.unwrap_or(config.morton_sort),
        ..config.clone()
    };
    config.apply_sort(&mut soup)?;
    io::write(output, &soup).with_context(|| format!("Failed to write {}", output.display()))?;
    Reporter::success(&format!(
        "Converted {} -> {} (sort: {:?})",
        input.display(),
        output.display(),
        config.morton_sort
    ));
    Ok(true)
}

fn submesh_command(input: &Path, elset: &str, output: &Path) -> Result<bool> {
    let soup = io::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let submesh = soup.submesh(elset)?;
    io::write(output, &submesh).with_context(|| format!("Failed to write {}", output.display()))?;
    Reporter::success(&format!(
        "Extracted '{elset}': {} elements, {} vertices -> {}",
        submesh.num_elements(),
        submesh.num_vertices(),
        output.display()
    ));
    Ok(true)
}

fn validate_command(input: &Path) -> Result<bool> {
    let soup = io::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    soup.validate()?;
    let template = MeshTemplate::from_soup(&soup)?;
    let validation = template.validate()?;

    let names = soup.material_names();
    let materials = if names.is_empty() {
        None
    } else {
        soup.material_ids(&names)?;
        Some(names.len())
    };
    Reporter::report_validation(&input.display().to_string(), &validation, materials);
    Ok(true)
}

fn compare_command(a: &Path, b: &Path, tolerance: f64) -> Result<bool> {
    let soup_a = io::read(a).with_context(|| format!("Failed to read {}", a.display()))?;
    let soup_b = io::read(b).with_context(|| format!("Failed to read {}", b.display()))?;
    let result = io::compare_soups(&soup_a, &soup_b, tolerance);
    Reporter::report_comparison(&a.display().to_string(), &b.display().to_string(), &result);
    if !result.passed {
        Reporter::report_info(&format!(
            "Exit code 1 (geometry {}, topology {})",
            result.geometry.code(),
            result.topology.code()
        ));
    }
    Ok(result.passed)
}
