//! mesh-cli: Command-line interface for displacing mesh selections.
//!
//! Loads an OBJ mesh, selects faces, edges or vertices by index, moves the
//! selection along its normals and writes the result.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=mesh_displace=info` - Operation summaries
//! - `RUST_LOG=mesh_displace=debug` - Classification and accumulation counts
//! - `RUST_LOG=mesh_displace=trace` - Per-vertex offsets
//! - `RUST_LOG=mesh_edit::timing=info` - Performance timing
//!
//! # Example
//!
//! ```bash
//! # Push two faces out by half a unit
//! mesh displace panel.obj -o panel_out.obj --distance 0.5 --faces 0,1
//!
//! # Move an edge loop inward with debug output
//! RUST_LOG=debug mesh displace panel.obj -o out.obj --distance -0.2 --edges 0:1,1:2
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{displace, info};

/// mesh - Displace selected mesh elements along their normals.
///
/// Selections are given by element index; run `mesh info` to see counts.
#[derive(Parser)]
#[command(name = "mesh")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh statistics and information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Move selected faces, edges or vertices along their normals
    Displace {
        /// Input mesh file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Signed distance; negative moves against the normals
        #[arg(long, short, allow_negative_numbers = true, required_unless_present = "config")]
        distance: Option<f64>,

        /// Face indices to select, e.g. 0,1,5
        #[arg(long, value_delimiter = ',')]
        faces: Vec<u32>,

        /// Edges to select as vertex index pairs, e.g. 0:1,1:2
        #[arg(long, value_delimiter = ',', value_parser = displace::parse_vertex_pair)]
        edges: Vec<(u32, u32)>,

        /// Vertex indices to select, e.g. 3,4
        #[arg(long, value_delimiter = ',')]
        vertices: Vec<u32>,

        /// Select every element
        #[arg(long)]
        all: bool,

        /// TOML file with displacement parameters (--distance overrides)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    // If quiet, don't initialize any tracing
    if quiet {
        return;
    }

    // Check RUST_LOG first, then fall back to -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "mesh_edit=info,mesh_displace=info",
            2 => "mesh_edit=debug,mesh_displace=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

/// Print a typed error with its code and suggestion, or the plain chain.
fn report_error(e: &anyhow::Error) {
    if let Some(mesh_err) = e.downcast_ref::<mesh_edit::MeshError>() {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        eprintln!("  {}: {}", "Code".cyan(), mesh_err.code());
        eprintln!(
            "  {}: {}",
            "Suggestion".green(),
            mesh_err.recovery_suggestion()
        );
        if let Some(location) = mesh_err.location() {
            eprintln!("  {}: {}", "Location".yellow(), location);
        }
    } else if let Some(displace_err) = e.downcast_ref::<mesh_displace::DisplaceError>() {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        eprintln!("  {}: {}", "Code".cyan(), displace_err.code());
        eprintln!(
            "  {}: {}",
            "Suggestion".green(),
            displace_err.recovery_suggestion()
        );
    } else {
        eprintln!("{}: {}", "Error".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {}: {}", "Caused by".yellow(), cause);
        }
    }
}

fn main() -> Result<()> {
    // Nicer panic reports in development builds
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Info { input } => info::run(input, &cli),
        Commands::Displace {
            input,
            output,
            distance,
            faces,
            edges,
            vertices,
            all,
            config,
        } => {
            let selection = displace::SelectionArgs {
                faces: faces.clone(),
                edges: edges.clone(),
                vertices: vertices.clone(),
                all: *all,
            };
            displace::run(input, output, *distance, &selection, config.as_deref(), &cli)
        }
    };

    if let Err(e) = &result {
        if !cli.quiet {
            report_error(e);
        }
        std::process::exit(1);
    }

    Ok(())
}
