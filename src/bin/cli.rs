// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh Ingest CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use mesh_ingest::cli::Reporter;
use mesh_ingest::geometry::{analyze_points, MergedGeometry};
use mesh_ingest::io::{self, has_extension, ImportOptions, MapBackend};
use mesh_ingest::IngestConfig;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "mesh-ingest")]
#[command(about = "Parallel importer and analytics for OBJ meshes and PLY point clouds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./mesh-ingest.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import an OBJ or PLY file and report what was read
    Import {
        /// Input .obj or .ply file
        input: PathBuf,

        /// Scan on a single thread
        #[arg(long)]
        sequential: bool,

        /// Number of chunks to split the file into
        #[arg(long)]
        chunks: Option<usize>,

        /// How the file is loaded (auto, mmap, buffered)
        #[arg(long, value_parser = parse_backend)]
        backend: Option<MapBackend>,

        /// Write the imported geometry (.obj, .vtk or .ply)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print bounding volumes, distance statistics and hull size
    Stats {
        /// Input .obj or .ply file
        input: PathBuf,

        /// Neighbours for the mean nearest-neighbour distance
        #[arg(short = 'k', long)]
        neighbors: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write a random sample of the input points as PLY
    Sample {
        /// Input .obj or .ply file
        input: PathBuf,

        /// Number of points to draw
        #[arg(short = 'n', long)]
        count: usize,

        /// Output .ply file
        #[arg(short, long)]
        output: PathBuf,

        /// Seed for a reproducible sample
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show version information
    Version,
}

fn parse_backend(s: &str) -> Result<MapBackend, String> {
    s.parse()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => IngestConfig::from_file(path)?,
        None => IngestConfig::load()?,
    };

    match cli.command {
        Commands::Import {
            input,
            sequential,
            chunks,
            backend,
            output,
        } => {
            let mut options = config.import_options();
            if sequential {
                options.parallel = false;
            }
            if let Some(chunks) = chunks {
                options.chunks = Some(chunks);
            }
            if let Some(backend) = backend {
                options.backend = backend;
            }
            import_command(&input, &options, output.as_deref())?;
        }
        Commands::Stats {
            input,
            neighbors,
            json,
        } => {
            let neighbors = neighbors.unwrap_or(config.neighbors);
            stats_command(&input, &config.import_options(), neighbors, json)?;
        }
        Commands::Sample {
            input,
            count,
            output,
            seed,
        } => {
            sample_command(&input, &config.import_options(), count, &output, seed)?;
        }
        Commands::Version => {
            println!("Mesh Ingest v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();
}

fn import_command(input: &Path, options: &ImportOptions, output: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    let file = input.display().to_string();

    let geometry = if has_extension(input, "obj") {
        let import = io::import_obj(input, options)?
            .with_context(|| format!("not an OBJ file: {file}"))?;
        Reporter::report_import(&file, &import.geometry, &import.report, start.elapsed());
        import.geometry
    } else if has_extension(input, "ply") {
        let import = io::import_ply_points(input, options)?
            .with_context(|| format!("not a PLY file: {file}"))?;
        Reporter::report_points(
            &file,
            import.points.len(),
            import.declared_vertices,
            &import.report,
            start.elapsed(),
        );
        points_as_geometry(import.points)
    } else {
        Reporter::report_error(&format!("Unsupported input: {file}"));
        bail!("expected a .obj or .ply file");
    };

    if let Some(output) = output {
        write_geometry(&geometry, output)?;
        Reporter::success(&format!("Wrote {}", output.display()));
    }

    Ok(())
}

fn write_geometry(geometry: &MergedGeometry, output: &Path) -> Result<()> {
    if has_extension(output, "obj") {
        io::export_obj(geometry, output)?;
    } else if has_extension(output, "vtk") {
        io::export_vtk(geometry, output)?;
    } else if has_extension(output, "ply") {
        io::export_points_ply(geometry, output)?;
    } else {
        bail!("unsupported output format: {}", output.display());
    }
    Ok(())
}

fn stats_command(input: &Path, options: &ImportOptions, neighbors: usize, json: bool) -> Result<()> {
    let points = load_points(input, options)?;
    if points.len() < 2 {
        Reporter::report_warning(&format!(
            "{} has {} point(s); distance statistics are unavailable",
            input.display(),
            points.len()
        ));
    }

    let stats = analyze_points(&points, neighbors);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{} {}", "Analytics for".bold(), input.display().to_string().cyan());
        stats.print();
    }
    Ok(())
}

fn sample_command(
    input: &Path,
    options: &ImportOptions,
    count: usize,
    output: &Path,
    seed: Option<u64>,
) -> Result<()> {
    let geometry = points_as_geometry(load_points(input, options)?);
    io::export_sampled_points_ply(&geometry, count, output, seed)
        .with_context(|| format!("Failed to write sample to {}", output.display()))?;
    Reporter::success(&format!(
        "Sampled {} of {} points -> {}",
        count,
        geometry.vertex_count(),
        output.display()
    ));
    Ok(())
}

/// Vertices of an OBJ or points of a PLY file
fn load_points(input: &Path, options: &ImportOptions) -> Result<Vec<nalgebra::Point3<f32>>> {
    if let Some(import) = io::import_obj(input, options)? {
        return Ok(import.geometry.vertices);
    }
    if let Some(import) = io::import_ply_points(input, options)? {
        return Ok(import.points);
    }
    bail!("expected a .obj or .ply file: {}", input.display())
}

fn points_as_geometry(points: Vec<nalgebra::Point3<f32>>) -> MergedGeometry {
    MergedGeometry {
        vertices: points,
        ..MergedGeometry::default()
    }
}
