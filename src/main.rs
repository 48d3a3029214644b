// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use djset::config::{FileWatcher, SetFile, WatchEvent};
use djset::export::{self, ExportFormat};
use djset::ingest::{self, RawFeatures, RawTrack};
use djset::music::{asymmetries, CamelotKey};
use djset::{SetCompiler, SetRequest, TrackLibrary};

/// djset - harmonic DJ set sequencer
#[derive(Parser)]
#[command(name = "djset", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize catalog tracks and features into the library file
    Import {
        /// JSON array of track items
        #[arg(long)]
        tracks: PathBuf,
        /// JSON array of audio-feature records (nulls allowed)
        #[arg(long)]
        features: Option<PathBuf>,
        /// Library snapshot, created if missing
        #[arg(long, env = "DJSET_LIBRARY", default_value = "library.json")]
        library: PathBuf,
    },
    /// Compile a set from the library
    Build(BuildArgs),
    /// List the energy profiles
    Profiles {
        /// YAML or TOML config with custom profiles
        #[arg(long, env = "DJSET_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print the Camelot wheel with each key's compatible keys
    Wheel,
}

#[derive(Args)]
struct BuildArgs {
    /// Library snapshot
    #[arg(long, env = "DJSET_LIBRARY", default_value = "library.json")]
    library: PathBuf,
    /// Set length in minutes
    #[arg(long)]
    minutes: Option<u32>,
    /// Assumed average track length in seconds
    #[arg(long)]
    avg_track_seconds: Option<u32>,
    /// Energy profile (opening, peak, closing or a custom one)
    #[arg(long)]
    profile: Option<String>,
    /// YAML or TOML config
    #[arg(long, env = "DJSET_CONFIG")]
    config: Option<PathBuf>,
    /// Output format; inferred from --output when omitted
    #[arg(long, value_enum)]
    format: Option<Format>,
    /// Write the set here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    /// Rebuild whenever the library or config file changes
    #[arg(long)]
    watch: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
    M3u,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Table => ExportFormat::Table,
            Format::Json => ExportFormat::Json,
            Format::M3u => ExportFormat::M3u,
        }
    }
}

fn configure_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("djset=info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {:?}", path))
}

fn load_config(path: Option<&Path>) -> Result<SetFile> {
    match path {
        Some(path) => SetFile::load(path),
        None => Ok(SetFile::default()),
    }
}

fn run_import(tracks: &Path, features: Option<&Path>, library_path: &Path) -> Result<()> {
    let raw_tracks: Vec<RawTrack> = read_json(tracks)?;
    let raw_features: Vec<RawFeatures> = match features {
        Some(path) => read_json::<Vec<Option<RawFeatures>>>(path)?
            .into_iter()
            .flatten()
            .collect(),
        None => Vec::new(),
    };

    let mut library = TrackLibrary::load_or_default(library_path)?;
    let report = ingest::import(&mut library, &raw_tracks, &raw_features);
    library.save(library_path)?;

    println!(
        "Imported {} tracks ({} skipped); library now holds {}",
        report.imported,
        report.skipped,
        library.len()
    );
    Ok(())
}

fn output_format(args: &BuildArgs) -> ExportFormat {
    if let Some(format) = args.format {
        return format.into();
    }
    args.output
        .as_deref()
        .and_then(|p| p.extension())
        .and_then(|ext| ext.to_str())
        .and_then(ExportFormat::parse)
        .unwrap_or_default()
}

fn build_once(args: &BuildArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let registry = config.registry()?;
    let compiler = SetCompiler::new(config.engine_settings()?);

    let profile_name = args.profile.as_deref().unwrap_or(&config.set.profile);
    let request = SetRequest::new(
        args.minutes.unwrap_or(config.set.duration_minutes),
        registry.resolve(profile_name),
    )
    .with_avg_track_seconds(args.avg_track_seconds.unwrap_or(config.set.avg_track_seconds));

    let library = TrackLibrary::load(&args.library)?;
    let set = compiler.compile(library.tracks(), &request)?;

    let format = output_format(args);
    match &args.output {
        Some(path) => {
            export::write(&set, format, path)?;
            info!(path = ?path, tracks = set.len(), "Set written");
        }
        None => println!("{}", export::render(&set, format)?),
    }
    Ok(())
}

fn run_build(args: &BuildArgs) -> Result<()> {
    build_once(args)?;
    if !args.watch {
        return Ok(());
    }

    let mut paths = vec![args.library.clone()];
    paths.extend(args.config.clone());
    let watcher = FileWatcher::new(&paths, None)?;
    info!("Watching {} file(s) for changes (Ctrl+C to stop)", paths.len());

    while let Some(event) = watcher.recv() {
        match event {
            WatchEvent::Changed(path) => {
                info!(path = ?path, "Rebuilding set");
                if let Err(e) = build_once(args) {
                    error!("Rebuild failed: {:#}", e);
                }
            }
            WatchEvent::Error(e) => warn!("File watcher error: {}", e),
        }
    }
    Ok(())
}

fn run_profiles(config: Option<&Path>) -> Result<()> {
    let registry = load_config(config)?.registry()?;
    for profile in registry.profiles() {
        println!("{}", profile);
    }
    Ok(())
}

fn run_wheel() {
    for key in CamelotKey::all() {
        let neighbors: Vec<String> = key
            .neighbors()
            .into_iter()
            .filter(|n| *n != key)
            .map(|n| n.to_string())
            .collect();
        println!("{:>3}  {:<9} -> {}", key, key.musical_name(), neighbors.join(" "));
    }

    let one_way = asymmetries();
    println!();
    println!("{} one-way pairs (energy boost only mixes upward):", one_way.len());
    for (from, to) in one_way {
        println!("  {} -> {}", from, to);
    }
}

fn main() -> Result<()> {
    configure_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Import {
            tracks,
            features,
            library,
        } => run_import(&tracks, features.as_deref(), &library),
        Command::Build(args) => run_build(&args),
        Command::Profiles { config } => run_profiles(config.as_deref()),
        Command::Wheel => {
            run_wheel();
            Ok(())
        }
    }
}
