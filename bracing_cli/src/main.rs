//! # Bracing CLI
//!
//! Command-line front end over `bracing_core`: creates project files,
//! manages the custom bracing stored in them, and prints compliance
//! reports as text or JSON.
//!
//! ```text
//! bracing init house.bracing.json --name "Smith House"
//! bracing custom add house.bracing.json --name "Site Portal" --per-unit 90:70
//! bracing report house.bracing.json --format json --output report.json
//! bracing check house.bracing.json
//! ```

mod config;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_embed::Embed;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bracing_core::catalog::CustomBracing;
use bracing_core::file_io::{load_catalog, load_project, parse_catalog, save_project};
use bracing_core::{BracingData, BracingError, Project};

use crate::config::{Config, LogConfig, OutputFormat};

/// Exit status for `check` when anything fails
const EXIT_NON_COMPLIANT: u8 = 1;

/// Exit status for usage, I/O and data errors
const EXIT_ERROR: u8 = 2;

const BUNDLED_CATALOG: &str = "bracing-data.json";

#[derive(Embed)]
#[folder = "assets/"]
struct Assets;

#[derive(Debug, Parser)]
#[command(name = "bracing", version, about = "Bracing rating and compliance checks")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new project file with two default tabs
    Init {
        path: PathBuf,
        #[arg(long, default_value = "New Project")]
        name: String,
        #[arg(long, default_value = "")]
        number: String,
        #[arg(long, default_value = "")]
        client: String,
        #[arg(long, default_value = "")]
        designer: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the compliance report
    Report {
        project: PathBuf,
        #[arg(long, env = "BRACING_CATALOG", value_name = "PATH")]
        catalog: Option<PathBuf>,
        #[arg(long, env = "BRACING_FORMAT", value_enum, ignore_case = true)]
        format: Option<OutputFormat>,
        /// Write the report here instead of stdout
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Exit with status 1 when any tab or line fails
    Check {
        project: PathBuf,
        #[arg(long, env = "BRACING_CATALOG", value_name = "PATH")]
        catalog: Option<PathBuf>,
    },

    /// Manage the project's custom bracing types
    #[command(subcommand)]
    Custom(CustomCommand),
}

#[derive(Debug, Subcommand)]
enum CustomCommand {
    List {
        project: PathBuf,
    },
    Add {
        project: PathBuf,
        #[arg(long)]
        name: String,
        #[command(flatten)]
        ratings: Ratings,
    },
    /// Replace the ratings of an existing entry
    Update {
        project: PathBuf,
        #[arg(long)]
        name: String,
        #[command(flatten)]
        ratings: Ratings,
    },
    /// Remove an entry; removing an unknown name is not an error
    Remove {
        project: PathBuf,
        #[arg(long)]
        name: String,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct Ratings {
    /// Per-unit rating, WIND:EQ
    #[arg(long, value_name = "WIND:EQ", value_parser = parse_per_unit)]
    per_unit: Option<PerUnit>,

    /// Length-keyed rating, KEY:WIND:EQ (repeatable)
    #[arg(long = "value", value_name = "KEY:WIND:EQ", value_parser = parse_keyed)]
    values: Vec<KeyedRating>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PerUnit {
    wind: f64,
    eq: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct KeyedRating {
    key: String,
    wind: f64,
    eq: f64,
}

fn parse_number(field: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{} must be a number, got '{}'", field, raw))
}

fn parse_per_unit(raw: &str) -> Result<PerUnit, String> {
    match raw.split(':').collect::<Vec<_>>().as_slice() {
        [wind, eq] => Ok(PerUnit {
            wind: parse_number("WIND", wind)?,
            eq: parse_number("EQ", eq)?,
        }),
        _ => Err(format!("expected WIND:EQ, got '{}'", raw)),
    }
}

fn parse_keyed(raw: &str) -> Result<KeyedRating, String> {
    match raw.split(':').collect::<Vec<_>>().as_slice() {
        [key, wind, eq] => {
            parse_number("KEY", key)?;
            Ok(KeyedRating {
                key: key.trim().to_string(),
                wind: parse_number("WIND", wind)?,
                eq: parse_number("EQ", eq)?,
            })
        }
        _ => Err(format!("expected KEY:WIND:EQ, got '{}'", raw)),
    }
}

impl Ratings {
    fn into_bracing(self, name: String) -> CustomBracing {
        match self.per_unit {
            Some(PerUnit { wind, eq }) => CustomBracing::number_based(name, wind, eq),
            None => CustomBracing::length_based(
                name,
                self.values.into_iter().map(|v| (v.key, v.wind, v.eq)),
            ),
        }
    }
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = if log.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn bundled_catalog() -> Result<BracingData> {
    let file = Assets::get(BUNDLED_CATALOG).context("bundled catalog missing from binary")?;
    let text = std::str::from_utf8(&file.data).context("bundled catalog is not UTF-8")?;
    Ok(parse_catalog(text)?)
}

/// `--catalog` or `BRACING_CATALOG`, then the configured catalog, then
/// the bundled sample.
fn resolve_catalog(flag: Option<PathBuf>, config: &Config) -> Result<BracingData> {
    match flag.or_else(|| config.catalog.clone()) {
        Some(path) => load_catalog(&path).with_context(|| format!("loading catalog {}", path.display())),
        None => {
            debug!("using bundled catalog");
            bundled_catalog()
        }
    }
}

fn open_project(path: &Path) -> Result<Project> {
    load_project(path).with_context(|| format!("loading project {}", path.display()))
}

fn store_project(project: &mut Project, path: &Path) -> Result<()> {
    project.touch();
    save_project(project, path).with_context(|| format!("saving project {}", path.display()))
}

fn run(cli: Cli, config: &Config) -> Result<ExitCode> {
    match cli.command {
        Command::Init {
            path,
            name,
            number,
            client,
            designer,
            force,
        } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            let mut project = Project::new(name, number, client);
            project.info.designer = designer;
            store_project(&mut project, &path)?;
            println!("Created {}", path.display());
        }

        Command::Report {
            project,
            catalog,
            format,
            output,
        } => {
            let catalog = resolve_catalog(catalog, config)?;
            let report = open_project(&project)?.report(&catalog);
            let text = match format.or(config.format).unwrap_or_default() {
                OutputFormat::Text => render::render_report(&report),
                OutputFormat::Json => serde_json::to_string_pretty(&report)?,
            };
            match output {
                Some(out) => {
                    std::fs::write(&out, text).with_context(|| format!("writing report {}", out.display()))?;
                    info!(path = %out.display(), "wrote report");
                    println!("Wrote {}", out.display());
                }
                None => print!("{}", text),
            }
        }

        Command::Check { project, catalog } => {
            let catalog = resolve_catalog(catalog, config)?;
            let report = open_project(&project)?.report(&catalog);
            if report.invalid_row_count() > 0 {
                println!("[WARN] {} row(s) reference unknown bracing types", report.invalid_row_count());
            }
            if report.is_compliant() {
                println!("[OK] all tabs and bracing lines comply");
            } else {
                for failure in render::render_failures(&report) {
                    println!("[FAIL] {}", failure);
                }
                return Ok(ExitCode::from(EXIT_NON_COMPLIANT));
            }
        }

        Command::Custom(CustomCommand::List { project }) => {
            let project = open_project(&project)?;
            if project.custom_bracings.is_empty() {
                println!("No custom bracing types");
            }
            for entry in project.custom_bracings.entries() {
                println!("{}", describe_custom(entry));
            }
        }

        Command::Custom(CustomCommand::Add { project: path, name, ratings }) => {
            let mut project = open_project(&path)?;
            project.custom_bracings.create(ratings.into_bracing(name.clone()))?;
            store_project(&mut project, &path)?;
            println!("Added {}", name.trim());
        }

        Command::Custom(CustomCommand::Update { project: path, name, ratings }) => {
            let mut project = open_project(&path)?;
            project.custom_bracings.update(ratings.into_bracing(name.clone()))?;
            store_project(&mut project, &path)?;
            println!("Updated {}", name);
        }

        Command::Custom(CustomCommand::Remove { project: path, name }) => {
            let mut project = open_project(&path)?;
            if project.custom_bracings.delete(&name) {
                store_project(&mut project, &path)?;
                println!("Removed {}", name);
            } else {
                println!("No custom bracing named {}", name);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn describe_custom(entry: &CustomBracing) -> String {
    if entry.is_number_based() {
        let wind = entry.wind.values().next().copied().unwrap_or(0.0);
        let eq = entry.eq.values().next().copied().unwrap_or(0.0);
        format!("{}  per unit  wind {} / EQ {}", entry.name, wind, eq)
    } else {
        let steps: Vec<String> = entry
            .wind
            .iter()
            .map(|(key, wind)| {
                let eq = entry.eq.get(key).copied().unwrap_or(0.0);
                format!("{} m: {}/{}", key, wind, eq)
            })
            .collect();
        format!("{}  per metre  {}", entry.name, steps.join(", "))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    init_tracing(&config.log);

    match run(cli, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            if let Some(code) = e.chain().find_map(|c| c.downcast_ref::<BracingError>()) {
                eprintln!("code: {}", code.error_code());
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}
