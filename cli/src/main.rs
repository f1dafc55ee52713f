mod report;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use meterlog_core::config::DEFAULT_REFERENCE_YEAR;
use meterlog_core::repository::export_file_name;
use meterlog_core::{
    parse_reading_args, DashboardUseCase, Dataset, DatasetService, EngineConfig,
    InMemoryDatasetRepository,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meterlog")]
#[command(about = "Year-over-year analysis of cumulative meter readings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show growth, monthly consumption and the current month forecast
    Report {
        /// CSV files with a category,date,value header
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print the computed view as JSON instead of tables
        #[arg(long)]
        json: bool,
        /// Year the yearly curves are overlaid on
        #[arg(long, default_value_t = DEFAULT_REFERENCE_YEAR)]
        reference_year: i32,
    },
    /// Append a reading (usage: add water.csv date:2025-01-31 value:1234 [name:Water])
    Add {
        file: PathBuf,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Write the readings again under a new category name
    Export {
        file: PathBuf,
        #[arg(long)]
        name: String,
        /// Output directory (default: current directory)
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

type Service = DatasetService<InMemoryDatasetRepository>;

fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "dataset".to_string())
}

fn import_file(service: &Service, path: &Path) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    service.import_csv_dataset(&dataset_name(path), BufReader::new(file))
}

fn export_to(service: &Service, ds: &Dataset, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Could not write {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    service.export_csv(&ds.id, &mut writer)?;
    writer.flush()?;
    info!(path = %path.display(), "wrote dataset");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = DatasetService::new(InMemoryDatasetRepository::new());

    match cli.command {
        Commands::Report {
            files,
            json,
            reference_year,
        } => {
            let config = EngineConfig::with_reference_year(reference_year)?;
            let usecase = DashboardUseCase::new(&config);

            let mut views = Vec::new();
            for path in &files {
                let ds = import_file(&service, path)?;
                match usecase.build(&ds) {
                    Some(view) => views.push(view),
                    None => eprintln!("{}: no readings with a valid date", ds.name),
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                for view in &views {
                    report::print_view(view);
                }
            }
        }
        Commands::Add { file, args } => {
            let parsed = parse_reading_args(&args)?;
            let ds = import_file(&service, &file)?;
            if let Some(name) = &parsed.name {
                service.rename_dataset(&ds.id, name)?;
            }
            service.push_entry(&ds.id, parsed.entry.clone())?;

            let ds = service.get_dataset(&ds.id)?;
            export_to(&service, &ds, &file)?;
            println!(
                "Reading added: {} = {} ({} readings in {})",
                parsed.entry.date,
                parsed.entry.value,
                ds.entries.len(),
                file.display()
            );
        }
        Commands::Export { file, name, out } => {
            if !out.is_dir() {
                return Err(anyhow!("Output directory {} does not exist", out.display()));
            }
            let ds = import_file(&service, &file)?;
            service.rename_dataset(&ds.id, &name)?;

            let ds = service.get_dataset(&ds.id)?;
            let target = out.join(export_file_name(&ds.name));
            export_to(&service, &ds, &target)?;
            println!("Exported {} readings to {}", ds.entries.len(), target.display());
        }
    }
    Ok(())
}
