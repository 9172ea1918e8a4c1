// src/main.rs
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::{Context, Result};
use audiogram_plotter::audiogram::{
    render_audiogram_png, render_summary, AudiogramError, AudiogramPipeline, SourceFormat,
};
use audiogram_plotter::config::{PlotterConfig, CALIBRATION_ENV};
use clap::{Parser, Subcommand};
/// Plot Elbicare and Pychoacoustics hearing tests as standard audiograms
#[derive(Parser)]
#[command(name = "audiogram-plotter", version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}
#[derive(Subcommand)]
enum Command {
    /// Elbicare HT_*.TXT export, calibrated to dBA
    Elbicare {
        file: PathBuf,
        /// Calibration table (JSON)
        #[arg(long, env = CALIBRATION_ENV)]
        calibration: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Pychoacoustics result file, converted to dB HL
    Pychoacoustics {
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}
#[derive(clap::Args)]
struct OutputArgs {
    /// Write the chart as PNG
    #[arg(long)]
    png: Option<PathBuf>,
    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}
fn run(cli: Cli) -> Result<()> {
    let config = cli
        .config
        .as_ref()
        .map(PlotterConfig::load_from_file)
        .unwrap_or_default();
    let (format, file, output, mut pipeline) = match cli.command {
        Command::Elbicare {
            file,
            calibration,
            output,
        } => {
            let path = config.resolve_calibration_path(calibration.as_deref());
            log::debug!("Using calibration {:?}", path);
            (SourceFormat::Elbicare, file, output, AudiogramPipeline::new(Some(path)))
        }
        Command::Pychoacoustics { file, output } => (
            SourceFormat::Pychoacoustics,
            file,
            output,
            AudiogramPipeline::new(None),
        ),
    };
    let report = pipeline.load_file(format, &file)?;
    if output.json {
        println!("{}", report.to_json().context("failed to encode report")?);
    } else {
        print!("{}", render_summary(&report));
    }
    if let Some(png_path) = output.png {
        let png = render_audiogram_png(&report, &config.plot.style())?;
        fs::write(&png_path, png)
            .with_context(|| format!("failed to write {}", png_path.display()))?;
        log::info!("Chart written to {}", png_path.display());
    }
    Ok(())
}
fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AudiogramError>() {
                Some(audiogram_err) => eprintln!("{}: {err:#}", audiogram_err.kind()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
