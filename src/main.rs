//! pedar-probe CLI
//!
//! Plantar pressure analysis for pedar insole recordings.
//! Loads a guiding file, averages sensor attributes over the trial tree and
//! exports tables and foot heatmaps.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

use pedar_probe::analysis::Attribute;
use pedar_probe::commands::{
    display_version, execute_analyse, execute_compare, execute_inspect, parse_node_path,
    AnalyseArgs, CompareArgs, CompareMode, InspectArgs, LoadArgs,
};
use pedar_probe::heatmap::ColorRange;
use pedar_probe::utils::config::ProbeConfig;

/// pedar-probe - plantar pressure analysis for pedar recordings
#[derive(Parser, Debug)]
#[command(name = "pedar-probe")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true, env = "PEDAR_PROBE_CONFIG")]
    config: Option<PathBuf>,
}

/// Options shared by every command that loads data
#[derive(Args, Debug)]
struct LoadOpts {
    /// Guiding file (xlsx/xls/ods or csv)
    #[arg(short, long)]
    guide: PathBuf,

    /// Accepted condition label (repeatable)
    #[arg(long = "condition")]
    conditions: Vec<String>,

    /// Fraction of guiding file entries to load, in (0, 1]
    #[arg(long)]
    max_read_rate: Option<f64>,

    /// Header lines to skip in .asc recordings
    #[arg(long)]
    asc_header_rows: Option<usize>,

    /// Restructure into a comma separated layer layout, e.g. root,condition,compress
    #[arg(long)]
    layout: Option<String>,

    /// Hide the loading progress bar
    #[arg(long)]
    no_progress: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the trial tree
    Inspect {
        #[command(flatten)]
        load: LoadOpts,

        /// Node to print, as a / separated key path
        #[arg(short, long)]
        node: Option<String>,

        /// Show each stance's (samples, sensors) shape
        #[arg(long)]
        shapes: bool,
    },

    /// Compute and export a sensor attribute
    Analyse {
        #[command(flatten)]
        load: LoadOpts,

        /// sensor_peak or sensor_pti
        #[arg(short, long, default_value = "sensor_peak")]
        attribute: String,

        /// Analysed node, as a / separated key path
        #[arg(short, long)]
        node: Option<String>,

        /// Layer whose nodes become table rows
        #[arg(long, default_value = "condition")]
        export_layer: String,

        /// Output folder
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Suffix appended to output file names
        #[arg(long, default_value = "")]
        suffix: String,

        /// Also write a JSON report to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Export a foot heatmap of the analysed node
        #[arg(long)]
        heatmap: bool,

        /// Foot mask image
        #[arg(long)]
        mask: Option<PathBuf>,

        /// Heatmap colour range: static, auto, or min,max
        #[arg(long, default_value = "static")]
        range: String,
    },

    /// Combine the heatmaps of several nodes
    Compare {
        #[command(flatten)]
        load: LoadOpts,

        /// sensor_peak or sensor_pti
        #[arg(short, long, default_value = "sensor_peak")]
        attribute: String,

        /// Compared node, as a / separated key path (repeatable)
        #[arg(short, long = "node", required = true)]
        nodes: Vec<String>,

        /// How the heatmaps are combined
        #[arg(long, value_enum, default_value = "difference")]
        mode: ModeArg,

        /// Foot mask image
        #[arg(long)]
        mask: Option<PathBuf>,

        /// Heatmap colour range: static, auto, or min,max
        #[arg(long, default_value = "auto")]
        range: String,

        /// Output folder
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Suffix appended to the output file name
        #[arg(long, default_value = "")]
        suffix: String,
    },

    /// Display version information
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Difference,
    Average,
}

impl From<ModeArg> for CompareMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Difference => CompareMode::Difference,
            ModeArg::Average => CompareMode::Average,
        }
    }
}

impl LoadOpts {
    /// Merge with the config file; flags win
    fn into_load_args(self, config: &ProbeConfig) -> LoadArgs {
        LoadArgs {
            guide: self.guide,
            conditions: if self.conditions.is_empty() {
                config.conditions.clone()
            } else {
                self.conditions
            },
            max_read_rate: self.max_read_rate.unwrap_or(config.max_read_rate),
            asc_header_rows: self.asc_header_rows.unwrap_or(config.asc_header_rows),
            layout: self.layout.map(|l| {
                l.split(',')
                    .map(|layer| layer.trim().to_string())
                    .collect()
            }),
            progress: !self.no_progress,
        }
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let config = ProbeConfig::load_or_default(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Inspect { load, node, shapes } => {
            let args = InspectArgs {
                load: load.into_load_args(&config),
                node: node.as_deref().map(parse_node_path).unwrap_or_default(),
                shapes,
            };
            execute_inspect(args)?;
        }

        Commands::Analyse {
            load,
            attribute,
            node,
            export_layer,
            output_dir,
            suffix,
            json,
            heatmap,
            mask,
            range,
        } => {
            let args = AnalyseArgs {
                load: load.into_load_args(&config),
                attribute: parse_attribute(&attribute)?,
                node: node.as_deref().map(parse_node_path).unwrap_or_default(),
                export_layer,
                output_dir: output_dir.unwrap_or_else(|| config.output_dir.clone()),
                suffix,
                json,
                heatmap_mask: heatmap.then(|| mask.unwrap_or_else(|| config.mask_path.clone())),
                range: parse_range(&range)?,
            };

            let outputs = execute_analyse(args)?;
            println!("✓ Attribute table: {}", outputs.table.display());
            if let Some(report) = outputs.report {
                println!("✓ JSON report: {}", report.display());
            }
            if let Some(heatmap) = outputs.heatmap {
                println!("✓ Foot heatmap: {}", heatmap.display());
            }
        }

        Commands::Compare {
            load,
            attribute,
            nodes,
            mode,
            mask,
            range,
            output_dir,
            suffix,
        } => {
            let args = CompareArgs {
                load: load.into_load_args(&config),
                attribute: parse_attribute(&attribute)?,
                nodes: nodes.iter().map(|n| parse_node_path(n)).collect(),
                mode: mode.into(),
                mask: mask.unwrap_or_else(|| config.mask_path.clone()),
                range: parse_range(&range)?,
                output_dir: output_dir.unwrap_or_else(|| config.output_dir.clone()),
                suffix,
            };

            let path = execute_compare(args)?;
            println!("✓ Foot heatmap: {}", path.display());
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

fn parse_attribute(name: &str) -> Result<Attribute> {
    name.parse()
        .with_context(|| format!("Invalid --attribute '{}'", name))
}

fn parse_range(range: &str) -> Result<ColorRange> {
    range
        .parse()
        .with_context(|| format!("Invalid --range '{}'", range))
}
