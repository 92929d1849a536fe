use clap::{Parser, Subcommand};
use page_split::config::{self, ConfigOverrides, CropOverrides, OutputOverrides};
use page_split::{output, process};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Flags shared by commands that read scans. Each one overrides the config file.
#[derive(clap::Args, Clone)]
struct JobArgs {
    /// Folder of dual-page scans
    #[arg(long)]
    input: Option<PathBuf>,

    /// Folder for the split pages (created if missing)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Column where the right page starts
    #[arg(long)]
    split_x: Option<u32>,

    /// Trim margins before splitting
    #[arg(long)]
    crop: bool,

    /// Pixels trimmed from the top edge
    #[arg(long)]
    crop_top: Option<u32>,

    /// Pixels trimmed from the bottom edge
    #[arg(long)]
    crop_bottom: Option<u32>,

    /// Pixels trimmed from the left edge
    #[arg(long)]
    crop_left: Option<u32>,

    /// Pixels trimmed from the right edge
    #[arg(long)]
    crop_right: Option<u32>,

    /// JPEG quality for written pages (1-100)
    #[arg(long)]
    quality: Option<u32>,
}

impl JobArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_folder: self.input.clone(),
            output_folder: self.output.clone(),
            split_x: self.split_x,
            crop: CropOverrides {
                enabled: self.crop.then_some(true),
                top: self.crop_top,
                bottom: self.crop_bottom,
                left: self.crop_left,
                right: self.crop_right,
            },
            output: OutputOverrides {
                quality: self.quality,
            },
        }
    }
}

#[derive(Parser)]
#[command(name = "page-split")]
#[command(about = "Split dual-page scans into single pages")]
#[command(long_about = "\
Split dual-page scans into single pages

Every .jpg, .jpeg, .png, .bmp and .tiff file directly inside the input folder
is optionally cropped, then cut at a fixed column:

  scans/spread.jpg  →  pages/spread_left.jpg   (columns 0..split_x)
                       pages/spread_right.jpg  (columns split_x..width)

A scan no wider than split_x produces only the _left page. Margins that
would leave nothing are ignored with a warning. A scan that fails to load
or write is reported and the rest of the folder is still processed.

Settings come from page-split.toml in the working directory (or --config)
and are overridden by command-line flags.

Run 'page-split gen-config' to generate a documented page-split.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./page-split.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every step, not just the per-scan results
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crop and split every scan in the input folder
    Split {
        #[command(flatten)]
        job: JobArgs,

        /// Also write a JSON report of the run to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Show the pages a split would write, without writing anything
    Check {
        #[command(flatten)]
        job: JobArgs,
    },
    /// Print a stock page-split.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Split { job, report } => {
            let split_config = load(&cli, job)?;
            let (input, output_dir) = split_config.folders()?;
            let result = process::process(
                input,
                output_dir,
                &process::ProcessConfig::from_split_config(&split_config),
            )?;
            output::print_split_output(&result);
            if let Some(report_path) = report {
                let json = serde_json::to_string_pretty(&result)?;
                std::fs::write(report_path, json)?;
            }
        }
        Command::Check { job } => {
            let split_config = load(&cli, job)?;
            let (input, output_dir) = split_config.folders()?;
            let plans = process::plan(
                input,
                &process::ProcessConfig::from_split_config(&split_config),
            )?;
            output::print_check_output(&plans, output_dir);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve the config file and merge the command-line flags over it.
fn load(cli: &Cli, job: &JobArgs) -> Result<config::SplitConfig, config::ConfigError> {
    let cwd = std::env::current_dir()?;
    let file = config::find_config_file(cli.config.as_deref(), &cwd)?;
    config::load_config(file.as_deref(), &job.overrides())
}

/// Log to stderr so stdout stays clean for the run summary.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "page_split=debug"
    } else {
        "page_split=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
