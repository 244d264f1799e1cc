use clap::{Parser, Subcommand};
use contact_sheet::config::{self, SheetConfig};
use contact_sheet::imaging::{LineHeightMeasure, RustBackend};
use contact_sheet::layout::{self, CellGeometry, PaginationResult, SkippedImage};
use contact_sheet::{output, scan};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "contact-sheet")]
#[command(about = "Lay out photographs as contact sheets")]
#[command(long_about = "\
Lay out photographs as contact sheets

Every image in the source directory gets a cell on a grid, in file name
order. Portrait shots can be turned to fill landscape cells, and each image
can carry a caption built from its camera metadata:

  img1.jpg - f/2.8, 50mm, 400ISO, 1/125s

When a sheet's grid is full the next image starts a new sheet. The layout is
written as JSON for a renderer to composite.

Configuration is read from --config, or from contact-sheet.toml in the
source directory. Run 'contact-sheet gen-config' to generate a documented
contact-sheet.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding the photographs
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Config file (default: contact-sheet.toml in the source directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the source directory, paginate, and write the layout as JSON
    Layout {
        /// Where to write the layout
        #[arg(long, default_value = "contact-sheet.json")]
        output: PathBuf,
    },
    /// Validate the config and list the images without writing anything
    Check,
    /// Print a stock contact-sheet.toml with all options documented
    GenConfig,
}

/// Everything written to the layout file.
#[derive(Serialize)]
struct LayoutFile<'a> {
    config: &'a SheetConfig,
    #[serde(flatten)]
    layout: &'a PaginationResult,
    /// Files that could not be read at all.
    unreadable: &'a [SkippedImage],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Layout { output: out_path } => {
            let (config, _) = load_config(&cli)?;
            let source = resolve_source(&cli, &config);
            init_thread_pool(&config.processing);

            let scanned = scan::scan(&source, &RustBackend::new())?;
            let measure = LineHeightMeasure::new(config.caption.line_spacing);
            let result = layout::paginate(&config, &scanned.images, &measure)?;

            let file = LayoutFile {
                config: &config,
                layout: &result,
                unreadable: &scanned.skipped,
            };
            let json = serde_json::to_string_pretty(&file)?;
            std::fs::write(out_path, json)?;
            output::print_layout_output(&result, &scanned.skipped, &source, out_path);
        }
        Command::Check => {
            let (config, config_file) = load_config(&cli)?;
            let source = resolve_source(&cli, &config);
            println!("==> Checking {}", source.display());
            let cell = CellGeometry::from_config(&config)?;
            init_thread_pool(&config.processing);

            let scanned = scan::scan(&source, &RustBackend::new())?;
            output::print_check_output(
                &config,
                &cell,
                &scanned.images,
                &scanned.skipped,
                &source,
                config_file.as_deref(),
            );
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config named by `--config`, else `contact-sheet.toml` in the
/// `--source` directory (or the working directory).
///
/// Also returns the file that was read, if one existed.
fn load_config(cli: &Cli) -> Result<(SheetConfig, Option<PathBuf>), config::ConfigError> {
    let file = match &cli.config {
        Some(file) if !file.exists() => {
            return Err(config::ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", file.display()),
            )));
        }
        Some(file) => file.clone(),
        None => config_base(cli).join(config::CONFIG_FILE_NAME),
    };
    let config = config::load_config_file(&file)?;
    let used = file.exists().then_some(file);
    Ok((config, used))
}

/// Directory relative paths in the config are resolved against.
fn config_base(cli: &Cli) -> PathBuf {
    match (&cli.config, &cli.source) {
        (Some(file), _) => file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        (None, Some(source)) => source.clone(),
        (None, None) => PathBuf::from("."),
    }
}

/// `--source` wins over `source_dir` from the config.
fn resolve_source(cli: &Cli, config: &SheetConfig) -> PathBuf {
    match &cli.source {
        Some(source) => source.clone(),
        None => config.resolve_source_dir(&config_base(cli)),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
