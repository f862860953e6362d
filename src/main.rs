//! Binary entry point: resolve settings, start the file logger, load the
//! catalog and preferences, then drive the Ratatui event loop until the user
//! exits.
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use admission_board::config::{self, Overrides, StartScreen};
use admission_board::engine::SystemClock;
use admission_board::{run_app, App, Catalog, KeyValueStore, MemoryStore, SqliteStore};
use anyhow::Context;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(
    name = "admission-board",
    about = "University admission schedule and seat tables in the terminal"
)]
struct Args {
    /// Config file to read instead of ~/.admission-board/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Catalog JSON to use instead of the bundled one
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Institution whose seat table is shown
    #[arg(short, long)]
    institution: Option<String>,
    /// Admission unit inside the institution's subject list
    #[arg(short, long)]
    unit: Option<String>,
    /// Preferences database path
    #[arg(long)]
    store: Option<PathBuf>,
    /// Keep bookmarks and favorites in memory only
    #[arg(long)]
    ephemeral: bool,
    /// Screen to open first
    #[arg(long, value_enum)]
    screen: Option<StartScreen>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = config::data_dir()?;
    let config_path = match args.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let file_config = config::load_file_config(&config_path)?;
    let settings = config::resolve(
        file_config,
        Overrides {
            catalog_path: args.catalog,
            store_path: args.store,
            institution: args.institution,
            unit: args.unit,
            start_screen: args.screen,
            ephemeral: args.ephemeral,
        },
        &data_dir,
    );

    init_logging(&settings.log_path);
    match &settings.config_file {
        Some(path) => log::info!("loaded config from {}", path.display()),
        None => log::info!(
            "no config file at {}, using defaults",
            config_path.display()
        ),
    }
    log::info!("admission-board starting with {settings:?}");

    let catalog =
        Catalog::load(settings.catalog_path.as_deref()).context("failed to load catalog")?;
    let store: Box<dyn KeyValueStore> = match &settings.store_path {
        Some(path) => Box::new(
            SqliteStore::open(path)
                .with_context(|| format!("failed to open preferences at {}", path.display()))?,
        ),
        None => Box::new(MemoryStore::new()),
    };

    let mut app = App::new(
        &catalog,
        &settings.institution,
        &settings.unit,
        store,
        Box::new(SystemClock),
    )
    .with_start_screen(settings.start_screen);
    run_app(&mut app)
}

/// The terminal belongs to the TUI, so log lines go to a file. A log file we
/// cannot create is not worth refusing to start over.
fn init_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(path) {
        let _ = WriteLogger::init(LevelFilter::Info, log_config, log_file);
    }
}
