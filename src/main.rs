use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use jsonapi_mapper::config::Config;
use jsonapi_mapper::resource::load_data_str;
use jsonapi_mapper::{Mapper, MappingOptions, Pagination, VERSION};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Map ORM resource graphs to JSON-API documents
#[derive(Parser, Debug)]
#[command(name = "jsonapi-mapper", version = VERSION, about, long_about = None)]
struct Args {
    /// Input file with the resource graph as JSON (stdin when omitted)
    input: Option<PathBuf>,

    /// Logical type of the primary data (e.g. "user")
    #[arg(short = 't', long = "type")]
    type_name: String,

    /// Base URL for generated links
    #[arg(short, long)]
    base_url: Option<String>,

    /// Page size
    #[arg(long)]
    limit: Option<u64>,

    /// Offset of the current page
    #[arg(long)]
    offset: Option<u64>,

    /// Total number of items across all pages
    #[arg(long)]
    total: Option<u64>,

    /// Do not generate links
    #[arg(long)]
    no_links: bool,

    /// Pretty-print the document
    #[arg(long)]
    pretty: bool,

    /// Config file (JSON or YAML) instead of the user config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Persist the effective base URL to the user config
    #[arg(long)]
    save: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("jsonapi-mapper started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("jsonapi-mapper").join("jsonapi-mapper.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".jsonapi-mapper").join("jsonapi-mapper.log");
    }
    PathBuf::from("jsonapi-mapper.log")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let base_url = config.effective_base_url(args.base_url.as_deref())?;

    if args.save {
        config.set_base_url(&base_url)?;
        tracing::info!("Saved base URL {}", base_url);
    }

    let content = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read input from stdin")?;
            buf
        }
    };
    let data = load_data_str(&content)?;

    let options = mapping_options(&args, &config);
    tracing::debug!("Mapping {} with {:?}", args.type_name, options);

    let document = Mapper::new(&base_url).map(data.as_ref(), &args.type_name, &options)?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{}", output);

    Ok(())
}

/// CLI flags layered over the config's mapping section
fn mapping_options(args: &Args, config: &Config) -> MappingOptions {
    let mut options = MappingOptions::from(&config.mapping);

    if args.no_links {
        options.enable_links = false;
    }

    if args.limit.is_some() || args.offset.is_some() || args.total.is_some() {
        let base = options.pagination.unwrap_or_default();
        options.pagination = Some(Pagination {
            limit: args.limit.or(base.limit),
            offset: args.offset.or(base.offset),
            total: args.total.or(base.total),
            row_count: if args.total.is_some() {
                None
            } else {
                base.row_count
            },
        });
    }

    options
}
