use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use nvg_core::config::{AppConfig, LogFormat, LoggingConfig, OutputFormat};
use nvg_data::Element;
use nvg_io::{can_load, load_file, NvgLayer};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config/nvgview.yaml";

/// nvgview - Inspect NATO Vector Graphics (NVG) overlay files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// NVG files to load
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Override output format
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Override log level
    #[arg(long, env = "NVGVIEW_LOG_LEVEL")]
    log_level: Option<String>,

    /// Count points without id, coordinates and symbol code
    #[arg(long)]
    keep_empty_points: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Summary,
    Tree,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Summary => OutputFormat::Summary,
            FormatArg::Tree => OutputFormat::Tree,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The default file is optional; an explicitly named one is not
    let use_defaults = args.config == Path::new(DEFAULT_CONFIG) && !args.config.exists();
    let mut config = if use_defaults {
        AppConfig::default()
    } else {
        AppConfig::from_config_builder(&args.config)
            .with_context(|| format!("Failed to load config file: {:?}", args.config))?
    };

    // Command line flags win over the file
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format.into();
    }
    if args.keep_empty_points {
        config.loader.skip_empty_points = false;
    }
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.logging)?;
    if use_defaults {
        debug!("No config file at {}, using defaults", DEFAULT_CONFIG);
    }

    let mut failed = 0;
    for path in &args.files {
        if !can_load(path) {
            warn!("Skipping {:?}: not a readable file", path);
            failed += 1;
            continue;
        }

        match load_file(path, &config.loader) {
            Ok(layer) => print_layer(&layer, config.output.format)?,
            Err(e) => {
                error!("Failed to load {:?}: {}", path, e);
                failed += 1;
            }
        }
    }

    info!("Loaded {} of {} files", args.files.len() - failed, args.files.len());
    if failed > 0 {
        anyhow::bail!("{} file(s) could not be loaded", failed);
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let level = logging.parse_level()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

fn print_layer(layer: &NvgLayer, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Summary => println!(
            "{}: {} document(s), {} element(s), {} message(s)",
            layer.name,
            layer.document_count(),
            layer.element_count(),
            layer.message_count
        ),
        OutputFormat::Tree => {
            println!("{}", layer.name);
            for document in &layer.documents {
                print_tree(document);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(layer)
                .context("Failed to serialize layer")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn print_tree(document: &Element) {
    let mut stack = vec![(document, 1usize)];
    while let Some((element, depth)) = stack.pop() {
        println!("{}{}", "  ".repeat(depth), describe(element));
        stack.extend(element.children().iter().rev().map(|child| (child, depth + 1)));
    }
}

fn describe(element: &Element) -> String {
    match element {
        Element::Root(root) => format!("nvg version={:?}", root.version),
        Element::Group(group) => match &group.url {
            Some(url) => format!("group href={:?}", url),
            None => "group".to_string(),
        },
        Element::Point(point) => {
            let mut line = format!("point id={:?}", point.id);
            if point.has_position() {
                line.push_str(&format!(" x={} y={}", point.x, point.y));
            }
            if !point.symbol_code.is_empty() {
                line.push_str(&format!(" symbol={}", point.symbol_code));
            }
            if let Some(label) = &point.label {
                line.push_str(&format!(" label={:?}", label));
            }
            line
        }
    }
}
