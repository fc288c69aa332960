use clap::{Args, Parser, Subcommand, ValueEnum};
use folio::dom::{self, Element};
use folio::{
    DetectorRegistry, FolioConfig, Host, MarkupRenderer, MemoryStorage, Motion, Page, StorageKeys,
    Theme,
};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Core(#[from] folio::Error),
    #[error(transparent)]
    Page(#[from] folio::PageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid --url `{url}`: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid --set `{0}`: expected KEY=VALUE")]
    Override(String),
    #[error("No diagram payload detected")]
    NoDiagram,
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::NoDiagram => 3,
            CliError::Url { .. } | CliError::Override(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Render whitepaper markdown into an interactive HTML page")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Boot the document and write the standalone HTML page.
    Render {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        session: SessionArgs,
        /// Output file; stdout when omitted or `-`.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// List which fenced blocks are recognized as diagram payloads.
    Detect {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        json: bool,
    },
    /// Print the section outline of the booted document.
    Outline {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        session: SessionArgs,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Markdown file; stdin when omitted or `-`.
    input: Option<PathBuf>,
    /// JSON file merged over the default configuration.
    #[arg(long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,
    /// Dotted config key override, e.g. `deepLink.delayMs=120`; repeatable.
    /// Values parse as JSON and fall back to a plain string.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MotionArg {
    On,
    Off,
}

/// Stands in for what a browser would have persisted from an earlier visit.
#[derive(Debug, Args)]
struct SessionArgs {
    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,
    #[arg(long, value_enum)]
    motion: Option<MotionArg>,
    /// Section id to start collapsed; repeatable.
    #[arg(long = "collapse", value_name = "SECTION")]
    collapsed: Vec<String>,
    #[arg(long)]
    reduced_motion: bool,
    /// Document address, used for heading links and the deep-link fragment.
    #[arg(long)]
    url: Option<String>,
}

#[derive(Serialize)]
struct DetectedBlock<'a> {
    index: usize,
    language: Option<&'a str>,
    diagram: Option<&'a str>,
}

fn read_input(input: Option<&PathBuf>) -> Result<String, CliError> {
    match input {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn load_config(input: &InputArgs) -> Result<FolioConfig, CliError> {
    let mut config = match &input.config {
        Some(path) => FolioConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => FolioConfig::default(),
    };
    for raw in &input.overrides {
        let Some((key, value)) = raw.split_once('=') else {
            return Err(CliError::Override(raw.clone()));
        };
        let key = key.trim();
        if key.is_empty() || key.split('.').any(str::is_empty) {
            return Err(CliError::Override(raw.clone()));
        }
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        tracing::debug!(key, %value, "config override");
        config.set_value(key, value);
    }
    Ok(config)
}

fn write_text(text: &str, out: Option<&PathBuf>) -> Result<(), CliError> {
    match out {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::write(path, text)?),
        _ => {
            print!("{text}");
            Ok(())
        }
    }
}

fn write_json(value: &impl Serialize) -> Result<(), CliError> {
    serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    println!();
    Ok(())
}

fn host_for(session: &SessionArgs, config: &FolioConfig) -> Result<Host, CliError> {
    let keys = StorageKeys::from_config(config);
    let mut storage = MemoryStorage::new();
    if let Some(theme) = session.theme {
        let theme = match theme {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        };
        storage = storage.with(&keys.theme, theme.as_str());
    }
    if let Some(motion) = session.motion {
        let motion = match motion {
            MotionArg::On => Motion::On,
            MotionArg::Off => Motion::Off,
        };
        storage = storage.with(&keys.motion, motion.as_str());
    }
    if !session.collapsed.is_empty() {
        storage = storage.with(&keys.collapsed, &serde_json::to_string(&session.collapsed)?);
    }

    let mut host = Host::headless()
        .with_storage(storage)
        .with_reduced_motion(session.reduced_motion);
    if let Some(raw) = &session.url {
        let url = Url::parse(raw).map_err(|source| CliError::Url {
            url: raw.clone(),
            source,
        })?;
        host = host.with_location(url);
    }
    Ok(host)
}

fn boot(input: &InputArgs, session: &SessionArgs) -> Result<Page, CliError> {
    let markdown = read_input(input.input.as_ref())?;
    let config = load_config(input)?;
    let host = host_for(session, &config)?;
    let page = Page::boot(&markdown, host, config)?;
    tracing::info!(
        sections = page.outline().len(),
        diagrams = page.diagrams().len(),
        widgets = page.widgets().len(),
        "document booted"
    );
    Ok(page)
}

fn code_language(code: &Element) -> Option<&str> {
    code.attr("class")?
        .split_whitespace()
        .find_map(|c| c.strip_prefix("language-"))
}

fn detect(input: &InputArgs, json: bool) -> Result<(), CliError> {
    let markdown = read_input(input.input.as_ref())?;
    let nodes = MarkupRenderer::new().render(&markdown);
    let registry = DetectorRegistry::builtin();

    let mut texts = Vec::new();
    for pre in dom::find_all_in(&nodes, &|e| e.tag == "pre") {
        let Some(code) = pre.find(&|e| e.tag == "code") else {
            continue;
        };
        texts.push((code_language(code), code.text_content()));
    }
    let blocks: Vec<DetectedBlock<'_>> = texts
        .iter()
        .enumerate()
        .map(|(index, (language, text))| DetectedBlock {
            index,
            language: *language,
            diagram: registry.detect(text).map(|spec| spec.id.as_str()),
        })
        .collect();

    if json {
        write_json(&blocks)?;
    } else {
        for block in &blocks {
            println!("{}\t{}", block.index, block.diagram.unwrap_or("-"));
        }
    }
    if blocks.iter().all(|b| b.diagram.is_none()) {
        return Err(CliError::NoDiagram);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Render {
            input,
            session,
            out,
        } => {
            let page = boot(&input, &session)?;
            write_text(&folio::shell::render_document(&page), out.as_ref())
        }
        Command::Detect { input, json } => detect(&input, json),
        Command::Outline {
            input,
            session,
            json,
        } => {
            let page = boot(&input, &session)?;
            if json {
                return write_json(page.outline());
            }
            for section in page.outline().sections() {
                let mark = if section.collapsed { "+" } else { "-" };
                println!("{mark} {}\t{}", section.id, section.title);
            }
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOLIO_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}
