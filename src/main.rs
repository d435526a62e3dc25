use clap::Parser;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokscope::app::{App, AppEvent};
use tokscope::engine::config::Config;
use tokscope::engine::error::TokscopeError;
use tokscope::input::{self, LoadedDocument};
use tokscope::tokenize::{
    self, FailedModel, HfHub, LoadedModel, ModelRegistry, TokenCalculator, KNOWN_MODELS,
};
use tokscope::ui::{write_model_list, write_report, Theme, TuiManager};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TOKSCOPE_LOG";

#[derive(Parser, Debug)]
#[command(name = "tokscope", version)]
#[command(about = "Compare tokenizers and see which tokens pair up")]
struct Args {
    /// Text, PDF or EPUB file to tokenize
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Text to tokenize
    #[arg(short, long)]
    text: Option<String>,

    /// Model keys to use (default: every available model)
    #[arg(short, long, num_args = 1..)]
    models: Vec<String>,

    /// Fetch tokenizers of known models from the Hugging Face hub into the
    /// tokenizer directory (no KEY: every known model)
    #[arg(long, value_name = "KEY", num_args = 0..)]
    download: Option<Vec<String>>,

    /// List known and installed models, then exit
    #[arg(long)]
    list_models: bool,

    /// Print a report to stdout instead of starting the TUI
    #[arg(long)]
    plain: bool,

    /// Never color the plain report
    #[arg(long)]
    no_color: bool,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding one tokenizer directory per model
    #[arg(long)]
    tokenizers_dir: Option<PathBuf>,

    /// Write logs to this file (the TUI logs nowhere else)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let downloading = args.download.is_some();
    init_tracing(
        args.plain || args.list_models || downloading,
        args.log_file.as_ref(),
    )?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = &args.tokenizers_dir {
        config.tokenizers.dir = dir.clone();
    }

    if let Some(keys) = &args.download {
        download_models(&config.tokenizers.dir, keys)?;
        if args.file.is_none() && args.text.is_none() && !args.plain && !args.list_models {
            return Ok(());
        }
    }

    let registry = ModelRegistry::scan(&config.tokenizers.dir)?;

    if args.list_models {
        write_model_list(&mut io::stdout().lock(), &registry.models())?;
        return Ok(());
    }

    let document = read_input(&args)?;
    let calculator = TokenCalculator::from_config(&config);

    if args.plain {
        let document = document.ok_or(TokscopeError::NoInput)?;
        run_plain(&args, &config, &registry, &calculator, &document)?;
        return Ok(());
    }

    let mut app = App::new(Box::new(registry), calculator);
    if !args.models.is_empty() {
        let ignored = app.selection_mut().select_only(&args.models);
        if !ignored.is_empty() {
            app.handle_event(AppEvent::Warning(format!(
                "Not available: {}",
                ignored.join(", ")
            )));
        }
    }
    if let Some(document) = document {
        app.load_document(document);
    }

    let mut tui = TuiManager::new(Theme::from_config(&config))?;
    tui.run_event_loop(&mut app)?;
    info!("exiting");

    Ok(())
}

/// Plain and list modes log to stderr; the TUI owns the terminal, so it only
/// logs when a log file is given.
fn init_tracing(to_stderr: bool, log_file: Option<&PathBuf>) -> io::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None if to_stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

/// Stops at the first failure so a bad key or a network error is not
/// repeated for every model.
fn download_models(dir: &Path, keys: &[String]) -> Result<(), TokscopeError> {
    let keys: Vec<&str> = if keys.is_empty() {
        KNOWN_MODELS.iter().map(|(key, _)| *key).collect()
    } else {
        keys.iter().map(String::as_str).collect()
    };

    let hub = HfHub::new()?;
    for key in keys {
        let target = tokenize::download(dir, key, &hub)?;
        println!("{key}: {}", target.display());
    }
    Ok(())
}

/// `-f`, then `-t`, then piped stdin.
fn read_input(args: &Args) -> Result<Option<LoadedDocument>, TokscopeError> {
    if let Some(path) = &args.file {
        return Ok(Some(input::load_file(&path.to_string_lossy())?));
    }
    if let Some(text) = &args.text {
        return Ok(Some(LoadedDocument::new(text.clone(), "inline")?));
    }
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(Some(input::text::from_reader(stdin.lock(), "stdin")?));
    }
    Ok(None)
}

fn run_plain(
    args: &Args,
    config: &Config,
    registry: &ModelRegistry,
    calculator: &TokenCalculator,
    document: &LoadedDocument,
) -> Result<(), TokscopeError> {
    let keys = if args.models.is_empty() {
        registry.available_keys()
    } else {
        args.models.clone()
    };
    for key in keys.iter().filter(|k| !registry.is_available(k)) {
        warn!(model = %key, "model not available, skipping");
    }

    let (loaded, load_failures) = registry.load_selected(&keys)?;
    let models: Vec<&LoadedModel> = loaded.iter().collect();
    let mut report = calculator.calculate(&document.text, &models);
    report
        .failures
        .extend(load_failures.into_iter().map(|(model, err)| FailedModel {
            model,
            error: err.to_string(),
        }));
    report.failures.sort_by(|a, b| a.model.cmp(&b.model));

    let stdout = io::stdout();
    let theme = (stdout.is_terminal() && !args.no_color).then(|| Theme::from_config(config));
    write_report(&mut stdout.lock(), &report, theme.as_ref())?;
    Ok(())
}
