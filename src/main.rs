use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use typeanki::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    results::ResultsLog,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    store::{MemoryPhraseStore, PhraseStore, SqlitePhraseStore},
    ui,
    word_generator::{SupportedLanguage, WordGenerator},
};

const TICK_RATE_MS: u64 = 100;

/// retype pasted text phrase by phrase and get wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Paste a block of text, then retype it one line at a time. Each finished line stays on screen for a moment before the next appears; at the end you get words per minute and accuracy."
)]
pub struct Cli {
    /// number of random words used by ctrl+g / --random
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// word list for random words
    #[clap(short = 'l', long, value_enum)]
    language: Option<SupportedLanguage>,

    /// preload the text box from a file
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// start right away with random words
    #[clap(short = 'r', long)]
    random: bool,

    /// milliseconds a finished phrase stays visible
    #[clap(long)]
    delay_ms: Option<u64>,

    /// do not persist phrases or results
    #[clap(long)]
    no_save: bool,
}

impl Cli {
    /// Command line flags win over the config file
    fn apply(&self, mut config: Config) -> Config {
        if let Some(n) = self.number_of_words {
            config.number_of_words = n;
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(delay) = self.delay_ms {
            config.advance_delay_ms = delay;
        }
        if self.no_save {
            config.save_results = false;
        }
        config
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env("TYPEANKI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn build_app(cli: &Cli) -> Result<App, Box<dyn Error>> {
    let config = cli.apply(FileConfigStore::new().load());

    let store: Box<dyn PhraseStore> = if cli.no_save {
        Box::new(MemoryPhraseStore::new())
    } else {
        match SqlitePhraseStore::new() {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn!("phrase store unavailable, not saving phrases: {e}");
                Box::new(MemoryPhraseStore::new())
            }
        }
    };

    let results_log = if config.save_results {
        AppDirs::results_path().map(ResultsLog::new)
    } else {
        None
    };

    let supplier = WordGenerator::for_language(config.language)?;
    let mut app = App::new(&config, store, Box::new(supplier), results_log);

    if let Some(ref path) = cli.file {
        app.set_input(fs::read_to_string(path)?);
    }
    if cli.random {
        app.begin_with_random_words()?;
    }
    Ok(app)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();
    let mut app = build_app(&cli)?;
    info!("starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::draw(app, f))?;

    while !app.should_quit() {
        let event = runner.step_within(app.time_until_advance(Instant::now()));
        let redraw = !matches!(event, AppEvent::Tick) || app.advance_pending();
        app.handle_event(event, Instant::now());

        if redraw {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }

    Ok(())
}
