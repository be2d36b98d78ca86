use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::config::Config;
use crate::metrics::{compute_metrics, Metrics};
use crate::normalize::derive_phrases;
use crate::results::{ResultsLog, SessionRecord};
use crate::runtime::AppEvent;
use crate::scheduler::CompletionScheduler;
use crate::session::{Keystroke, KeystrokeOutcome, Mode, Session, SessionError};
use crate::store::PhraseStore;
use crate::word_generator::PhraseSupplier;

/// Owns the session and everything that mutates it.
///
/// All state changes go through `handle_event`/`on_tick`, called from a
/// single event loop.
pub struct App {
    session: Session,
    scheduler: CompletionScheduler,
    store: Box<dyn PhraseStore>,
    supplier: Box<dyn PhraseSupplier>,
    results_log: Option<ResultsLog>,
    number_of_words: usize,
    input: String,
    metrics: Option<Metrics>,
    previous_best_wpm: Option<f64>,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: &Config,
        store: Box<dyn PhraseStore>,
        supplier: Box<dyn PhraseSupplier>,
        results_log: Option<ResultsLog>,
    ) -> Self {
        let saved = store.load().unwrap_or_default();
        Self {
            session: Session::with_phrases(saved),
            scheduler: CompletionScheduler::new(Duration::from_millis(config.advance_delay_ms)),
            store,
            supplier,
            results_log,
            number_of_words: config.number_of_words,
            input: String::new(),
            metrics: None,
            previous_best_wpm: None,
            status: None,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    /// Best wpm recorded before the session that just finished
    pub fn previous_best_wpm(&self) -> Option<f64> {
        self.previous_best_wpm
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn advance_pending(&self) -> bool {
        self.scheduler.is_armed()
    }

    pub fn time_until_advance(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_due(now)
    }

    pub fn begin(&mut self, phrases: Vec<String>) -> Result<(), SessionError> {
        self.session.begin(phrases)?;
        self.on_session_started();
        Ok(())
    }

    /// Start from whatever has been pasted/typed into the input buffer
    pub fn begin_from_input(&mut self) -> Result<(), SessionError> {
        let phrases = derive_phrases(&self.input);
        self.begin(phrases).inspect_err(|_| {
            self.status = Some("Nothing to type yet: paste or write some text first".into());
        })
    }

    pub fn begin_with_random_words(&mut self) -> Result<(), SessionError> {
        let phrases = self.supplier.phrases(self.number_of_words);
        self.begin(phrases)
    }

    /// Run the last phrase list again
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.session.restart().inspect_err(|_| {
            self.status = Some("No saved phrases yet".into());
        })?;
        self.on_session_started();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.session.reset();
        self.metrics = None;
        self.status = None;
    }

    fn on_session_started(&mut self) {
        self.scheduler.cancel();
        self.metrics = None;
        self.status = None;
        if let Err(e) = self.store.save(self.session.phrases()) {
            warn!("failed to save phrases: {e}");
        }
    }

    pub fn type_key(&mut self, keystroke: Keystroke, now: Instant) {
        match self.session.apply_keystroke(keystroke) {
            KeystrokeOutcome::PhraseCompleted(ticket) => self.scheduler.arm(ticket, now),
            KeystrokeOutcome::Finished => {
                self.scheduler.cancel();
                self.on_finished();
            }
            KeystrokeOutcome::Typed | KeystrokeOutcome::Discarded => {
                if !self.session.phrase_just_completed() {
                    self.scheduler.cancel();
                }
            }
            KeystrokeOutcome::Ignored => {}
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if let Some(ticket) = self.scheduler.poll(now) {
            if let Err(e) = self.session.advance(ticket) {
                debug!("dropping advance: {e}");
            }
        }
    }

    fn on_finished(&mut self) {
        let metrics = match compute_metrics(&self.session) {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!("could not score session: {e}");
                return;
            }
        };

        if let Some(ref log) = self.results_log {
            self.previous_best_wpm = log.best_wpm().unwrap_or_else(|e| {
                warn!("failed to read results history: {e}");
                None
            });
            let record = SessionRecord::new(self.session.phrases().len(), &metrics, Local::now());
            if let Err(e) = log.append(&record) {
                warn!("failed to record results: {e}");
            }
        }

        self.metrics = Some(metrics);
    }

    pub fn handle_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::Tick => self.on_tick(now),
            AppEvent::Resize => {}
            AppEvent::Paste(text) => {
                if self.session.mode() == Mode::Collecting {
                    self.input.push_str(&text);
                }
            }
            AppEvent::Key(key) => self.handle_key(key, now),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.session.mode() {
            Mode::Collecting => match key.code {
                KeyCode::Esc => self.should_quit = true,
                KeyCode::Tab => {
                    let _ = self.begin_from_input();
                }
                KeyCode::Char('g') if ctrl => {
                    let _ = self.begin_with_random_words();
                }
                KeyCode::Char('r') if ctrl => {
                    let _ = self.restart();
                }
                KeyCode::Char('u') if ctrl => self.input.clear(),
                KeyCode::Enter => self.input.push('\n'),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) if !ctrl => {
                    self.status = None;
                    self.input.push(c);
                }
                _ => {}
            },
            Mode::Typing => match key.code {
                KeyCode::Esc => self.reset(),
                KeyCode::Backspace => self.type_key(Keystroke::Backspace, now),
                // pasted phrases may keep literal tabs
                KeyCode::Tab => self.type_key(Keystroke::Char('\t'), now),
                KeyCode::Char(c) if !ctrl => self.type_key(Keystroke::Char(c), now),
                _ => {}
            },
            Mode::Finished => match key.code {
                KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('r') => {
                    let _ = self.restart();
                }
                KeyCode::Char('n') => self.reset(),
                _ => {}
            },
        }
    }
}
