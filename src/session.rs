use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Mode {
    Collecting,
    Typing,
    Finished,
}

/// A single key press as seen by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Backspace,
}

impl Keystroke {
    /// Map a key name ("Backspace", "a", " ", ...) to a keystroke.
    /// Any other multi-character name is not a keystroke.
    pub fn from_key_name(name: &str) -> Option<Self> {
        if name == "Backspace" {
            return Some(Keystroke::Backspace);
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Keystroke::Char(c)),
            _ => None,
        }
    }
}

/// Identifies the phrase whose completion armed a delayed advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    generation: u64,
    phrase_index: usize,
}

impl AdvanceTicket {
    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }
}

/// What a keystroke did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystrokeOutcome {
    /// Session was not accepting input
    Ignored,
    Typed,
    /// Phrase already full, the character was dropped
    Discarded,
    /// Phrase is complete and the next one should be shown after a delay
    PhraseCompleted(AdvanceTicket),
    Finished,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot start a session without phrases")]
    InvalidSession,
    #[error("advance does not belong to the current phrase")]
    StaleAdvance,
}

/// The authoritative state of one run through a phrase list
#[derive(Debug, Clone)]
pub struct Session {
    phrases: Vec<String>,
    current_index: usize,
    typed: String,
    mode: Mode,
    started_at: Option<SystemTime>,
    ended_at: Option<SystemTime>,
    error_count: usize,
    phrase_just_completed: bool,
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_phrases(Vec::new())
    }

    /// A collecting session that already knows a phrase list, e.g. one loaded from disk
    pub fn with_phrases(phrases: Vec<String>) -> Self {
        Self {
            phrases,
            current_index: 0,
            typed: String::new(),
            mode: Mode::Collecting,
            started_at: None,
            ended_at: None,
            error_count: 0,
            phrase_just_completed: false,
            generation: 0,
        }
    }

    pub fn begin(&mut self, phrases: Vec<String>) -> Result<(), SessionError> {
        if phrases.is_empty() {
            return Err(SessionError::InvalidSession);
        }

        info!(phrases = phrases.len(), "session started");
        self.phrases = phrases;
        self.current_index = 0;
        self.typed.clear();
        self.started_at = None;
        self.ended_at = None;
        self.error_count = 0;
        self.phrase_just_completed = false;
        self.mode = Mode::Typing;
        self.generation += 1;
        Ok(())
    }

    /// Begin again with the phrase list kept from the last session
    pub fn restart(&mut self) -> Result<(), SessionError> {
        let phrases = self.phrases.clone();
        self.begin(phrases)
    }

    pub fn reset(&mut self) {
        debug!(mode = %self.mode, "session reset");
        self.mode = Mode::Collecting;
        self.current_index = 0;
        self.typed.clear();
        self.started_at = None;
        self.ended_at = None;
        self.error_count = 0;
        self.phrase_just_completed = false;
        self.generation += 1;
    }

    pub fn apply_keystroke(&mut self, keystroke: Keystroke) -> KeystrokeOutcome {
        self.apply_keystroke_at(keystroke, SystemTime::now())
    }

    pub fn apply_keystroke_at(&mut self, keystroke: Keystroke, now: SystemTime) -> KeystrokeOutcome {
        if self.mode != Mode::Typing {
            return KeystrokeOutcome::Ignored;
        }

        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        let phrase_len = self.phrases[self.current_index].chars().count();
        let typed_len = self.typed.chars().count();

        let mut outcome = KeystrokeOutcome::Typed;
        match keystroke {
            Keystroke::Backspace => {
                self.typed.pop();
            }
            Keystroke::Char(c) if typed_len < phrase_len => {
                let expected = self.phrases[self.current_index].chars().nth(typed_len);
                if expected != Some(c) {
                    self.error_count += 1;
                }
                self.typed.push(c);
            }
            Keystroke::Char(_) => outcome = KeystrokeOutcome::Discarded,
        }

        if self.typed.chars().count() < phrase_len {
            self.phrase_just_completed = false;
            return outcome;
        }

        if self.current_index + 1 == self.phrases.len() {
            self.finish(now);
            return KeystrokeOutcome::Finished;
        }

        if outcome == KeystrokeOutcome::Discarded {
            // completion was already signalled by the keystroke that filled the phrase
            return outcome;
        }

        debug!(index = self.current_index, "phrase completed");
        self.phrase_just_completed = true;
        KeystrokeOutcome::PhraseCompleted(self.ticket())
    }

    /// Move to the next phrase once a completed one has been shown.
    /// Tickets from an earlier session or phrase are rejected untouched.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> Result<(), SessionError> {
        if self.mode != Mode::Typing || !self.phrase_just_completed || ticket != self.ticket() {
            return Err(SessionError::StaleAdvance);
        }

        self.typed.clear();
        self.current_index = (self.current_index + 1) % self.phrases.len();
        self.phrase_just_completed = false;
        debug!(index = self.current_index, "advanced to next phrase");
        Ok(())
    }

    pub fn advance_to_next_phrase(&mut self) -> Result<(), SessionError> {
        self.advance(self.ticket())
    }

    fn finish(&mut self, now: SystemTime) {
        self.ended_at = Some(now);
        self.mode = Mode::Finished;
        self.phrase_just_completed = false;
        self.generation += 1;
        info!(errors = self.error_count, "session finished");
    }

    fn ticket(&self) -> AdvanceTicket {
        AdvanceTicket {
            generation: self.generation,
            phrase_index: self.current_index,
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// The phrase being typed, `None` unless the session is typing
    pub fn current_phrase(&self) -> Option<&str> {
        match self.mode {
            Mode::Typing => self.phrases.get(self.current_index).map(String::as_str),
            _ => None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<SystemTime> {
        self.ended_at
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn phrase_just_completed(&self) -> bool {
        self.phrase_just_completed
    }

    pub fn is_finished(&self) -> bool {
        self.mode == Mode::Finished
    }

    #[cfg(test)]
    pub(crate) fn set_times(&mut self, started_at: SystemTime, ended_at: SystemTime) {
        self.started_at = Some(started_at);
        self.ended_at = Some(ended_at);
    }
}
