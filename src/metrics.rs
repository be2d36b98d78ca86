use std::time::Duration;

use itertools::Itertools;
use thiserror::Error;

use crate::session::Session;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("session has not finished")]
    NotFinished,
    #[error("session has no characters to score")]
    EmptyPhrases,
}

/// Results of a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub wpm: f64,
    pub accuracy: f64,
    pub duration: Duration,
    pub total_chars: usize,
    pub word_count: usize,
    pub errors: usize,
}

/// Score a finished session.
///
/// The accuracy denominator is the number of characters in the phrases, not
/// the number of keys pressed: deleted and discarded keystrokes do not count,
/// so heavy correcting can push accuracy below zero.
pub fn compute_metrics(session: &Session) -> Result<Metrics, MetricsError> {
    let (started_at, ended_at) = match (session.is_finished(), session.started_at(), session.ended_at()) {
        (true, Some(started_at), Some(ended_at)) => (started_at, ended_at),
        _ => return Err(MetricsError::NotFinished),
    };

    let phrases = session.phrases();
    let total_chars: usize = phrases.iter().map(|p| p.chars().count()).sum();
    if total_chars == 0 {
        return Err(MetricsError::EmptyPhrases);
    }

    let word_count = phrases.iter().join(" ").split_whitespace().count();
    let duration = ended_at.duration_since(started_at).unwrap_or_default();
    let minutes = duration.as_millis() as f64 / 60_000.0;

    let wpm = if minutes > 0.0 {
        (word_count as f64 / minutes).round()
    } else {
        0.0
    };

    let errors = session.error_count();
    let accuracy =
        (((total_chars as f64 - errors as f64) / total_chars as f64) * 100.0).round();

    Ok(Metrics {
        wpm,
        accuracy,
        duration,
        total_chars,
        word_count,
        errors,
    })
}
