use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::{feedback_spans, Styles, HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::app::App;

/// A UI screen boundary: one per session mode
pub trait Screen {
    fn draw(&self, app: &App, styles: &Styles, area: Rect, buf: &mut Buffer);
}

/// Text composition before a session starts
pub struct CollectingScreen;

impl Screen for CollectingScreen {
    fn draw(&self, app: &App, styles: &Styles, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Min(3),    // input
                Constraint::Length(1), // status
                Constraint::Length(2), // help
            ])
            .split(area);

        Paragraph::new(Span::styled("TypeAnki", styles.accent))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let input = if app.input().is_empty() {
            Paragraph::new(Span::styled(
                "Paste your phrases here, one per line...",
                styles.hint,
            ))
        } else {
            Paragraph::new(app.input().to_string())
        };
        input
            .block(Block::default().borders(Borders::ALL).title("Phrases"))
            .wrap(Wrap { trim: false })
            .render(chunks[1], buf);

        if let Some(status) = app.status() {
            Paragraph::new(Span::styled(status.to_string(), styles.incorrect))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);
        }

        let saved = app.session().phrases().len();
        let restart_hint = if saved > 0 {
            format!("   (ctrl+r) restart {saved} saved phrases")
        } else {
            String::new()
        };
        Paragraph::new(format!(
            "(tab) begin   (ctrl+g) random words   (ctrl+u) clear{restart_hint}   (esc) quit"
        ))
        .style(styles.hint)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);
    }
}

/// Phrase-by-phrase typing
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn draw(&self, app: &App, styles: &Styles, area: Rect, buf: &mut Buffer) {
        let session = app.session();
        let phrase = session.current_phrase().unwrap_or_default();

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let phrase_lines = if phrase.width() <= max_chars_per_line as usize {
            1
        } else {
            let wrapped = (phrase.width() as f64 / max_chars_per_line as f64).ceil();
            (wrapped.min(u16::MAX as f64) as u16).saturating_add(1)
        };
        let padding = area.height.saturating_sub(phrase_lines.saturating_add(4)) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(2), // progress
                Constraint::Length(phrase_lines),
                Constraint::Length(2),
                Constraint::Min(0), // help
            ])
            .split(area);

        Paragraph::new(Span::styled(
            format!(
                "Phrase {} / {}",
                session.current_index() + 1,
                session.phrases().len()
            ),
            styles.accent,
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(Line::from(feedback_spans(phrase, session.typed(), styles)))
            .alignment(if phrase_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: false })
            .render(chunks[2], buf);

        Paragraph::new("(just start typing)   (esc) reset")
            .style(styles.hint)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
}

/// Final wpm/accuracy report
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn draw(&self, app: &App, styles: &Styles, area: Rect, buf: &mut Buffer) {
        let padding = area.height.saturating_sub(7) / 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(2), // title
                Constraint::Length(1), // stats
                Constraint::Length(1), // details
                Constraint::Length(2), // best
                Constraint::Min(0),    // help
            ])
            .split(area);

        Paragraph::new(Span::styled("Results", styles.accent))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let Some(metrics) = app.metrics() else {
            Paragraph::new("no results")
                .alignment(Alignment::Center)
                .render(chunks[2], buf);
            return;
        };

        Paragraph::new(Span::styled(
            format!("{} wpm   {}% acc", metrics.wpm, metrics.accuracy),
            styles.bold,
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        Paragraph::new(format!(
            "{} errors   {} words   {:.1}s",
            metrics.errors,
            metrics.word_count,
            metrics.duration.as_secs_f64()
        ))
        .style(styles.hint)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        if let Some(best) = app.previous_best_wpm() {
            let line = if metrics.wpm > best {
                Span::styled(format!("new best! (previous {best} wpm)"), styles.correct)
            } else {
                Span::styled(format!("best {best} wpm"), styles.hint)
            };
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .render(chunks[4], buf);
        }

        Paragraph::new("(r) retry   (n) new text   (esc) quit")
            .style(styles.hint)
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }
}
