pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
    Frame,
};

use crate::app::App;
use crate::session::Mode;
use screen::Screen;

pub(crate) const HORIZONTAL_MARGIN: u16 = 5;
pub(crate) const VERTICAL_MARGIN: u16 = 2;

/// How a single phrase position should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharFeedback {
    Pending,
    Correct,
    Incorrect,
}

/// Per-position comparison of what was typed against the phrase.
/// Position `i` is compared by plain equality with `typed[i]`.
pub fn phrase_feedback(phrase: &str, typed: &str) -> Vec<CharFeedback> {
    let mut typed = typed.chars();
    phrase
        .chars()
        .map(|expected| match typed.next() {
            None => CharFeedback::Pending,
            Some(c) if c == expected => CharFeedback::Correct,
            Some(_) => CharFeedback::Incorrect,
        })
        .collect()
}

pub struct Styles {
    pub bold: Style,
    pub correct: Style,
    pub incorrect: Style,
    pub pending: Style,
    pub cursor: Style,
    pub hint: Style,
    pub accent: Style,
}

impl Default for Styles {
    fn default() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let pending = bold.add_modifier(Modifier::DIM);
        Self {
            bold,
            correct: bold.fg(Color::Green),
            incorrect: bold.fg(Color::Red),
            pending,
            cursor: pending.add_modifier(Modifier::UNDERLINED),
            hint: Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
            accent: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        }
    }
}

/// Spans for the phrase being typed: green/red for typed positions, dim for
/// the rest, with the cursor underlined.
pub(crate) fn feedback_spans<'a>(phrase: &str, typed: &str, styles: &Styles) -> Vec<Span<'a>> {
    let cursor = typed.chars().count();
    let mut typed_chars = typed.chars();

    phrase
        .chars()
        .zip(phrase_feedback(phrase, typed))
        .enumerate()
        .map(|(idx, (expected, feedback))| match feedback {
            CharFeedback::Correct => {
                typed_chars.next();
                Span::styled(expected.to_string(), styles.correct)
            }
            CharFeedback::Incorrect => {
                let shown = match typed_chars.next() {
                    Some(' ') | None => '·',
                    Some(c) => c,
                };
                Span::styled(shown.to_string(), styles.incorrect)
            }
            CharFeedback::Pending if idx == cursor => {
                Span::styled(expected.to_string(), styles.cursor)
            }
            CharFeedback::Pending => Span::styled(expected.to_string(), styles.pending),
        })
        .collect()
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let styles = Styles::default();
        match self.session().mode() {
            Mode::Collecting => screen::CollectingScreen.draw(self, &styles, area, buf),
            Mode::Typing => screen::TypingScreen.draw(self, &styles, area, buf),
            Mode::Finished => screen::ResultsScreen.draw(self, &styles, area, buf),
        }
    }
}

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
