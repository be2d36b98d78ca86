use std::time::{Duration, SystemTime};

use assert_matches::assert_matches;
use typeanki::metrics::{compute_metrics, MetricsError};
use typeanki::normalize::{collapse_internal_spaces, derive_phrases, normalize};
use typeanki::session::{Keystroke, KeystrokeOutcome, Mode, Session, SessionError};

fn keys(names: &[&str]) -> Vec<Keystroke> {
    names
        .iter()
        .filter_map(|name| Keystroke::from_key_name(name))
        .collect()
}

#[test]
fn cat_dog_end_to_end() {
    let mut session = Session::new();
    session.begin(vec!["cat".into(), "dog".into()]).unwrap();

    let mut last = KeystrokeOutcome::Ignored;
    for k in keys(&["c", "a", "t"]) {
        last = session.apply_keystroke(k);
    }
    let ticket = match last {
        KeystrokeOutcome::PhraseCompleted(ticket) => ticket,
        other => panic!("expected completion, got {other:?}"),
    };
    assert!(session.phrase_just_completed());
    assert_eq!(session.current_index(), 0);

    session.advance(ticket).unwrap();
    assert_eq!(session.current_index(), 1);
    assert_eq!(session.typed(), "");

    for k in keys(&["d", "o", "g"]) {
        last = session.apply_keystroke(k);
    }
    assert_eq!(last, KeystrokeOutcome::Finished);
    assert_eq!(session.mode(), Mode::Finished);
    assert!(session.ended_at().is_some());
    assert_eq!(session.error_count(), 0);
}

#[test]
fn metrics_for_one_minute_session() {
    let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let t_end = t0 + Duration::from_millis(60_000);

    let mut session = Session::new();
    session.begin(vec!["cat".into(), "dog".into()]).unwrap();
    session.apply_keystroke_at(Keystroke::Char('c'), t0);
    session.apply_keystroke_at(Keystroke::Char('a'), t0);
    session.apply_keystroke_at(Keystroke::Char('t'), t0);
    session.advance_to_next_phrase().unwrap();
    session.apply_keystroke_at(Keystroke::Char('d'), t0);
    session.apply_keystroke_at(Keystroke::Char('o'), t0);
    session.apply_keystroke_at(Keystroke::Char('g'), t_end);

    let metrics = compute_metrics(&session).unwrap();
    assert_eq!(metrics.total_chars, 6);
    assert_eq!(metrics.word_count, 2);
    assert_eq!(metrics.wpm, 2.0);
    assert_eq!(metrics.accuracy, 100.0);
}

#[test]
fn metrics_rejected_before_finish() {
    let mut session = Session::new();
    session.begin(vec!["cat".into()]).unwrap();
    assert_matches!(compute_metrics(&session), Err(MetricsError::NotFinished));
}

#[test]
fn non_key_names_are_ignored() {
    assert!(keys(&["Shift", "ArrowLeft", "Enter"]).is_empty());
    assert_eq!(keys(&["Backspace", "x"]).len(), 2);
}

#[test]
fn empty_paste_cannot_start_a_session() {
    let mut session = Session::new();
    let phrases = derive_phrases("   \n\u{200D}\n");
    assert_eq!(session.begin(phrases), Err(SessionError::InvalidSession));
    assert_eq!(session.mode(), Mode::Collecting);
}

#[test]
fn pasted_text_becomes_phrases() {
    let pasted = "It\u{2019}s   a \u{201C}test\u{201D}\u{2026}\r\n\r\nsecond\u{00A0}line \u{2014} done";
    assert_eq!(
        derive_phrases(pasted),
        vec!["It's a \"test\"...", "second line - done"]
    );
    assert_eq!(collapse_internal_spaces("helo    world"), "helo world");
    let once = normalize(pasted);
    assert_eq!(normalize(&once), once);
}
