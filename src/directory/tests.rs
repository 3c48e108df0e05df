use super::*;
use crate::testing::{FakeDocument, FakeSound, NS};
use crate::track::{MARKIN_KEY, MARKOUT_KEY};

#[test]
fn idle_sound_has_no_row() {
    let doc = FakeDocument::new("a.ogg");
    let sound = FakeSound::loaded(1, 200.0);
    assert_eq!(prepare_row(&doc, &sound, &TrackState::load(&doc, NS)), None);
}

#[test]
fn playing_row_shows_position_and_marks_as_percentages() {
    let doc = FakeDocument::new("a.ogg")
        .playing()
        .with_flag(MARKIN_KEY, 20.0)
        .with_flag(MARKOUT_KEY, 150.0);
    let sound = FakeSound::loaded(1, 200.0).playing_at(65.0);
    let state = TrackState::load(&doc, NS);

    let row = prepare_row(&doc, &sound, &state).unwrap();
    assert_eq!(
        row,
        SoundRow {
            is_paused: false,
            play_title: "PLAYLIST.SoundPlay",
            current_time: "1:05".into(),
            duration_time: "3:20".into(),
            track_percentage: Some(32),
            markin: Some(10),
            markout: Some(75),
        }
    );
}

#[test]
fn paused_row_uses_paused_offset_and_cached_duration() {
    let mut doc = FakeDocument::new("a.ogg").with_flag("duration", 120.0);
    doc.data.paused_time = Some(30.0);
    let sound = FakeSound::unloaded(1);
    let state = TrackState::load(&doc, NS);

    let row = prepare_row(&doc, &sound, &state).unwrap();
    assert!(row.is_paused);
    assert_eq!(row.play_title, "PLAYLIST.SoundResume");
    assert_eq!(row.current_time, "0:30");
    assert_eq!(row.duration_time, "2:00");
    assert_eq!(row.track_percentage, Some(25));
    assert_eq!(row.markin, None);
}

#[test]
fn unknown_duration_renders_without_percentages() {
    let doc = FakeDocument::new("a.ogg").playing();
    let mut sound = FakeSound::loaded(1, 0.0).playing_at(5.0);
    sound.duration = None;

    let refresh = refresh_timestamps(&doc, &sound, &TrackState::default());
    assert_eq!(
        refresh,
        TimestampRefresh {
            current_time: "0:05".into(),
            duration_time: "0:00".into(),
            tracker: None,
        }
    );
}

#[test]
fn refresh_follows_live_time() {
    let doc = FakeDocument::new("a.ogg").playing();
    let mut sound = FakeSound::loaded(1, 100.0).playing_at(0.0);
    sound.advance_to(42.5);

    let refresh = refresh_timestamps(&doc, &sound, &TrackState::default());
    assert_eq!(refresh.current_time, "0:42");
    assert_eq!(refresh.tracker, Some(42));
}

#[test]
fn remove_action_only_offered_with_marks() {
    assert_eq!(
        context_actions(&TrackState::default()),
        vec![ContextAction::EditMarkIn, ContextAction::EditMarkOut]
    );
    let marked = TrackState {
        markout: Some(30.0),
        ..TrackState::default()
    };
    assert_eq!(context_actions(&marked).last(), Some(&ContextAction::RemoveMarks));
}

#[test]
fn mark_prompt_formats_bounds() {
    let state = TrackState {
        markin: Some(15.0),
        markout: Some(95.0),
        ..TrackState::default()
    };
    assert_eq!(
        mark_prompt(MarkKind::Out, &state, 240.0),
        MarkPrompt {
            label_key: "TRACK-TRACKER.prompts.markout",
            min: "0:15".into(),
            max: "4:00".into(),
            current: "1:35".into(),
        }
    );
    assert_eq!(mark_prompt(MarkKind::In, &state, 240.0).max, "1:35");
}

#[test]
fn refresher_updates_playing_rows_once_per_interval() {
    let mut doc = FakeDocument::new("a.ogg").playing();
    let mut sound = FakeSound::loaded(1, 100.0).playing_at(10.0);
    let state = TrackState::load(&doc, NS);
    let mut refresher = TimestampRefresher::new(&crate::config::Settings::default());
    let t0 = std::time::Instant::now();

    let first = refresher.poll(t0, &doc, &sound, &state).unwrap();
    assert_eq!(first.current_time, "0:10");

    sound.current_time = 10.5;
    let early = t0 + std::time::Duration::from_millis(400);
    assert_eq!(refresher.poll(early, &doc, &sound, &state), None);

    sound.current_time = 11.0;
    let due = t0 + std::time::Duration::from_secs(1);
    let next = refresher.poll(due, &doc, &sound, &state).unwrap();
    assert_eq!(next.current_time, "0:11");
    assert_eq!(next.tracker, Some(11));

    doc.data.playing = false;
    let later = t0 + std::time::Duration::from_secs(5);
    assert_eq!(refresher.poll(later, &doc, &sound, &state), None);
}
