use pretty_assertions::assert_eq;
use virtuoso_domain_song::{twinkle_twinkle, HitState, ScheduledNote, Song};
use virtuoso_ports::types::Difficulty;

fn song(notes: &[(&str, &str, f64)]) -> Song {
    let notes = notes
        .iter()
        .map(|(id, name, start)| ScheduledNote::new(*id, *name, *start, 500.0))
        .collect();
    Song::new("test", "", 120.0, Difficulty::Easy, notes)
}

#[test]
fn find_match_prefers_schedule_order_over_proximity() {
    // Both C4 notes are inside a 300ms window at t=1150; the second one is closer.
    let song = song(&[("a", "C4", 900.0), ("b", "C4", 1200.0)]);

    let found = song.find_match("C4", 1150.0, 300.0).map(|n| n.id.as_str());

    assert_eq!(found, Some("a"));
}

#[test]
fn find_match_skips_resolved_and_other_pitches() {
    let mut song = song(&[("a", "C4", 1000.0), ("b", "D4", 1000.0), ("c", "C4", 1100.0)]);
    assert!(song.note_mut(0).unwrap().mark_hit());

    let found = song.find_match("C4", 1000.0, 300.0).map(|n| n.id.as_str());

    assert_eq!(found, Some("c"));
}

#[test]
fn find_match_window_is_inclusive() {
    let song = song(&[("a", "E4", 1000.0)]);

    assert!(song.find_match("E4", 1300.0, 300.0).is_some());
    assert!(song.find_match("E4", 700.0, 300.0).is_some());
    assert!(song.find_match("E4", 1300.5, 300.0).is_none());
}

#[test]
fn hit_state_is_set_at_most_once() {
    let mut note = ScheduledNote::new("a", "C4", 0.0, 100.0);

    assert!(note.mark_hit());
    assert!(!note.mark_missed());
    assert!(!note.mark_hit());
    assert_eq!(note.hit_state(), HitState::Hit);
}

#[test]
fn reset_twice_leaves_everything_pending() {
    let mut song = twinkle_twinkle();
    song.note_mut(0).unwrap().mark_hit();
    song.note_mut(1).unwrap().mark_missed();

    song.reset();
    song.reset();

    assert_eq!(song.count(HitState::Pending), song.notes().len());
}

#[test]
fn fresh_copy_does_not_touch_original() {
    let mut song = twinkle_twinkle();
    song.note_mut(3).unwrap().mark_hit();

    let copy = song.fresh();

    assert_eq!(copy.count(HitState::Hit), 0);
    assert_eq!(song.count(HitState::Hit), 1);
}

#[test]
fn twinkle_ends_at_9400() {
    let song = twinkle_twinkle();

    assert_eq!(song.notes().len(), 14);
    assert_eq!(song.end_time(), Some(9400.0));
}

#[test]
fn end_time_follows_last_scheduled_note() {
    let notes = vec![
        ScheduledNote::new("long", "C4", 0.0, 5000.0),
        ScheduledNote::new("last", "E4", 1000.0, 500.0),
    ];
    let song = Song::new("overlap", "", 100.0, Difficulty::Easy, notes);

    assert_eq!(song.end_time(), Some(1500.0));
}

#[test]
fn empty_song_has_no_end() {
    let song = Song::new("empty", "", 100.0, Difficulty::Easy, Vec::new());

    assert_eq!(song.end_time(), None);
}
