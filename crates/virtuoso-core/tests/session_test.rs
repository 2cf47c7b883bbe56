use pretty_assertions::assert_eq;
use virtuoso_core::{InputEvent, Session, SessionError, SessionState, END_PADDING_MS};
use virtuoso_domain_eval::{JudgeEvent, Judgment, MissReason};
use virtuoso_domain_song::{twinkle_twinkle, HitState, ScheduledNote, Song};
use virtuoso_ports::types::Difficulty;

const ORIGIN: f64 = 50_000.0;
const FRAME_MS: f64 = 16.0;

fn single_c4() -> Song {
    Song::new(
        "single",
        "",
        120.0,
        Difficulty::Easy,
        vec![ScheduledNote::new("1", "C4", 1000.0, 500.0)],
    )
}

/// Drives frames until the song clock reaches `song_time` exactly.
fn tick_to(session: &mut Session, host: &mut f64, song_time: f64) {
    let target = ORIGIN + song_time;
    while *host < target {
        *host = (*host + FRAME_MS).min(target);
        session.tick(*host, Vec::new());
    }
}

fn started(song: Song) -> (Session, f64) {
    let mut session = Session::new(song);
    session.start(ORIGIN).expect("start from menu");
    (session, ORIGIN)
}

#[test]
fn scenario_a_early_press_is_perfect() {
    let (mut session, mut host) = started(single_c4());
    tick_to(&mut session, &mut host, 950.0);

    let outcome = session.press("C4", host);

    assert!(outcome.accepted);
    assert!(outcome.judge_events.iter().any(|e| matches!(
        e,
        JudgeEvent::Hit { judgment: Judgment::Perfect, .. }
    )));
    assert_eq!(session.stats().score, 100);
    assert_eq!(session.stats().combo, 1);
    assert_eq!(session.song().notes()[0].hit_state(), HitState::Hit);
}

#[test]
fn scenario_b_late_press_is_good() {
    let (mut session, mut host) = started(single_c4());
    tick_to(&mut session, &mut host, 1250.0);

    session.press("C4", host);

    let stats = session.stats();
    assert_eq!(stats.good, 1);
    assert_eq!(stats.score, 50);
    assert_eq!(stats.combo, 1);
}

#[test]
fn scenario_c_press_without_match_is_miss() {
    let (mut session, mut host) = started(single_c4());
    tick_to(&mut session, &mut host, 400.0);

    let outcome = session.press("D4", host);

    assert!(outcome.judge_events.iter().any(|e| matches!(
        e,
        JudgeEvent::Miss { reason: MissReason::WrongNote, .. }
    )));
    assert_eq!(session.stats().combo, 0);
    assert_eq!(session.stats().miss, 1);
    assert_eq!(session.song().notes()[0].hit_state(), HitState::Pending);
}

#[test]
fn scenario_d_unplayed_note_is_swept_once() {
    let (mut session, mut host) = started(single_c4());

    tick_to(&mut session, &mut host, 1300.0);
    assert_eq!(session.song().notes()[0].hit_state(), HitState::Pending);

    tick_to(&mut session, &mut host, 1301.0);
    assert_eq!(session.song().notes()[0].hit_state(), HitState::Missed);
    assert_eq!(session.stats().miss, 1);
    assert_eq!(session.stats().combo, 0);

    tick_to(&mut session, &mut host, 2000.0);
    assert_eq!(session.stats().miss, 1);
}

#[test]
fn scenario_e_session_finishes_after_end_padding() {
    let (mut session, mut host) = started(twinkle_twinkle());
    let end = 9400.0 + END_PADDING_MS;

    tick_to(&mut session, &mut host, end);
    assert_eq!(session.state(), SessionState::Playing);
    assert!(session.frame_pending());

    tick_to(&mut session, &mut host, end + 1.0);
    assert_eq!(session.state(), SessionState::Finished);
    assert!(!session.frame_pending());
    // Nobody played, so every note expired.
    assert_eq!(session.stats().miss, 14);
}

#[test]
fn late_tick_after_finish_is_dropped() {
    let (mut session, mut host) = started(single_c4());
    tick_to(&mut session, &mut host, 100.0);
    session.stop().unwrap();
    let before = session.stats();

    let report = session.tick(host + 5_000.0, Vec::new());

    assert!(!report.ticked);
    assert_eq!(session.stats(), before);
    assert_eq!(session.song().notes()[0].hit_state(), HitState::Pending);
    assert_eq!(session.state(), SessionState::Finished);
}

#[test]
fn queued_presses_are_judged_after_the_sweep() {
    let (mut session, mut host) = started(single_c4());
    tick_to(&mut session, &mut host, 984.0);

    host += FRAME_MS;
    let report = session.tick(host, vec![InputEvent::Press("C4".to_string())]);

    assert!(report.ticked);
    assert_eq!(report.time, 1000.0);
    assert_eq!(report.accepted_presses, vec!["C4".to_string()]);
    assert_eq!(session.stats().perfect, 1);
}

#[test]
fn held_note_is_not_judged_twice() {
    let (mut session, mut host) = started(single_c4());
    tick_to(&mut session, &mut host, 1000.0);
    session.press("C4", host);
    assert_eq!(session.held_notes().collect::<Vec<_>>(), vec!["C4"]);

    let repeat = session.press("C4", host);
    assert!(!repeat.accepted);
    assert!(repeat.judge_events.is_empty());
    assert_eq!(session.stats().miss, 0);

    assert!(session.release("C4"));
    let again = session.press("C4", host);
    assert!(again.accepted);
    assert_eq!(session.stats().miss, 1);
}

#[test]
fn press_in_menu_is_accepted_but_not_judged() {
    let mut session = Session::new(single_c4());

    let outcome = session.press("C4", 1000.0);

    assert!(outcome.accepted);
    assert!(outcome.judge_events.is_empty());
    assert_eq!(session.stats().miss, 0);
}

#[test]
fn lifecycle_transitions() {
    let mut session = Session::new(single_c4());
    assert_eq!(session.state(), SessionState::Menu);

    assert_eq!(
        session.replay(0.0),
        Err(SessionError::InvalidTransition {
            state: SessionState::Menu,
            action: "replay",
        })
    );
    // Nothing has been played from Menu, so stop refuses instead of
    // inventing an empty Finished result.
    assert_eq!(
        session.stop(),
        Err(SessionError::InvalidTransition {
            state: SessionState::Menu,
            action: "stop",
        })
    );
    assert_eq!(session.state(), SessionState::Menu);

    session.start(0.0).unwrap();
    assert!(session.start(0.0).is_err());
    assert!(session.back_to_menu().is_err());

    session.stop().unwrap();
    assert_eq!(session.state(), SessionState::Finished);
    assert!(!session.frame_pending());
    session.stop().unwrap();
    assert_eq!(session.state(), SessionState::Finished);

    session.back_to_menu().unwrap();
    assert_eq!(session.state(), SessionState::Menu);
}

#[test]
fn replay_resets_notes_stats_and_history() {
    let (mut session, mut host) = started(single_c4());
    tick_to(&mut session, &mut host, 1000.0);
    session.press("C4", host);
    session.release("C4");
    session.stop().unwrap();
    assert_eq!(session.stats().score, 100);
    assert!(!session.history().is_empty());

    session.replay(host + 100.0).unwrap();

    assert_eq!(session.state(), SessionState::Playing);
    assert_eq!(session.stats().score, 0);
    assert!(session.history().is_empty());
    assert_eq!(session.current_time(), 0.0);
    assert_eq!(session.song().notes()[0].hit_state(), HitState::Pending);
}

#[test]
fn history_is_sampled_every_50ms_bucket() {
    let (mut session, mut host) = started(single_c4());

    tick_to(&mut session, &mut host, 500.0);

    let history = session.history();
    // Frames land at 16, 64, 112, ... 464, 500: one per 50ms bucket.
    assert_eq!(history.len(), 11);
    assert!(history
        .windows(2)
        .all(|w| (w[1].time / 50.0).floor() > (w[0].time / 50.0).floor()));
    assert!(history.iter().all(|s| s.score == 0));
}

#[test]
fn host_stall_is_clamped_instead_of_skipping_notes() {
    let (mut session, mut host) = started(single_c4());
    tick_to(&mut session, &mut host, 900.0);

    host += 30_000.0;
    let report = session.tick(host, Vec::new());

    assert!(report.anomaly.is_some());
    assert_eq!(report.time, 1150.0);
    // Still inside the window: the stall did not sweep the note away.
    assert_eq!(session.song().notes()[0].hit_state(), HitState::Pending);
    assert_eq!(session.state(), SessionState::Playing);
}

#[test]
fn guide_notes_light_up_near_pending_notes() {
    let (mut session, mut host) = started(single_c4());
    tick_to(&mut session, &mut host, 700.0);
    assert!(session.guide_notes().is_empty());

    tick_to(&mut session, &mut host, 850.0);
    assert_eq!(session.guide_notes(), vec!["C4".to_string()]);

    session.press("C4", host);
    assert!(session.guide_notes().is_empty());
}

#[test]
fn replacing_song_returns_to_menu_with_fresh_notes() {
    let (mut session, mut host) = started(single_c4());
    tick_to(&mut session, &mut host, 100.0);

    let mut next = twinkle_twinkle();
    next.note_mut(0).unwrap().mark_hit();
    session.replace_song(next);

    assert_eq!(session.state(), SessionState::Menu);
    assert!(!session.frame_pending());
    assert_eq!(session.song().count(HitState::Pending), 14);
}
