use proptest::prelude::*;
use virtuoso_domain_eval::{Judge, JudgeEvent};
use virtuoso_domain_song::{twinkle_twinkle, HitState};

const NAMES: [&str; 6] = ["C4", "D4", "E4", "F4", "G4", "A4"];

#[derive(Clone, Debug)]
enum Step {
    Press(usize, f64),
    Sweep(f64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..NAMES.len(), 0.0..200.0f64).prop_map(|(n, dt)| Step::Press(n, dt)),
        (0.0..400.0f64).prop_map(Step::Sweep),
    ]
}

proptest! {
    #[test]
    fn judging_keeps_session_invariants(steps in prop::collection::vec(step(), 1..120)) {
        let mut song = twinkle_twinkle();
        let mut judge = Judge::new();
        let mut now = 0.0;
        let mut last_score = 0;
        let mut highest_combo = 0;
        let mut resolved: Vec<HitState> = song.notes().iter().map(|n| n.hit_state()).collect();

        for step in steps {
            let prev_combo = judge.stats().combo;
            let events = match step {
                Step::Press(n, dt) => {
                    now += dt;
                    judge.on_press(&mut song, NAMES[n], now)
                }
                Step::Sweep(dt) => {
                    now += dt;
                    judge.advance_to(&mut song, now)
                }
            };
            let stats = judge.stats();

            prop_assert!(stats.score >= last_score);
            last_score = stats.score;

            let missed = events.iter().any(|e| matches!(e, JudgeEvent::Miss { .. }));
            let hit = events.iter().any(|e| matches!(e, JudgeEvent::Hit { .. }));
            if missed {
                prop_assert_eq!(stats.combo, 0);
            } else if hit {
                prop_assert_eq!(stats.combo, prev_combo + 1);
            } else {
                prop_assert_eq!(stats.combo, prev_combo);
            }

            highest_combo = highest_combo.max(stats.combo);
            prop_assert_eq!(stats.max_combo, highest_combo);

            for (prev, note) in resolved.iter_mut().zip(song.notes()) {
                if *prev != HitState::Pending {
                    prop_assert_eq!(*prev, note.hit_state());
                }
                *prev = note.hit_state();
            }
        }
    }
}
