use virtuoso_domain_song::Song;
use virtuoso_ports::types::TimeMs;

/// Presses every scheduled note at its start time plus a fixed offset.
pub struct Autoplay {
    presses: Vec<(String, TimeMs)>,
    next: usize,
}

impl Autoplay {
    pub fn new(song: &Song, offset_ms: TimeMs, skip_every: usize) -> Self {
        let presses = song
            .notes()
            .iter()
            .enumerate()
            .filter(|(idx, _)| skip_every == 0 || (idx + 1) % skip_every != 0)
            .map(|(_, note)| (note.note_name.clone(), note.start_time + offset_ms))
            .collect();
        Self { presses, next: 0 }
    }

    /// Hands every press scheduled at or before `until` to `press`, in order.
    pub fn press_due(&mut self, until: TimeMs, mut press: impl FnMut(&str)) -> usize {
        let mut sent = 0;
        while let Some((note, at)) = self.presses.get(self.next) {
            if *at > until {
                break;
            }
            press(note);
            self.next += 1;
            sent += 1;
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtuoso_domain_song::twinkle_twinkle;

    #[test]
    fn skips_every_nth_note() {
        let mut autoplay = Autoplay::new(&twinkle_twinkle(), 0.0, 3);
        let mut pressed = Vec::new();

        autoplay.press_due(f64::INFINITY, |note| pressed.push(note.to_string()));

        // 14 notes, every third one left out
        assert_eq!(pressed.len(), 10);
        assert_eq!(pressed[..3], ["C4", "C4", "G4"]);
    }

    #[test]
    fn offset_delays_presses() {
        let mut autoplay = Autoplay::new(&twinkle_twinkle(), 50.0, 0);

        assert_eq!(autoplay.press_due(40.0, |_| {}), 0);
        assert_eq!(autoplay.press_due(650.0, |_| {}), 2);
    }
}
