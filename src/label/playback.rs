use std::time::Duration;

/// Looping frame playback for the item on display.
///
/// The controller itself owns no timer; the front-end schedules repeating
/// ticks at `period` and feeds them back in together with the generation
/// it observed when scheduling. Every start or cancel bumps the
/// generation, so a tick from a timer that outlived its item is rejected
/// instead of mutating a superseded display. Cancellation on every
/// cursor-changing transition is an invariant of the session, not a
/// front-end courtesy.
#[derive(Debug, Clone)]
pub struct Playback {
    generation: u64,
    frame: usize,
    frame_count: usize,
    period: Duration,
}

impl Playback {
    pub fn new(period: Duration) -> Self {
        Self {
            generation: 0,
            frame: 0,
            frame_count: 0,
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the frame currently on display.
    pub fn current_frame(&self) -> usize {
        self.frame
    }

    pub fn is_running(&self) -> bool {
        self.frame_count > 0
    }

    /// Begin playback over `frame_count` frames from frame 0, invalidating
    /// any ticks scheduled against the previous generation.
    pub fn start(&mut self, frame_count: usize) {
        self.generation += 1;
        self.frame = 0;
        self.frame_count = frame_count;
    }

    /// Stop playback and invalidate outstanding ticks.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.frame = 0;
        self.frame_count = 0;
    }

    /// Advance to the next frame, wrapping at the end of the sequence.
    /// Returns the new frame index, or `None` for a stale or idle tick.
    pub fn tick(&mut self, generation: u64) -> Option<usize> {
        if generation != self.generation || self.frame_count == 0 {
            return None;
        }
        self.frame = (self.frame + 1) % self.frame_count;
        Some(self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_wrap_around() {
        let mut playback = Playback::new(Duration::from_millis(100));
        playback.start(3);
        let g = playback.generation();
        assert_eq!(playback.tick(g), Some(1));
        assert_eq!(playback.tick(g), Some(2));
        assert_eq!(playback.tick(g), Some(0));
    }

    #[test]
    fn stale_generation_is_ignored() {
        let mut playback = Playback::new(Duration::from_millis(100));
        playback.start(4);
        let stale = playback.generation();
        playback.tick(stale);

        playback.start(2);
        assert_eq!(playback.tick(stale), None);
        assert_eq!(playback.current_frame(), 0);
        assert_eq!(playback.tick(playback.generation()), Some(1));
    }

    #[test]
    fn cancelled_playback_ignores_ticks() {
        let mut playback = Playback::new(Duration::from_millis(100));
        playback.start(5);
        let g = playback.generation();
        playback.cancel();
        assert_eq!(playback.tick(g), None);
        assert!(!playback.is_running());
    }
}
