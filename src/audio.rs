//! Audio boundary.
//!
//! The simulation never talks to a sound device. It reports sound cues by
//! label through [`CuePlayer`] and the host decides what to do with them.

/// Receiver for sound cues emitted by the simulation.
///
/// `gain` and `pitch` are unit multipliers relative to whatever asset the
/// host maps the label to.
pub trait CuePlayer {
    fn play(&mut self, label: &str, gain: f32, pitch: f32);
}

/// Cue sink that discards everything. Handy for tests and headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCues;

impl CuePlayer for NullCues {
    fn play(&mut self, _label: &str, _gain: f32, _pitch: f32) {}
}

/// One recorded cue.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub label: String,
    pub gain: f32,
    pub pitch: f32,
}

/// Cue sink that keeps every cue it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct CueRecorder {
    pub cues: Vec<Cue>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded cues with the given label.
    pub fn count(&self, label: &str) -> usize {
        self.cues.iter().filter(|c| c.label == label).count()
    }

    /// Drains the recorded cues.
    pub fn take(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

impl CuePlayer for CueRecorder {
    fn play(&mut self, label: &str, gain: f32, pitch: f32) {
        self.cues.push(Cue {
            label: label.to_string(),
            gain,
            pitch,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_counts_by_label() {
        let mut rec = CueRecorder::new();
        rec.play("shoot", 0.7, 1.0);
        rec.play("boom", 1.0, 1.0);
        rec.play("shoot", 0.7, 1.0);

        assert_eq!(rec.count("shoot"), 2);
        assert_eq!(rec.count("boom"), 1);
        assert_eq!(rec.count("blip"), 0);

        let drained = rec.take();
        assert_eq!(drained.len(), 3);
        assert_eq!(rec.cues.len(), 0);
    }
}
