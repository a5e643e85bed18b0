//! Closure run tracking policies
//!
//! A closure run is a maximal span of consecutive below-threshold
//! openness samples. Both policies expose the same surface: whether the
//! eyes are currently closed, how far the current run has progressed,
//! and the reopening edge that ends a run.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Progress of a closure run, in the unit of the active policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RunValue {
    /// Consecutive below-threshold processed samples
    Frames(u32),
    /// Time since closure onset
    Elapsed(#[serde(with = "duration_ms")] Duration),
}

impl RunValue {
    /// Elapsed duration, if this is a duration-policy run.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            RunValue::Elapsed(d) => Some(*d),
            RunValue::Frames(_) => None,
        }
    }

    /// Frame count, if this is a frame-count-policy run.
    pub fn frames(&self) -> Option<u32> {
        match self {
            RunValue::Frames(n) => Some(*n),
            RunValue::Elapsed(_) => None,
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        (d.as_millis() as u64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// Tracker output for one processed sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosureState {
    /// Sample was below the openness threshold
    pub is_closed: bool,
    /// Progress of the current run (zero/empty when open)
    pub run: RunValue,
    /// This sample ended a run (eyes reopened on this sample)
    pub just_reopened: bool,
    /// Final value of the run that just ended, set iff `just_reopened`
    pub ended_run: Option<RunValue>,
}

/// Run-length tracking over openness samples.
///
/// Implementations are fed one sample per processed tick and reset the
/// run the instant an at-or-above-threshold sample arrives.
pub trait ClosurePolicy: Send {
    fn advance(&mut self, openness: f32, now: Instant) -> ClosureState;

    /// Discard any in-progress run (on disarm or driver change).
    fn reset(&mut self);
}

/// Primary policy: counts consecutive closed processed samples.
#[derive(Debug)]
pub struct FrameCountPolicy {
    threshold: f32,
    count: u32,
}

impl FrameCountPolicy {
    pub fn new(threshold: f32) -> Self {
        Self { threshold, count: 0 }
    }
}

impl ClosurePolicy for FrameCountPolicy {
    fn advance(&mut self, openness: f32, _now: Instant) -> ClosureState {
        if openness < self.threshold {
            self.count += 1;
            ClosureState {
                is_closed: true,
                run: RunValue::Frames(self.count),
                just_reopened: false,
                ended_run: None,
            }
        } else {
            let ended = self.count;
            self.count = 0;
            ClosureState {
                is_closed: false,
                run: RunValue::Frames(0),
                just_reopened: ended > 0,
                ended_run: (ended > 0).then_some(RunValue::Frames(ended)),
            }
        }
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}

/// Alternate policy: wall-clock time since closure onset.
///
/// Run progress depends on when samples arrive, so processing jitter
/// feeds straight into the measured duration.
#[derive(Debug)]
pub struct DurationPolicy {
    threshold: f32,
    onset: Option<Instant>,
}

impl DurationPolicy {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            onset: None,
        }
    }
}

impl ClosurePolicy for DurationPolicy {
    fn advance(&mut self, openness: f32, now: Instant) -> ClosureState {
        if openness < self.threshold {
            let onset = *self.onset.get_or_insert(now);
            ClosureState {
                is_closed: true,
                run: RunValue::Elapsed(now.saturating_duration_since(onset)),
                just_reopened: false,
                ended_run: None,
            }
        } else {
            let ended = self
                .onset
                .take()
                .map(|onset| RunValue::Elapsed(now.saturating_duration_since(onset)));
            ClosureState {
                is_closed: false,
                run: RunValue::Elapsed(Duration::ZERO),
                just_reopened: ended.is_some(),
                ended_run: ended,
            }
        }
    }

    fn reset(&mut self) {
        self.onset = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const THRESHOLD: f32 = 0.25;
    const CLOSED: f32 = 0.10;
    const OPEN: f32 = 0.30;

    #[test]
    fn test_frame_count_increments_while_closed() {
        let mut policy = FrameCountPolicy::new(THRESHOLD);
        let now = Instant::now();
        for expected in 1..=5u32 {
            let state = policy.advance(CLOSED, now);
            assert!(state.is_closed);
            assert_eq!(state.run, RunValue::Frames(expected));
            assert!(!state.just_reopened);
        }
    }

    #[test]
    fn test_frame_count_reopening_edge() {
        let mut policy = FrameCountPolicy::new(THRESHOLD);
        let now = Instant::now();
        for _ in 0..7 {
            policy.advance(CLOSED, now);
        }
        let state = policy.advance(OPEN, now);
        assert!(!state.is_closed);
        assert!(state.just_reopened);
        assert_eq!(state.run, RunValue::Frames(0));
        assert_eq!(state.ended_run, Some(RunValue::Frames(7)));

        // Edge fires once; staying open is not a reopening
        let state = policy.advance(OPEN, now);
        assert!(!state.just_reopened);
        assert_eq!(state.ended_run, None);
    }

    #[test]
    fn test_threshold_sample_counts_as_open() {
        let mut policy = FrameCountPolicy::new(THRESHOLD);
        let state = policy.advance(THRESHOLD, Instant::now());
        assert!(!state.is_closed);
    }

    #[test]
    fn test_duration_policy_tracks_elapsed() {
        let mut policy = DurationPolicy::new(THRESHOLD);
        let t0 = Instant::now();
        let state = policy.advance(CLOSED, t0);
        assert_eq!(state.run, RunValue::Elapsed(Duration::ZERO));

        let t1 = t0 + Duration::from_millis(800);
        let state = policy.advance(CLOSED, t1);
        assert_eq!(state.run, RunValue::Elapsed(Duration::from_millis(800)));

        let t2 = t0 + Duration::from_millis(1200);
        let state = policy.advance(OPEN, t2);
        assert!(state.just_reopened);
        assert_eq!(
            state.ended_run,
            Some(RunValue::Elapsed(Duration::from_millis(1200)))
        );
        assert_eq!(state.run, RunValue::Elapsed(Duration::ZERO));
    }

    #[test]
    fn test_reset_discards_run() {
        let mut policy = FrameCountPolicy::new(THRESHOLD);
        let now = Instant::now();
        for _ in 0..30 {
            policy.advance(CLOSED, now);
        }
        policy.reset();
        // No reopening edge after a reset; the run simply never happened
        let state = policy.advance(OPEN, now);
        assert!(!state.just_reopened);
        assert_eq!(state.ended_run, None);
    }

    proptest! {
        /// After any k closed samples followed by one open sample, the
        /// run value is exactly zero.
        #[test]
        fn prop_run_is_zero_after_reopening(k in 0u32..200) {
            let mut policy = FrameCountPolicy::new(THRESHOLD);
            let now = Instant::now();
            for _ in 0..k {
                policy.advance(CLOSED, now);
            }
            let state = policy.advance(OPEN, now);
            prop_assert_eq!(state.run, RunValue::Frames(0));
            prop_assert_eq!(state.just_reopened, k > 0);
        }
    }
}
