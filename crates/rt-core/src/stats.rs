//! Histogram-based roll statistics for a single die category.
//!
//! [`RollStats`] owns one counter per face value of a d20 plus the current
//! [`Streak`]. Every derived figure (mean, median, mode, percentages) is a
//! pure function of those counters, so they are computed on demand rather
//! than stored.

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};
use crate::streak::{Streak, StreakSnapshot};

/// Number of faces on the tracked die.
pub const FACES: usize = 20;

/// The most frequent face values and their shared frequency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    /// Face values tied for the highest count, in ascending order.
    pub modes: Vec<u32>,
    /// How often each of the modes occurred.
    pub count: u32,
}

impl Mode {
    /// Whether more than one face shares the highest count.
    pub fn is_tie(&self) -> bool {
        self.modes.len() > 1
    }
}

/// Accumulated statistics for one user's d20 results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollStats {
    histogram: [u32; FACES],
    streak: Streak,
}

/// Persisted form of [`RollStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollStatsSnapshot {
    /// Occurrence counters, index `i` counting face `i + 1`.
    pub histogram: Vec<u32>,
    /// The streak at the time of the snapshot.
    pub streak: StreakSnapshot,
}

impl RollStats {
    /// Create zero-state statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build statistics by recording each value in order.
    pub fn from_results<I>(values: I) -> StatsResult<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut stats = Self::new();
        for value in values {
            stats.update(value)?;
        }
        Ok(stats)
    }

    /// Record a single face value.
    ///
    /// Range and overflow checks happen before any counter is touched, so a
    /// rejected value leaves the statistics exactly as they were.
    pub fn update(&mut self, value: u32) -> StatsResult<()> {
        if !(1..=FACES as u32).contains(&value) {
            return Err(StatsError::FaceOutOfRange(value));
        }
        let slot = value as usize - 1;
        let bumped = self.histogram[slot]
            .checked_add(1)
            .filter(|_| self.streak.next_count(value).is_some())
            .ok_or(StatsError::CounterOverflow(value))?;
        self.histogram[slot] = bumped;
        self.streak.update(value);
        Ok(())
    }

    /// Zero every counter and clear the streak.
    pub fn clear(&mut self) {
        self.histogram = [0; FACES];
        self.streak.clear();
    }

    /// The raw histogram, index `i` counting face `i + 1`.
    pub fn histogram(&self) -> &[u32; FACES] {
        &self.histogram
    }

    /// The current streak.
    pub fn streak(&self) -> &Streak {
        &self.streak
    }

    /// How many times `face` has been recorded, or 0 for faces off the die.
    pub fn occurrences(&self, face: u32) -> u32 {
        match face {
            1..=20 => self.histogram[face as usize - 1],
            _ => 0,
        }
    }

    /// Total number of recorded results.
    pub fn count(&self) -> u64 {
        self.histogram.iter().map(|&c| u64::from(c)).sum()
    }

    /// Whether no results have been recorded.
    pub fn is_empty(&self) -> bool {
        self.histogram.iter().all(|&c| c == 0)
    }

    /// Number of natural 1s.
    pub fn nat1s(&self) -> u32 {
        self.histogram[0]
    }

    /// Number of natural 20s.
    pub fn nat20s(&self) -> u32 {
        self.histogram[FACES - 1]
    }

    /// Sum of all recorded face values.
    pub fn sum(&self) -> u64 {
        self.faces()
            .map(|(face, count)| u64::from(face) * u64::from(count))
            .sum()
    }

    /// Arithmetic mean of recorded values, or 0 when empty.
    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        self.sum() as f64 / count as f64
    }

    /// The first face whose cumulative count reaches half the total.
    ///
    /// The midpoint uses real division and the two central values of an even
    /// count are never averaged: one 10 and one 11 give a median of 10.
    pub fn median(&self) -> u32 {
        let count = self.count();
        if count == 0 {
            return 0;
        }

        let mid = count as f64 / 2.0;
        let mut cumulative = 0u64;
        for (face, occurrences) in self.faces() {
            cumulative += u64::from(occurrences);
            if cumulative as f64 >= mid {
                return face;
            }
        }
        FACES as u32
    }

    /// The most frequent faces, ties kept in ascending order.
    pub fn mode(&self) -> Mode {
        let mut mode = Mode::default();
        for (face, occurrences) in self.faces() {
            if occurrences == 0 {
                continue;
            }
            if occurrences > mode.count {
                mode.modes = vec![face];
                mode.count = occurrences;
            } else if occurrences == mode.count {
                mode.modes.push(face);
            }
        }
        mode
    }

    /// Share of each face as a whole percentage, rounded down.
    ///
    /// Returns all zeros when nothing has been recorded.
    pub fn percents(&self) -> [u32; FACES] {
        let count = self.count();
        let mut percents = [0; FACES];
        if count == 0 {
            return percents;
        }
        for (slot, &occurrences) in percents.iter_mut().zip(self.histogram.iter()) {
            // floor(c / n * 100) without float drift
            *slot = (u64::from(occurrences) * 100 / count) as u32;
        }
        percents
    }

    /// Produce the persisted form.
    pub fn to_snapshot(&self) -> RollStatsSnapshot {
        RollStatsSnapshot {
            histogram: self.histogram.to_vec(),
            streak: self.streak.to_snapshot(),
        }
    }

    /// Restore statistics from their persisted form.
    ///
    /// Histograms that do not hold exactly one counter per face are rejected
    /// rather than padded or truncated, as are streaks longer than the
    /// recorded count of their face.
    pub fn from_snapshot(snapshot: RollStatsSnapshot) -> StatsResult<Self> {
        let len = snapshot.histogram.len();
        let histogram: [u32; FACES] = snapshot.histogram.try_into().map_err(|_| {
            StatsError::MalformedSnapshot(format!(
                "histogram has {len} entries, expected {FACES}"
            ))
        })?;
        let streak = Streak::from_snapshot(snapshot.streak)?;

        if let Some(last) = streak.last().filter(|v| !(1..=FACES as u32).contains(v)) {
            return Err(StatsError::MalformedSnapshot(format!(
                "streak value {last} is not a face of the die"
            )));
        }

        if let Some(last) = streak.last() {
            let recorded = histogram[last as usize - 1];
            if streak.count() > recorded {
                return Err(StatsError::MalformedSnapshot(format!(
                    "streak of {} x{last} but only {recorded} recorded",
                    streak.count()
                )));
            }
        }

        Ok(Self { histogram, streak })
    }

    fn faces(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.histogram
            .iter()
            .enumerate()
            .map(|(idx, &count)| (idx as u32 + 1, count))
    }
}

impl std::fmt::Display for RollStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rolls, mean {:.2}, median {}, nat1s {}, nat20s {}",
            self.count(),
            self.mean(),
            self.median(),
            self.nat1s(),
            self.nat20s()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(values: &[u32]) -> RollStats {
        RollStats::from_results(values.iter().copied()).unwrap()
    }

    #[test]
    fn zero_state() {
        let s = RollStats::new();
        assert_eq!(s.count(), 0);
        assert!(s.is_empty());
        assert_eq!(s.sum(), 0);
        assert_eq!(s.mean(), 0.0);
        assert_eq!(s.median(), 0);
        assert_eq!(s.mode(), Mode::default());
        assert_eq!(s.percents(), [0; FACES]);
    }

    #[test]
    fn update_bounds() {
        let mut s = RollStats::new();
        assert_eq!(s.update(0), Err(StatsError::FaceOutOfRange(0)));
        assert_eq!(s.update(21), Err(StatsError::FaceOutOfRange(21)));
        assert!(s.is_empty());
        assert!(s.streak().is_empty());

        s.update(1).unwrap();
        s.update(20).unwrap();
        assert_eq!(s.nat1s(), 1);
        assert_eq!(s.nat20s(), 1);
        assert_eq!(s.count(), 2);
    }

    #[test]
    fn rejected_update_keeps_prior_state() {
        let mut s = stats(&[4, 4]);
        let before = s.clone();
        assert!(s.update(25).is_err());
        assert_eq!(s, before);
        assert_eq!(s.streak().count(), 2);
    }

    #[test]
    fn sum_and_mean() {
        let s = stats(&[1, 2, 3, 10]);
        assert_eq!(s.sum(), 16);
        assert_eq!(s.mean(), 4.0);
    }

    #[test]
    fn median_does_not_average_central_values() {
        let s = stats(&[10, 11]);
        assert_eq!(s.median(), 10);
    }

    #[test]
    fn median_odd_count() {
        // threshold 2.5 is first reached at the third value
        let s = stats(&[2, 4, 6, 8, 10]);
        assert_eq!(s.median(), 6);
    }

    #[test]
    fn median_single_value() {
        assert_eq!(stats(&[17]).median(), 17);
    }

    #[test]
    fn mode_single_maximum() {
        let s = stats(&[3, 3, 8, 12]);
        assert_eq!(
            s.mode(),
            Mode {
                modes: vec![3],
                count: 2
            }
        );
        assert!(!s.mode().is_tie());
    }

    #[test]
    fn mode_ties_ascending() {
        let s = stats(&[17, 3, 17, 3, 5]);
        let mode = s.mode();
        assert_eq!(mode.modes, vec![3, 17]);
        assert_eq!(mode.count, 2);
        assert!(mode.is_tie());
    }

    #[test]
    fn mode_later_maximum_replaces_earlier_ties() {
        let s = stats(&[1, 2, 9, 9]);
        assert_eq!(s.mode().modes, vec![9]);
    }

    #[test]
    fn percents_round_down() {
        let s = stats(&[1, 2, 2]);
        let p = s.percents();
        assert_eq!(p[0], 33);
        assert_eq!(p[1], 66);
        assert_eq!(p[2], 0);
    }

    #[test]
    fn occurrences_off_die() {
        let s = stats(&[5]);
        assert_eq!(s.occurrences(5), 1);
        assert_eq!(s.occurrences(0), 0);
        assert_eq!(s.occurrences(21), 0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut s = stats(&[1, 20, 20, 5]);
        s.clear();
        assert_eq!(s, RollStats::new());
        assert_eq!(s.count(), 0);
        assert_eq!(s.mean(), 0.0);
        assert_eq!(s.median(), 0);
        assert_eq!(s.mode(), Mode::default());
    }

    #[test]
    fn snapshot_json_shape() {
        let s = stats(&[20, 20]);
        let json = serde_json::to_value(s.to_snapshot()).unwrap();
        let mut expected = vec![0u32; FACES];
        expected[19] = 2;
        assert_eq!(json["histogram"], serde_json::json!(expected));
        assert_eq!(json["streak"], serde_json::json!({ "last": 20, "count": 2 }));

        let empty = serde_json::to_value(RollStats::new().to_snapshot()).unwrap();
        assert_eq!(empty["streak"], serde_json::json!({ "last": null, "count": 0 }));
    }

    #[test]
    fn snapshot_rejects_wrong_length() {
        let snapshot = RollStatsSnapshot {
            histogram: vec![1; 19],
            streak: StreakSnapshot::default(),
        };
        let err = RollStats::from_snapshot(snapshot).unwrap_err();
        assert!(err.to_string().contains("19 entries"));
    }

    #[test]
    fn snapshot_rejects_streak_off_die() {
        let snapshot = RollStatsSnapshot {
            histogram: vec![0; FACES],
            streak: StreakSnapshot {
                last: Some(42),
                count: 1,
            },
        };
        assert!(matches!(
            RollStats::from_snapshot(snapshot),
            Err(StatsError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn snapshot_rejects_streak_longer_than_histogram() {
        let snapshot = RollStatsSnapshot {
            histogram: vec![0; FACES],
            streak: StreakSnapshot {
                last: Some(7),
                count: 9,
            },
        };
        let err = RollStats::from_snapshot(snapshot).unwrap_err();
        assert!(err.to_string().contains("streak of 9 x7"));

        let mut histogram = vec![0; FACES];
        histogram[6] = 9;
        let snapshot = RollStatsSnapshot {
            histogram,
            streak: StreakSnapshot {
                last: Some(7),
                count: 9,
            },
        };
        assert_eq!(RollStats::from_snapshot(snapshot).unwrap().count(), 9);
    }

    #[test]
    fn full_counter_rejects_update() {
        let mut histogram = vec![0; FACES];
        histogram[0] = u32::MAX;
        let mut s = RollStats::from_snapshot(RollStatsSnapshot {
            histogram,
            streak: StreakSnapshot {
                last: Some(1),
                count: 3,
            },
        })
        .unwrap();
        let before = s.clone();

        assert_eq!(s.update(1), Err(StatsError::CounterOverflow(1)));
        assert_eq!(s, before);

        s.update(2).unwrap();
        assert_eq!(s.occurrences(2), 1);
        assert_eq!(s.count(), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn display() {
        let s = stats(&[1, 20]);
        assert_eq!(
            s.to_string(),
            "2 rolls, mean 10.50, median 1, nat1s 1, nat20s 1"
        );
    }
}
