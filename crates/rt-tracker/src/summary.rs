//! Shareable summaries and cross-user comparison.

use std::cmp::Ordering;

use rt_core::{Mode, RollStats, StreakSnapshot};
use serde::Serialize;

use crate::user::UserId;

/// A snapshot of one user's derived statistics, ready to share.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Whose statistics these are.
    pub user: UserId,
    /// Total results recorded.
    pub count: u64,
    /// Mean result.
    pub mean: f64,
    /// Median result.
    pub median: u32,
    /// Most frequent results.
    pub mode: Mode,
    /// Natural 1s rolled.
    pub nat1s: u32,
    /// Natural 20s rolled.
    pub nat20s: u32,
    /// Current streak.
    pub streak: StreakSnapshot,
}

impl Summary {
    /// Summarise a user's statistics.
    pub fn from_stats(user: UserId, stats: &RollStats) -> Self {
        Self {
            user,
            count: stats.count(),
            mean: stats.mean(),
            median: stats.median(),
            mode: stats.mode(),
            nat1s: stats.nat1s(),
            nat20s: stats.nat20s(),
            streak: stats.streak().to_snapshot(),
        }
    }
}

/// "9", "9 and 12", "1, 4 and 9".
fn join_faces(faces: &[u32]) -> String {
    match faces {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(u32::to_string).collect();
            format!("{} and {last}", head.join(", "))
        }
    }
}

fn describe_mode(mode: &Mode) -> String {
    let faces = join_faces(&mode.modes);
    if mode.is_tie() {
        format!("{faces} ({} each)", mode.count)
    } else if mode.count == 1 {
        format!("{faces} (1 time)")
    } else {
        format!("{faces} ({} times)", mode.count)
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Roll summary for {}", self.user)?;
        if self.count == 0 {
            return write!(f, "  No d20 rolls recorded.");
        }
        writeln!(f, "  Rolls:   {}", self.count)?;
        writeln!(f, "  Mean:    {:.2}", self.mean)?;
        writeln!(f, "  Median:  {}", self.median)?;
        writeln!(f, "  Mode:    {}", describe_mode(&self.mode))?;
        writeln!(f, "  Nat 1s:  {}", self.nat1s)?;
        writeln!(f, "  Nat 20s: {}", self.nat20s)?;
        match self.streak.last {
            Some(face) => write!(f, "  Streak:  {face} x{}", self.streak.count),
            None => write!(f, "  Streak:  none"),
        }
    }
}

/// The users sharing the best value of one statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leader<T> {
    /// The winning value.
    pub value: T,
    /// Everyone who reached it, in input order.
    pub users: Vec<UserId>,
}

impl<T> Leader<T> {
    /// Whether several users share the lead.
    pub fn is_tie(&self) -> bool {
        self.users.len() > 1
    }
}

/// Leaders across several users. Users with no recorded rolls are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    /// Highest mean result.
    pub highest_mean: Option<Leader<f64>>,
    /// Highest median result.
    pub highest_median: Option<Leader<u32>>,
    /// Most natural 20s.
    pub most_nat20s: Option<Leader<u32>>,
    /// Most natural 1s.
    pub most_nat1s: Option<Leader<u32>>,
}

/// Exact mean ordering by cross-multiplication.
#[derive(Debug, Clone, Copy)]
struct MeanKey {
    sum: u64,
    count: u64,
}

impl Ord for MeanKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = u128::from(self.sum) * u128::from(other.count);
        let rhs = u128::from(other.sum) * u128::from(self.count);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for MeanKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MeanKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MeanKey {}

fn leaders_by<K, F>(entries: &[(UserId, RollStats)], key: F) -> Option<Leader<K>>
where
    K: Ord + Copy,
    F: Fn(&RollStats) -> K,
{
    let mut best: Option<Leader<K>> = None;
    for (user, stats) in entries.iter().filter(|(_, s)| !s.is_empty()) {
        let value = key(stats);
        match &mut best {
            Some(leader) => match value.cmp(&leader.value) {
                Ordering::Greater => {
                    *leader = Leader {
                        value,
                        users: vec![user.clone()],
                    }
                }
                Ordering::Equal => leader.users.push(user.clone()),
                Ordering::Less => {}
            },
            None => {
                best = Some(Leader {
                    value,
                    users: vec![user.clone()],
                })
            }
        }
    }
    best
}

impl Comparison {
    /// Compare the given users' statistics.
    pub fn of(entries: &[(UserId, RollStats)]) -> Self {
        let highest_mean = leaders_by(entries, |s| MeanKey {
            sum: s.sum(),
            count: s.count(),
        })
        .map(|leader| Leader {
            value: leader.value.sum as f64 / leader.value.count as f64,
            users: leader.users,
        });

        Self {
            highest_mean,
            highest_median: leaders_by(entries, RollStats::median),
            most_nat20s: leaders_by(entries, RollStats::nat20s),
            most_nat1s: leaders_by(entries, RollStats::nat1s),
        }
    }
}
