//! Messages exchanged with the host.
//!
//! [`RollEvent`] is what the host sends when a roll lands in chat;
//! [`TrackerEvent`] is what the tracker broadcasts back once statistics
//! change.

use std::collections::BTreeMap;

use rt_core::StreakSnapshot;
use serde::{Deserialize, Serialize};

use crate::user::{User, UserId};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// The die with the given number of faces.
    pub fn from_faces(faces: u32) -> Self {
        match faces {
            4 => Self::D4,
            6 => Self::D6,
            8 => Self::D8,
            10 => Self::D10,
            12 => Self::D12,
            20 => Self::D20,
            100 => Self::D100,
            n => Self::Custom(n),
        }
    }

    /// Parse a die from a string like "d20", "d6", "d100".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let num = s.trim().to_lowercase().strip_prefix('d')?.parse::<u32>().ok()?;
        (num >= 2).then(|| Self::from_faces(num))
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Results of one die type within a roll, in the order they were rolled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceGroup {
    /// The die that produced these results.
    pub die: Die,
    /// Individual results.
    pub results: Vec<u32>,
}

impl DiceGroup {
    /// A group of results for `die`.
    pub fn new(die: Die, results: impl Into<Vec<u32>>) -> Self {
        Self {
            die,
            results: results.into(),
        }
    }
}

/// A single roll expression evaluated by the host, e.g. `2d20kh + 1d6`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    /// The dice groups making up the roll.
    pub groups: Vec<DiceGroup>,
}

impl Roll {
    /// A roll of d20s with the given results.
    pub fn d20(results: impl Into<Vec<u32>>) -> Self {
        Self::default().with_group(DiceGroup::new(Die::D20, results))
    }

    /// Add a dice group.
    pub fn with_group(mut self, group: DiceGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Results of every group rolled with `die`, in order.
    pub fn results_for(&self, die: Die) -> impl Iterator<Item = u32> + '_ {
        self.groups
            .iter()
            .filter(move |g| g.die == die)
            .flat_map(|g| g.results.iter().copied())
    }
}

/// Host-assigned chat message id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Wrap a host message id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// System-specific markers attached to a chat message, keyed by dotted
/// path (for example `dnd5e.roll.type`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollContext {
    tags: BTreeMap<String, String>,
}

impl RollContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// The value of a tag, if present and non-empty.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whether the context carries a non-empty value for `key`.
    pub fn has_tag(&self, key: &str) -> bool {
        self.tag(key).is_some()
    }
}

/// A chat message containing one or more rolls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollEvent {
    /// The chat message id.
    pub message_id: MessageId,
    /// Who made the roll.
    pub roller: User,
    /// Whether the message is hidden from its author.
    pub blind: bool,
    /// Whether the local user can see the message content.
    pub content_visible: bool,
    /// The rolls in the message.
    pub rolls: Vec<Roll>,
    /// System-specific markers.
    pub context: RollContext,
}

impl RollEvent {
    /// A visible, non-blind message with no rolls yet.
    pub fn new(message_id: impl Into<String>, roller: User) -> Self {
        Self {
            message_id: MessageId::new(message_id),
            roller,
            blind: false,
            content_visible: true,
            rolls: Vec::new(),
            context: RollContext::new(),
        }
    }

    /// Add a roll.
    pub fn with_roll(mut self, roll: Roll) -> Self {
        self.rolls.push(roll);
        self
    }

    /// Mark the message blind or not.
    pub fn blind(mut self, blind: bool) -> Self {
        self.blind = blind;
        self
    }

    /// Mark whether the local user can see the content.
    pub fn content_visible(mut self, visible: bool) -> Self {
        self.content_visible = visible;
        self
    }

    /// Add a context tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context = self.context.with_tag(key, value);
        self
    }
}

/// Who a notification is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Everyone at the table.
    Everyone,
    /// Only the GM.
    GmOnly,
}

/// Notifications broadcast by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// A user's statistics were updated.
    StatsChanged {
        /// Whose statistics changed.
        user: UserId,
        /// Total results now recorded.
        count: u64,
        /// The current streak.
        streak: StreakSnapshot,
    },
    /// A user's statistics were removed.
    StatsCleared {
        /// Whose statistics were removed.
        user: UserId,
    },
    /// A user rolled the same face enough times in a row to announce it.
    StreakReached {
        /// Who is on a streak.
        user: UserId,
        /// The repeated face value.
        face: u32,
        /// How many times in a row it came up.
        length: u32,
        /// Who should see the announcement.
        visibility: Visibility,
    },
    /// A roll could not be recorded.
    RecordFailed {
        /// The message that failed.
        message_id: MessageId,
        /// What went wrong.
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_sides_and_faces() {
        assert_eq!(Die::D20.sides(), 20);
        assert_eq!(Die::from_faces(20), Die::D20);
        assert_eq!(Die::from_faces(30), Die::Custom(30));
        assert_eq!(Die::Custom(30).sides(), 30);
    }

    #[test]
    fn die_from_str() {
        assert_eq!(Die::from_str_tag("d20"), Some(Die::D20));
        assert_eq!(Die::from_str_tag("D6"), Some(Die::D6));
        assert_eq!(Die::from_str_tag("d30"), Some(Die::Custom(30)));
        assert_eq!(Die::from_str_tag("d1"), None);
        assert_eq!(Die::from_str_tag("foo"), None);
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D20.to_string(), "d20");
        assert_eq!(Die::Custom(30).to_string(), "d30");
    }

    #[test]
    fn results_for_filters_by_die() {
        let roll = Roll::d20([4, 17])
            .with_group(DiceGroup::new(Die::D6, [3, 6]))
            .with_group(DiceGroup::new(Die::D20, [9]));
        let d20s: Vec<u32> = roll.results_for(Die::D20).collect();
        assert_eq!(d20s, vec![4, 17, 9]);
    }

    #[test]
    fn context_tags() {
        let ctx = RollContext::new()
            .with_tag("dnd5e.roll.type", "attack")
            .with_tag("pf2e.context.type", "");
        assert_eq!(ctx.tag("dnd5e.roll.type"), Some("attack"));
        assert!(!ctx.has_tag("pf2e.context.type"));
        assert!(!ctx.has_tag("missing"));
    }

    #[test]
    fn event_builder() {
        let event = RollEvent::new("m1", User::player("alice"))
            .with_roll(Roll::d20([12]))
            .blind(true)
            .content_visible(false)
            .with_tag("dnd5e.roll.type", "save");
        assert!(event.blind);
        assert!(!event.content_visible);
        assert_eq!(event.rolls.len(), 1);
        assert!(event.context.has_tag("dnd5e.roll.type"));
    }

    #[test]
    fn tracker_event_json() {
        let event = TrackerEvent::StatsCleared {
            user: UserId::new("alice"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "stats_cleared", "user": "alice" }));
    }
}
