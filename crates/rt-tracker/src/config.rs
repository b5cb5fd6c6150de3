//! Tracker configuration.
//!
//! Every option the tracker honours lives here and is passed in at
//! construction; nothing is read from ambient state.

use serde::{Deserialize, Serialize};

/// The game system the host is running, which decides which
/// system-specific restrictions apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameSystem {
    /// Dungeons & Dragons 5th edition.
    Dnd5e,
    /// Pathfinder 2nd edition.
    Pf2e,
    /// Any other system; no restrictions apply.
    Other(String),
}

/// A system-specific requirement: rolls must carry `tag` in their context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restriction {
    /// Name of the check in the admission map.
    pub check: &'static str,
    /// Context tag the roll must carry.
    pub tag: &'static str,
}

impl GameSystem {
    /// The host's id for this system.
    pub fn id(&self) -> &str {
        match self {
            Self::Dnd5e => "dnd5e",
            Self::Pf2e => "pf2e",
            Self::Other(id) => id,
        }
    }

    /// The "only count rolls tied to an action" restriction for this system,
    /// if it has one.
    pub fn restriction(&self) -> Option<Restriction> {
        match self {
            Self::Dnd5e => Some(Restriction {
                check: "dnd5e_restrict_passed",
                tag: "dnd5e.roll.type",
            }),
            Self::Pf2e => Some(Restriction {
                check: "pf2e_restrict_passed",
                tag: "pf2e.context.type",
            }),
            Self::Other(_) => None,
        }
    }
}

impl Default for GameSystem {
    fn default() -> Self {
        Self::Other("generic".to_string())
    }
}

impl From<String> for GameSystem {
    fn from(id: String) -> Self {
        match id.trim().to_lowercase().as_str() {
            "dnd5e" => Self::Dnd5e,
            "pf2e" => Self::Pf2e,
            _ => Self::Other(id),
        }
    }
}

impl From<&str> for GameSystem {
    fn from(id: &str) -> Self {
        Self::from(id.to_string())
    }
}

impl From<GameSystem> for String {
    fn from(system: GameSystem) -> Self {
        system.id().to_string()
    }
}

impl std::fmt::Display for GameSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// How streak notifications are surfaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakBehaviour {
    /// Announced to the GM only.
    #[default]
    Hidden,
    /// Never announced.
    Disable,
    /// Announced to everyone unless the roll was blind.
    Shown,
}

/// Configuration for a roll tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Count blind rolls made by players.
    pub count_hidden_rolls: bool,
    /// The system the host is running.
    pub system: GameSystem,
    /// Only count rolls tied to a character action, for systems that mark them.
    pub restrict_counted_rolls: bool,
    /// The GM may view every player's statistics.
    pub gm_sees_players: bool,
    /// Players may view their own statistics.
    pub players_see_own: bool,
    /// How streak notifications are surfaced.
    pub streak_behaviour: StreakBehaviour,
    /// Consecutive identical results needed to announce a streak (2-5).
    pub streak_threshold: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            count_hidden_rolls: true,
            system: GameSystem::default(),
            restrict_counted_rolls: true,
            gm_sees_players: true,
            players_see_own: true,
            streak_behaviour: StreakBehaviour::default(),
            streak_threshold: 3,
        }
    }
}

impl TrackerConfig {
    /// Set whether blind player rolls are counted.
    pub fn with_count_hidden(mut self, count: bool) -> Self {
        self.count_hidden_rolls = count;
        self
    }

    /// Set the game system.
    pub fn with_system(mut self, system: impl Into<GameSystem>) -> Self {
        self.system = system.into();
        self
    }

    /// Set whether system restrictions are enforced.
    pub fn with_restrict_counted_rolls(mut self, restrict: bool) -> Self {
        self.restrict_counted_rolls = restrict;
        self
    }

    /// Set whether the GM may view other players' statistics.
    pub fn with_gm_sees_players(mut self, allowed: bool) -> Self {
        self.gm_sees_players = allowed;
        self
    }

    /// Set whether players may view their own statistics.
    pub fn with_players_see_own(mut self, allowed: bool) -> Self {
        self.players_see_own = allowed;
        self
    }

    /// Set the streak notification behaviour.
    pub fn with_streak_behaviour(mut self, behaviour: StreakBehaviour) -> Self {
        self.streak_behaviour = behaviour;
        self
    }

    /// Set the streak threshold (clamped to 2-5).
    pub fn with_streak_threshold(mut self, threshold: u32) -> Self {
        self.streak_threshold = threshold.clamp(2, 5);
        self
    }

    /// The threshold actually applied, clamped to 2-5 for configs
    /// deserialised with out-of-range values.
    pub fn effective_streak_threshold(&self) -> u32 {
        self.streak_threshold.clamp(2, 5)
    }

    /// The restriction currently in force, if any.
    pub fn active_restriction(&self) -> Option<Restriction> {
        if self.restrict_counted_rolls {
            self.system.restriction()
        } else {
            None
        }
    }
}
