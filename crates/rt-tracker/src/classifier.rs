//! Decides which rolls count toward a user's statistics.
//!
//! Every check is evaluated into a named map and a roll is admitted only
//! when all of them pass. A rejection is a normal outcome, not an error.

use std::collections::BTreeMap;

use crate::config::{Restriction, TrackerConfig};
use crate::event::{Die, Roll, RollEvent};

/// Name of the blind-roll check.
pub const BLIND_CHECK: &str = "blind_check";

/// The die whose results are tracked.
pub const TRACKED_DIE: Die = Die::D20;

/// Whether a message's rolls should be counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Every check passed.
    Counted,
    /// At least one check failed.
    Rejected {
        /// Names of the failed checks.
        failed: Vec<&'static str>,
    },
}

impl Admission {
    /// Whether the roll should be counted.
    pub fn is_counted(&self) -> bool {
        matches!(self, Self::Counted)
    }
}

/// The admission predicate for incoming rolls.
#[derive(Debug, Clone)]
pub struct RollClassifier {
    count_hidden: bool,
    restriction: Option<Restriction>,
}

impl RollClassifier {
    /// Build a classifier from the active configuration.
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            count_hidden: config.count_hidden_rolls,
            restriction: config.active_restriction(),
        }
    }

    /// Evaluate every configured check for a message.
    pub fn requirements(&self, event: &RollEvent) -> BTreeMap<&'static str, bool> {
        let mut checks = BTreeMap::new();
        checks.insert(
            BLIND_CHECK,
            !event.blind || self.count_hidden || event.roller.is_gm(),
        );
        if let Some(restriction) = self.restriction {
            checks.insert(restriction.check, event.context.has_tag(restriction.tag));
        }
        checks
    }

    /// Decide whether a message's rolls are counted.
    pub fn admit(&self, event: &RollEvent) -> Admission {
        let failed: Vec<&'static str> = self
            .requirements(event)
            .into_iter()
            .filter_map(|(name, passed)| (!passed).then_some(name))
            .collect();

        if failed.is_empty() {
            Admission::Counted
        } else {
            Admission::Rejected { failed }
        }
    }

    /// The results of a roll that belong to the tracked die.
    pub fn countable_results(roll: &Roll) -> impl Iterator<Item = u32> + '_ {
        roll.results_for(TRACKED_DIE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSystem;
    use crate::event::DiceGroup;
    use crate::user::User;

    fn blind_roll(roller: User) -> RollEvent {
        RollEvent::new("m1", roller)
            .with_roll(Roll::d20([10]))
            .blind(true)
    }

    #[test]
    fn open_roll_is_counted() {
        let classifier = RollClassifier::new(&TrackerConfig::default().with_count_hidden(false));
        let event = RollEvent::new("m1", User::player("alice")).with_roll(Roll::d20([3]));
        assert_eq!(classifier.admit(&event), Admission::Counted);
    }

    #[test]
    fn blind_player_roll_rejected_without_count_hidden() {
        let classifier = RollClassifier::new(&TrackerConfig::default().with_count_hidden(false));
        let admission = classifier.admit(&blind_roll(User::player("alice")));
        assert_eq!(
            admission,
            Admission::Rejected {
                failed: vec![BLIND_CHECK]
            }
        );
    }

    #[test]
    fn blind_roll_counted_when_hidden_counting_enabled() {
        let classifier = RollClassifier::new(&TrackerConfig::default().with_count_hidden(true));
        assert!(classifier.admit(&blind_roll(User::player("alice"))).is_counted());
    }

    #[test]
    fn blind_gm_roll_always_counted() {
        let classifier = RollClassifier::new(&TrackerConfig::default().with_count_hidden(false));
        assert!(classifier.admit(&blind_roll(User::gm("gm"))).is_counted());
    }

    #[test]
    fn dnd5e_restriction_requires_roll_type() {
        let config = TrackerConfig::default().with_system(GameSystem::Dnd5e);
        let classifier = RollClassifier::new(&config);

        let bare = RollEvent::new("m1", User::player("alice")).with_roll(Roll::d20([8]));
        assert_eq!(
            classifier.admit(&bare),
            Admission::Rejected {
                failed: vec!["dnd5e_restrict_passed"]
            }
        );

        let tagged = bare.with_tag("dnd5e.roll.type", "attack");
        assert!(classifier.admit(&tagged).is_counted());
    }

    #[test]
    fn pf2e_restriction_requires_context_type() {
        let config = TrackerConfig::default().with_system("pf2e");
        let classifier = RollClassifier::new(&config);
        let event = RollEvent::new("m1", User::player("alice"))
            .with_roll(Roll::d20([8]))
            .with_tag("dnd5e.roll.type", "attack");
        assert!(!classifier.admit(&event).is_counted());

        let event = event.with_tag("pf2e.context.type", "skill-check");
        assert!(classifier.admit(&event).is_counted());
    }

    #[test]
    fn restriction_ignored_when_disabled() {
        let config = TrackerConfig::default()
            .with_system(GameSystem::Dnd5e)
            .with_restrict_counted_rolls(false);
        let classifier = RollClassifier::new(&config);
        let event = RollEvent::new("m1", User::player("alice")).with_roll(Roll::d20([8]));
        assert_eq!(classifier.requirements(&event).len(), 1);
        assert!(classifier.admit(&event).is_counted());
    }

    #[test]
    fn all_failures_reported() {
        let config = TrackerConfig::default()
            .with_system(GameSystem::Dnd5e)
            .with_count_hidden(false);
        let classifier = RollClassifier::new(&config);
        let admission = classifier.admit(&blind_roll(User::player("alice")));
        assert_eq!(
            admission,
            Admission::Rejected {
                failed: vec![BLIND_CHECK, "dnd5e_restrict_passed"]
            }
        );
    }

    #[test]
    fn only_d20_results_are_countable() {
        let roll = Roll::default()
            .with_group(DiceGroup::new(Die::D6, [6, 6]))
            .with_group(DiceGroup::new(Die::D20, [1, 20]))
            .with_group(DiceGroup::new(Die::D100, [55]));
        let results: Vec<u32> = RollClassifier::countable_results(&roll).collect();
        assert_eq!(results, vec![1, 20]);
    }
}
