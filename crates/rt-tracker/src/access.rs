//! Who may view or clear whose statistics.
//!
//! Mutation through recording is limited to the local identity by the
//! tracker itself; these rules cover the outward-facing commands.

use crate::config::TrackerConfig;
use crate::user::{User, UserId};

/// Whether `viewer` may read the statistics of `target`.
pub fn can_view(config: &TrackerConfig, viewer: &User, target: &UserId) -> bool {
    if viewer.is_gm() {
        config.gm_sees_players || &viewer.id == target
    } else {
        config.players_see_own && &viewer.id == target
    }
}

/// Whether `requester` may clear the statistics of `target`.
pub fn can_clear(requester: &User, target: &UserId) -> bool {
    requester.is_gm() || &requester.id == target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gm_sees_everyone_by_default() {
        let config = TrackerConfig::default();
        assert!(can_view(&config, &User::gm("gm"), &UserId::new("alice")));
        assert!(can_view(&config, &User::gm("gm"), &UserId::new("gm")));
    }

    #[test]
    fn gm_limited_to_self_when_disabled() {
        let config = TrackerConfig::default().with_gm_sees_players(false);
        assert!(!can_view(&config, &User::gm("gm"), &UserId::new("alice")));
        assert!(can_view(&config, &User::gm("gm"), &UserId::new("gm")));
    }

    #[test]
    fn players_see_only_themselves() {
        let config = TrackerConfig::default();
        let alice = User::player("alice");
        assert!(can_view(&config, &alice, &UserId::new("alice")));
        assert!(!can_view(&config, &alice, &UserId::new("bob")));

        let config = config.with_players_see_own(false);
        assert!(!can_view(&config, &alice, &UserId::new("alice")));
    }

    #[test]
    fn clearing() {
        assert!(can_clear(&User::player("alice"), &UserId::new("alice")));
        assert!(!can_clear(&User::player("alice"), &UserId::new("bob")));
        assert!(can_clear(&User::gm("gm"), &UserId::new("bob")));
    }
}
