use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rt_tracker::{Die, Roll, RollEvent};

use super::Context;
use crate::Identity;

/// How many dice to roll and how the roll is presented.
pub struct RollOptions<'a> {
    pub count: u32,
    pub seed: Option<u64>,
    pub blind: bool,
    pub roller_gm: bool,
    pub tags: &'a [String],
}

pub async fn run(
    ctx: &Context,
    identity: &Identity,
    user: &str,
    opts: RollOptions<'_>,
) -> Result<(), String> {
    let RollOptions {
        count,
        seed,
        blind,
        roller_gm,
        tags,
    } = opts;

    if count == 0 {
        return Err("count must be at least 1".into());
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let results: Vec<u32> = (0..count)
        .map(|_| rng.random_range(1..=Die::D20.sides()))
        .collect();

    let values: Vec<String> = results.iter().map(u32::to_string).collect();
    println!("  {} {count}d20 → [{}]", "Rolled".bold(), values.join(", "));

    let roller = super::roller(identity, user, roller_gm);
    let local = super::acting_user(identity, user);

    let mut event = RollEvent::new("cli-roll", roller)
        .with_roll(Roll::d20(results))
        .blind(blind);
    for (key, value) in super::parse_tags(tags)? {
        event = event.with_tag(key, value);
    }

    let tracker = ctx.tracker(local);
    super::record_and_report(&tracker, &event).await
}
