use rt_tracker::{Roll, RollEvent};

use super::Context;
use crate::Identity;

/// Flags describing the chat message a roll arrived in.
pub struct RecordOptions<'a> {
    pub blind: bool,
    pub content_visible: bool,
    pub tags: &'a [String],
    pub message: &'a str,
    pub roller_gm: bool,
}

pub async fn run(
    ctx: &Context,
    identity: &Identity,
    user: &str,
    dice: &[String],
    opts: RecordOptions<'_>,
) -> Result<(), String> {
    let mut roll = Roll::default();
    for spec in dice {
        roll = roll.with_group(super::parse_dice(spec)?);
    }

    let roller = super::roller(identity, user, opts.roller_gm);
    let local = super::acting_user(identity, user);

    let mut event = RollEvent::new(opts.message, roller)
        .with_roll(roll)
        .blind(opts.blind)
        .content_visible(opts.content_visible);
    for (key, value) in super::parse_tags(opts.tags)? {
        event = event.with_tag(key, value);
    }

    let tracker = ctx.tracker(local);
    super::record_and_report(&tracker, &event).await
}
