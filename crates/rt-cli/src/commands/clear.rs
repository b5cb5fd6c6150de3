use rt_tracker::UserId;

use super::Context;
use crate::Identity;

pub async fn run(ctx: &Context, identity: &Identity, user: &str) -> Result<(), String> {
    let requester = super::acting_user(identity, user);
    let tracker = ctx.tracker(requester.clone());
    tracker
        .clear(&requester, &UserId::new(user))
        .await
        .map_err(|e| e.to_string())?;

    println!("  Cleared roll stats for {user}.");
    Ok(())
}
